// 该文件是 Wangshan （望山） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use wangshan::{
  args::Args,
  device::ComputeDevice,
  input, labels,
  model::Detector,
  output::{Renderer, load_font, plan_annotations},
  preprocess,
};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入图片: {}", args.image.display());
  info!("检测模型: {:?}", args.model);
  info!("类别文件: {}", args.labels.display());
  info!("置信度阈值: {}", args.confidence);

  // 选择计算设备，之后显式传给模型加载
  let device = ComputeDevice::select();
  device.init_runtime().context("初始化推理运行时失败")?;

  let table = labels::ClassTable::from_file(&args.labels, args.seed)
    .with_context(|| format!("无法加载类别文件: {}", args.labels.display()))?;
  info!("类别表共 {} 个类别", table.len());
  if table.len() != args.model.expected_class_count() {
    warn!(
      "类别文件有 {} 个类别，模型训练类别数为 {}，检测结果可能无法映射",
      table.len(),
      args.model.expected_class_count()
    );
  }

  info!("正在加载模型...");
  let mut detector = args
    .model
    .load(device)
    .context("加载预训练检测模型失败")?;

  let frame = input::read_image(&args.image)
    .with_context(|| format!("无法读取图片: {}", args.image.display()))?;
  info!("图片尺寸: {}x{}", frame.width(), frame.height());

  let tensor = preprocess::to_input_tensor(&frame);

  info!("开始推理...");
  let now = std::time::Instant::now();
  let result = detector.detect(&tensor).context("推理失败")?;
  info!("推理完成，耗时: {:.2?}", now.elapsed());
  info!("候选目标: {} 个", result.len());

  let annotations = plan_annotations(&result, &table, args.confidence)?;
  info!("通过筛选: {} 个", annotations.len());

  let font = load_font(args.font.as_deref()).context("加载标签字体失败")?;
  let renderer = Renderer::new(font);
  let annotated = renderer.annotate(&frame, &annotations);

  #[cfg(feature = "display")]
  wangshan::output::show_until_keypress("Wangshan", &annotated)?;

  #[cfg(not(feature = "display"))]
  {
    let _ = annotated;
    warn!("编译时未启用 display 特性，跳过窗口显示");
  }

  Ok(())
}
