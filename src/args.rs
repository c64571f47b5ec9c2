// 该文件是 Wangshan （望山） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;

use crate::model::ModelKind;

/// Wangshan 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入图片路径
  #[arg(short, long, value_name = "FILE")]
  pub image: PathBuf,

  /// 预训练检测模型
  #[arg(short, long, value_enum, default_value = "frcnn-resnet", value_name = "MODEL")]
  pub model: ModelKind,

  /// 类别名称文件路径（每行一个类别，行号即类别编号）
  #[arg(short, long, default_value = "coco_classes.txt", value_name = "FILE")]
  pub labels: PathBuf,

  /// 置信度阈值 (0.0 - 1.0)，严格大于阈值的检测才会绘制
  #[arg(short, long, default_value_t = 0.5, value_name = "THRESHOLD")]
  pub confidence: f32,

  /// 标签文字字体文件路径（默认探测常见系统字体）
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,

  /// 调色板随机种子（默认从系统熵初始化）
  #[arg(long, value_name = "SEED")]
  pub seed: Option<u64>,
}
