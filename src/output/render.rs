// 该文件是 Wangshan （望山） 项目的一部分。
// src/output/render.rs - 检测结果后处理与绘制
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, info};

use crate::{frame::BgrHwcFrame, labels::ClassTable, model::DetectionSet, output::RenderError};

const LABEL_FONT_SIZE: f32 = 16.0;
const LABEL_TEXT_OFFSET: i32 = 15;

// 常见发行版的无衬线字体位置，按顺序探测
const FONT_SEARCH_PATHS: &[&str] = &[
  "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/TTF/DejaVuSans.ttf",
  "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
  "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
  "/System/Library/Fonts/Supplemental/Arial.ttf",
  "C:\\Windows\\Fonts\\arial.ttf",
];

/// 一条通过筛选的检测，已折算为可直接绘制的整数坐标与文本。
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
  pub left: i32,
  pub top: i32,
  pub right: i32,
  pub bottom: i32,
  /// "<类别名>: <置信度百分比>%"
  pub text: String,
  pub color: [u8; 3],
  pub text_pos: (i32, i32),
}

/// 筛选检测结果并规划标注。
///
/// 只保留置信度严格大于阈值的检测（等于阈值的丢弃）；类别编号按 1 起
/// 折算到类别表，越界时返回明确错误而不是越界访问；坐标向零截断为
/// 整数。每条保留的检测输出一行日志。
pub fn plan_annotations(
  result: &DetectionSet,
  table: &ClassTable,
  confidence: f32,
) -> Result<Vec<Annotation>, RenderError> {
  let mut annotations = Vec::new();

  for detection in result.iter() {
    if detection.score <= confidence {
      continue;
    }

    let (name, color) = table
      .entry(detection.label)
      .ok_or(RenderError::LabelOutOfRange {
        label: detection.label,
        count: table.len(),
      })?;

    let [x_min, y_min, x_max, y_max] = detection.bbox;
    let (left, top) = (x_min as i32, y_min as i32);
    let (right, bottom) = (x_max as i32, y_max as i32);

    let text = format!("{}: {:.2}%", name, detection.score * 100.0);
    info!("{text}");

    // 文字放到框上方，贴近上边缘时改放框内下方，避免被裁掉
    let text_y = if top - LABEL_TEXT_OFFSET > LABEL_TEXT_OFFSET {
      top - LABEL_TEXT_OFFSET
    } else {
      top + LABEL_TEXT_OFFSET
    };

    annotations.push(Annotation {
      left,
      top,
      right,
      bottom,
      text,
      color,
      text_pos: (left, text_y),
    });
  }

  Ok(annotations)
}

/// 在图像上画出一个 2 像素粗的空心矩形，两角 (left, top) 与 (right, bottom) 均在框线上。
pub fn draw_box(image: &mut RgbImage, annotation: &Annotation) {
  let width = annotation.right - annotation.left + 1;
  let height = annotation.bottom - annotation.top + 1;
  if width <= 0 || height <= 0 {
    return;
  }

  let color = Rgb(annotation.color);
  let rect = Rect::at(annotation.left, annotation.top).of_size(width as u32, height as u32);
  draw_hollow_rect_mut(image, rect, color);

  // 第二圈，加粗为 2 像素
  if width > 2 && height > 2 {
    let inner = Rect::at(annotation.left + 1, annotation.top + 1)
      .of_size(width as u32 - 2, height as u32 - 2);
    draw_hollow_rect_mut(image, inner, color);
  }
}

/// 在不失真的原始图像副本上绘制全部标注。
pub struct Renderer {
  font: FontArc,
  font_scale: PxScale,
}

impl Renderer {
  pub fn new(font: FontArc) -> Self {
    Self {
      font,
      font_scale: PxScale::from(LABEL_FONT_SIZE),
    }
  }

  pub fn annotate(&self, frame: &BgrHwcFrame, annotations: &[Annotation]) -> RgbImage {
    let mut image = frame.to_rgb_image();
    for annotation in annotations {
      draw_box(&mut image, annotation);
      draw_text_mut(
        &mut image,
        Rgb(annotation.color),
        annotation.text_pos.0,
        annotation.text_pos.1,
        self.font_scale,
        &self.font,
        &annotation.text,
      );
    }
    image
  }
}

/// 加载标签字体：优先使用显式指定的文件，否则探测常见系统字体。
pub fn load_font(explicit: Option<&Path>) -> Result<FontArc, RenderError> {
  if let Some(path) = explicit {
    return Ok(FontArc::try_from_vec(std::fs::read(path)?)?);
  }

  for candidate in FONT_SEARCH_PATHS {
    if Path::new(candidate).exists() {
      debug!("使用系统字体: {}", candidate);
      return Ok(FontArc::try_from_vec(std::fs::read(candidate)?)?);
    }
  }

  Err(RenderError::FontNotFound)
}
