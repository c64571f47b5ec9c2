// 该文件是 Wangshan （望山） 项目的一部分。
// src/output.rs - 输出定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;

mod render;
pub use self::render::{Annotation, Renderer, draw_box, load_font, plan_annotations};

#[cfg(feature = "display")]
mod window;
#[cfg(feature = "display")]
pub use self::window::show_until_keypress;

#[derive(Error, Debug)]
pub enum RenderError {
  #[error("类别编号越界: {label}（类别表共 {count} 项）")]
  LabelOutOfRange { label: u32, count: usize },
  #[error("无法读取字体文件: {0}")]
  FontIo(#[from] std::io::Error),
  #[error("字体文件无效: {0}")]
  InvalidFont(#[from] ab_glyph::InvalidFont),
  #[error("未找到可用字体，请用 --font 指定字体文件")]
  FontNotFound,
  #[cfg(feature = "display")]
  #[error("窗口错误: {0}")]
  WindowError(#[from] minifb::Error),
}
