// 该文件是 Wangshan （望山） 项目的一部分。
// src/output/window.rs - 结果窗口显示
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use minifb::{KeyRepeat, Window, WindowOptions};
use tracing::info;

use crate::output::RenderError;

const TARGET_FPS: usize = 60;

/// 按图像原始尺寸弹出窗口显示标注结果，阻塞到按下任意键（或关闭窗口）。
pub fn show_until_keypress(title: &str, image: &RgbImage) -> Result<(), RenderError> {
  let (width, height) = (image.width() as usize, image.height() as usize);

  let buffer: Vec<u32> = image
    .pixels()
    .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | (p[2] as u32))
    .collect();

  let mut window = Window::new(title, width, height, WindowOptions::default())?;
  window.set_target_fps(TARGET_FPS);

  info!("窗口已打开，按任意键退出");
  while window.is_open() {
    window.update_with_buffer(&buffer, width, height)?;
    if !window.get_keys_pressed(KeyRepeat::No).is_empty() {
      break;
    }
  }

  Ok(())
}
