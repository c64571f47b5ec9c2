// 该文件是 Wangshan （望山） 项目的一部分。
// src/frame.rs - BGR HWC 帧定义
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::{ImageBuffer, Rgb, RgbImage};

const BGR_CHANNELS: usize = 3;

/// 采集顺序（BGR、高×宽×通道）的原始帧。
///
/// 整条流水线只存在两份图像：这份原始帧保持未失真，供最终绘制使用；
/// 模型输入张量由 [`crate::preprocess`] 从这份帧派生。
#[derive(Debug, Clone)]
pub struct BgrHwcFrame {
  data: Box<[u8]>,
  width: u32,
  height: u32,
}

impl BgrHwcFrame {
  pub fn with_shape(height: usize, width: usize) -> Self {
    let size = BGR_CHANNELS * height * width;
    Self {
      data: vec![0u8; size].into_boxed_slice(),
      width: width as u32,
      height: height as u32,
    }
  }

  pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
    if data.len() != BGR_CHANNELS * width as usize * height as usize {
      panic!(
        "数据长度不匹配: 期望长度 {}, 实际长度 {}",
        BGR_CHANNELS * width as usize * height as usize,
        data.len()
      );
    }

    Self {
      data: data.into_boxed_slice(),
      width,
      height,
    }
  }

  pub fn height(&self) -> usize {
    self.height as usize
  }

  pub fn width(&self) -> usize {
    self.width as usize
  }

  pub fn channels(&self) -> usize {
    BGR_CHANNELS
  }

  pub fn as_hwc(&self) -> &[u8] {
    &self.data
  }

  /// 转换为 RGB 图像（交换 B/R 通道），用于绘制与显示。
  pub fn to_rgb_image(&self) -> RgbImage {
    let width = self.width;
    let height = self.height;
    let data = &self.data;

    ImageBuffer::from_fn(width, height, |x, y| {
      let idx = ((y * width + x) as usize) * BGR_CHANNELS;
      let b = data[idx];
      let g = data[idx + 1];
      let r = data[idx + 2];
      Rgb([r, g, b])
    })
  }
}

impl AsMut<[u8]> for BgrHwcFrame {
  fn as_mut(&mut self) -> &mut [u8] {
    &mut self.data
  }
}

impl From<RgbImage> for BgrHwcFrame {
  fn from(image: RgbImage) -> Self {
    let (width, height) = image.dimensions();
    let mut frame = BgrHwcFrame::with_shape(height as usize, width as usize);

    let slice = frame.as_mut();
    for y in 0..height {
      for x in 0..width {
        let pixel = image.get_pixel(x, y);
        let idx = ((y * width + x) as usize) * BGR_CHANNELS;
        slice[idx] = pixel[2];
        slice[idx + 1] = pixel[1];
        slice[idx + 2] = pixel[0];
      }
    }
    frame
  }
}
