// 该文件是 Wangshan （望山） 项目的一部分。
// src/input.rs - 图像文件输入
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

use std::path::Path;

use image::ImageReader;
use thiserror::Error;
use tracing::debug;

use crate::frame::BgrHwcFrame;

#[derive(Error, Debug)]
pub enum ImageInputError {
  #[error("I/O error: {0}")]
  IoError(std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(image::ImageError),
}

impl From<std::io::Error> for ImageInputError {
  fn from(err: std::io::Error) -> Self {
    ImageInputError::IoError(err)
  }
}

impl From<image::ImageError> for ImageInputError {
  fn from(err: image::ImageError) -> Self {
    ImageInputError::ImageLoadError(err)
  }
}

/// 从磁盘读取图像，按采集顺序（BGR HWC）返回。
pub fn read_image(path: &Path) -> Result<BgrHwcFrame, ImageInputError> {
  let image = ImageReader::open(path)?.decode()?;
  let frame = BgrHwcFrame::from(image.into_rgb8());
  debug!(
    "图像读取完成: {} ({}x{})",
    path.display(),
    frame.width(),
    frame.height()
  );
  Ok(frame)
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  #[test]
  fn read_image_returns_bgr_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pixel.png");

    let mut image = RgbImage::new(1, 1);
    image.put_pixel(0, 0, Rgb([1, 2, 3]));
    image.save(&path).unwrap();

    let frame = read_image(&path).unwrap();
    assert_eq!(frame.width(), 1);
    assert_eq!(frame.height(), 1);
    assert_eq!(frame.as_hwc(), &[3, 2, 1]);
  }

  #[test]
  fn read_image_missing_file_is_io_error() {
    let err = read_image(Path::new("/no/such/picture.jpg")).unwrap_err();
    assert!(matches!(err, ImageInputError::IoError(_)));
  }
}
