// 该文件是 Wangshan （望山） 项目的一部分。
// src/preprocess.rs - 模型输入预处理
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

use ndarray::{Array, Array4};

use crate::frame::BgrHwcFrame;

/// 将采集顺序的原始帧转换为模型输入张量：
///
/// 1. 交换通道 0 与通道 2（BGR → RGB）；
/// 2. HWC 转置为 CHW；
/// 3. 前置批维度，形状 (1, 3, H, W)；
/// 4. 像素值除以 255，归一化到 [0, 1]。
///
/// 不做缩放、裁剪或填充，图像按原始分辨率送入模型。
pub fn to_input_tensor(frame: &BgrHwcFrame) -> Array4<f32> {
  let height = frame.height();
  let width = frame.width();
  let data = frame.as_hwc();

  let mut tensor = Array::zeros((1, 3, height, width));
  for y in 0..height {
    for x in 0..width {
      let idx = (y * width + x) * frame.channels();
      let b = data[idx] as f32;
      let g = data[idx + 1] as f32;
      let r = data[idx + 2] as f32;

      tensor[[0, 0, y, x]] = r / 255.0;
      tensor[[0, 1, y, x]] = g / 255.0;
      tensor[[0, 2, y, x]] = b / 255.0;
    }
  }
  tensor
}
