// 该文件是 Wangshan （望山） 项目的一部分。
// src/model.rs - 模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use clap::ValueEnum;
use ndarray::Array4;
use thiserror::Error;

use crate::device::ComputeDevice;

mod onnx;
mod weights;
pub use self::onnx::{DetectorError, OnnxDetector};
pub use self::weights::{WeightsCache, WeightsError};

/// 预训练检测器的能力接口：一批图像张量进，一组候选目标出。
///
/// 检测本身（骨干网络推理、NMS）全部由预训练模型承担，实现方只负责
/// 调用它；测试可以注入假实现，不依赖真实的推理运行时。
pub trait Detector {
  type Error;

  fn detect(&mut self, batch: &Array4<f32>) -> Result<DetectionSet, Self::Error>;
}

/// 支持的预训练检测模型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
  /// Faster R-CNN + ResNet50-FPN
  FrcnnResnet,
  /// Faster R-CNN + MobileNetV3-Large 320 FPN
  FrcnnMobilenet,
  /// RetinaNet + ResNet50-FPN
  Retinanet,
}

impl ModelKind {
  fn weight_file(&self) -> &'static str {
    match self {
      ModelKind::FrcnnResnet => "fasterrcnn_resnet50_fpn.onnx",
      ModelKind::FrcnnMobilenet => "fasterrcnn_mobilenet_v3_large_320_fpn.onnx",
      ModelKind::Retinanet => "retinanet_resnet50_fpn.onnx",
    }
  }

  fn weight_url(&self) -> &'static str {
    match self {
      ModelKind::FrcnnResnet => {
        "https://github.com/Qinka/wangshan/releases/download/models-v1/fasterrcnn_resnet50_fpn.onnx"
      }
      ModelKind::FrcnnMobilenet => {
        "https://github.com/Qinka/wangshan/releases/download/models-v1/fasterrcnn_mobilenet_v3_large_320_fpn.onnx"
      }
      ModelKind::Retinanet => {
        "https://github.com/Qinka/wangshan/releases/download/models-v1/retinanet_resnet50_fpn.onnx"
      }
    }
  }

  fn weight_sha256(&self) -> &'static str {
    // 校验和随模型发布补充，为空时跳过校验
    ""
  }

  /// 模型训练时的类别数量，类别文件行数与之不符时检测结果可能无法映射。
  pub fn expected_class_count(&self) -> usize {
    90
  }

  /// 解析预训练权重（首次使用时下载并缓存），在选定设备上构建检测器。
  pub fn load(&self, device: ComputeDevice) -> Result<OnnxDetector, DetectorError> {
    let cache = WeightsCache::from_env()?;
    let path = cache.ensure(self.weight_file(), self.weight_url(), self.weight_sha256())?;
    OnnxDetector::from_file(&path, device)
  }
}

#[derive(Error, Debug)]
#[error("检测结果长度不一致: boxes={boxes}, labels={labels}, scores={scores}")]
pub struct MismatchedLengths {
  pub boxes: usize,
  pub labels: usize,
  pub scores: usize,
}

/// 推理输出的一个候选目标。
#[derive(Debug, Clone, Copy)]
pub struct Detection {
  /// 边界框 [x_min, y_min, x_max, y_max]，原图像素坐标
  pub bbox: [f32; 4],
  /// 类别编号（1 起）
  pub label: u32,
  /// 置信度 [0, 1]
  pub score: f32,
}

/// 推理产出的三条等长平行序列：边界框、类别编号、置信度。
#[derive(Debug, Clone, Default)]
pub struct DetectionSet {
  boxes: Vec<[f32; 4]>,
  labels: Vec<u32>,
  scores: Vec<f32>,
}

impl DetectionSet {
  pub fn new(
    boxes: Vec<[f32; 4]>,
    labels: Vec<u32>,
    scores: Vec<f32>,
  ) -> Result<Self, MismatchedLengths> {
    if boxes.len() != labels.len() || labels.len() != scores.len() {
      return Err(MismatchedLengths {
        boxes: boxes.len(),
        labels: labels.len(),
        scores: scores.len(),
      });
    }
    Ok(Self {
      boxes,
      labels,
      scores,
    })
  }

  pub fn len(&self) -> usize {
    self.scores.len()
  }

  pub fn is_empty(&self) -> bool {
    self.scores.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = Detection> + '_ {
    (0..self.len()).map(|i| Detection {
      bbox: self.boxes[i],
      label: self.labels[i],
      score: self.scores[i],
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_rejects_mismatched_lengths() {
    let err = DetectionSet::new(vec![[0.0; 4]], vec![1, 2], vec![0.5]).unwrap_err();
    assert_eq!(err.boxes, 1);
    assert_eq!(err.labels, 2);
    assert_eq!(err.scores, 1);
  }

  #[test]
  fn iter_preserves_order() {
    let set = DetectionSet::new(
      vec![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]],
      vec![1, 2],
      vec![0.9, 0.8],
    )
    .unwrap();

    let items: Vec<Detection> = set.iter().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].label, 1);
    assert_eq!(items[0].bbox, [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(items[1].score, 0.8);
  }
}
