// 该文件是 Wangshan （望山） 项目的一部分。
// src/model/onnx.rs - ONNX 检测器
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::Path;

use ndarray::Array4;
use ort::{
  inputs,
  session::{Session, builder::GraphOptimizationLevel},
  value::Tensor,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
  device::ComputeDevice,
  model::{Detector, DetectionSet, MismatchedLengths},
};

const INTRA_THREADS: usize = 4;

#[derive(Error, Debug)]
pub enum DetectorError {
  #[error("ONNX 运行时错误: {0}")]
  OrtError(#[from] ort::Error),
  #[error("权重错误: {0}")]
  WeightsError(#[from] super::WeightsError),
  #[error("模型输出异常: {0}")]
  MalformedOutput(String),
}

impl From<MismatchedLengths> for DetectorError {
  fn from(err: MismatchedLengths) -> Self {
    DetectorError::MalformedOutput(err.to_string())
  }
}

/// 预训练检测模型的 ONNX 会话封装。
///
/// 会话只做前向推理，不跟踪梯度，也没有 dropout 之类的训练期行为。
/// 输出约定沿用 torchvision 检测模型的导出格式：三个张量依次为
/// boxes (N×4, f32)、labels (N, i64, 1 起)、scores (N, f32)。
pub struct OnnxDetector {
  session: Session,
}

impl OnnxDetector {
  pub fn from_file(path: &Path, device: ComputeDevice) -> Result<Self, DetectorError> {
    info!("加载模型文件: {} ({})", path.display(), device.name());
    let session = Session::builder()?
      .with_optimization_level(GraphOptimizationLevel::Level3)?
      .with_intra_threads(INTRA_THREADS)?
      .commit_from_file(path)?;
    info!("模型加载完成");
    Ok(Self { session })
  }
}

impl Detector for OnnxDetector {
  type Error = DetectorError;

  fn detect(&mut self, batch: &Array4<f32>) -> Result<DetectionSet, Self::Error> {
    let shape = batch.shape();
    debug!("执行模型推理，输入形状 {:?}", shape);

    let (data, _offset) = batch.clone().into_raw_vec_and_offset();
    let input = Tensor::from_array(([shape[0], shape[1], shape[2], shape[3]], data))?;

    // 单次阻塞调用，无超时、无重试、无取消
    let outputs = self.session.run(inputs![input])?;

    let (boxes_shape, boxes_data) = outputs[0].try_extract_tensor::<f32>()?;
    let (_, labels_data) = outputs[1].try_extract_tensor::<i64>()?;
    let (_, scores_data) = outputs[2].try_extract_tensor::<f32>()?;

    if !boxes_data.is_empty() {
      let last_dim = boxes_shape[boxes_shape.len() - 1];
      if last_dim != 4 {
        return Err(DetectorError::MalformedOutput(format!(
          "边界框最后一维应为 4，实际为 {last_dim}"
        )));
      }
    }

    let boxes = boxes_data
      .chunks_exact(4)
      .map(|c| [c[0], c[1], c[2], c[3]])
      .collect::<Vec<_>>();

    let labels = labels_data
      .iter()
      .map(|&l| {
        u32::try_from(l)
          .map_err(|_| DetectorError::MalformedOutput(format!("类别编号为负数: {l}")))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let scores = scores_data.to_vec();

    debug!("推理产出 {} 个候选目标", scores.len());
    Ok(DetectionSet::new(boxes, labels, scores)?)
  }
}
