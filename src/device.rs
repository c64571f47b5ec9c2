// 该文件是 Wangshan （望山） 项目的一部分。
// src/device.rs - 计算设备选择
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use ort::execution_providers::{
  CPUExecutionProvider, CUDAExecutionProvider, ExecutionProvider, ExecutionProviderDispatch,
};
use tracing::info;

/// 推理所用的计算设备，启动时选定一次，随后在整条流水线中显式传递。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeDevice {
  Cuda,
  Cpu,
}

impl ComputeDevice {
  /// 有可用的 CUDA 执行提供器则用 GPU，否则退回 CPU。
  pub fn select() -> Self {
    if CUDAExecutionProvider::default().is_available().unwrap_or(false) {
      ComputeDevice::Cuda
    } else {
      ComputeDevice::Cpu
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      ComputeDevice::Cuda => "cuda",
      ComputeDevice::Cpu => "cpu",
    }
  }

  fn execution_providers(&self) -> Vec<ExecutionProviderDispatch> {
    match self {
      ComputeDevice::Cuda => vec![
        CUDAExecutionProvider::default().build(),
        CPUExecutionProvider::default().build(),
      ],
      ComputeDevice::Cpu => vec![CPUExecutionProvider::default().build()],
    }
  }

  /// 按选定设备初始化 ONNX Runtime 环境，进程内调用一次。
  pub fn init_runtime(&self) -> Result<(), ort::Error> {
    info!("推理设备: {}", self.name());
    ort::init()
      .with_execution_providers(self.execution_providers())
      .commit()?;
    Ok(())
  }
}
