// 该文件是 Wangshan （望山） 项目的一部分。
// src/model/weights.rs - 预训练权重下载与缓存
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;
use std::time::Duration;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(3600);
const MIN_WEIGHT_SIZE: usize = 1024;

const MODEL_DIR_ENV: &str = "WANGSHAN_MODEL_DIR";

#[derive(Error, Debug)]
pub enum WeightsError {
  #[error("无法确定模型缓存目录")]
  NoCacheDir,
  #[error("非法的权重文件名: {0}")]
  InvalidName(String),
  #[error("仅允许 HTTPS 权重地址: {0}")]
  InsecureUrl(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("下载错误: {0}")]
  NetworkError(#[from] reqwest::Error),
  #[error("下载 {0} 失败: HTTP {1}")]
  HttpStatus(String, reqwest::StatusCode),
  #[error("下载的权重文件过小（{0} 字节），可能已损坏")]
  Truncated(usize),
  #[error("权重 {name} 校验和不匹配: 期望 {expected}, 实际 {actual}")]
  ChecksumMismatch {
    name: String,
    expected: String,
    actual: String,
  },
}

/// 预训练权重缓存目录。
///
/// 默认位于系统缓存目录下的 `wangshan/models`，可用环境变量
/// `WANGSHAN_MODEL_DIR` 覆盖。同名文件已存在即视为命中，不再联网。
pub struct WeightsCache {
  root: PathBuf,
}

impl WeightsCache {
  pub fn from_env() -> Result<Self, WeightsError> {
    if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
      return Ok(Self { root: dir.into() });
    }
    let root = dirs::cache_dir()
      .ok_or(WeightsError::NoCacheDir)?
      .join("wangshan")
      .join("models");
    Ok(Self { root })
  }

  pub fn at(root: PathBuf) -> Self {
    Self { root }
  }

  /// 确保权重文件就绪，必要时下载，返回本地路径。
  pub fn ensure(&self, name: &str, url: &str, sha256: &str) -> Result<PathBuf, WeightsError> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
      return Err(WeightsError::InvalidName(name.to_string()));
    }
    if !url.starts_with("https://") {
      return Err(WeightsError::InsecureUrl(url.to_string()));
    }

    std::fs::create_dir_all(&self.root)?;
    let path = self.root.join(name);
    if path.exists() {
      debug!("权重已缓存: {}", path.display());
      return Ok(path);
    }

    info!("下载权重 {} ← {}", name, url);
    let bytes = download(url, name)?;

    if !sha256.is_empty() {
      verify_checksum(name, sha256, &bytes)?;
      info!("权重 {} 校验和验证通过", name);
    }

    // 先写临时文件再改名，避免中断留下半个权重
    let temp = path.with_extension("part");
    std::fs::write(&temp, &bytes)?;
    std::fs::rename(&temp, &path).inspect_err(|_| {
      let _ = std::fs::remove_file(&temp);
    })?;

    info!("权重 {} 保存到 {}（{:.2} MB）", name, path.display(), bytes.len() as f64 / (1024.0 * 1024.0));
    Ok(path)
  }
}

fn download(url: &str, name: &str) -> Result<Vec<u8>, WeightsError> {
  let client = reqwest::blocking::Client::builder()
    .timeout(DOWNLOAD_TIMEOUT)
    .build()?;

  let response = client.get(url).send()?;
  if !response.status().is_success() {
    return Err(WeightsError::HttpStatus(name.to_string(), response.status()));
  }

  let bytes = response.bytes()?.to_vec();
  if bytes.len() < MIN_WEIGHT_SIZE {
    return Err(WeightsError::Truncated(bytes.len()));
  }
  Ok(bytes)
}

fn verify_checksum(name: &str, expected: &str, bytes: &[u8]) -> Result<(), WeightsError> {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  let actual = hex::encode(hasher.finalize());
  if actual != expected {
    return Err(WeightsError::ChecksumMismatch {
      name: name.to_string(),
      expected: expected.to_string(),
      actual,
    });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn cached_file_short_circuits_network() {
    let dir = TempDir::new().unwrap();
    let cache = WeightsCache::at(dir.path().to_path_buf());
    let path = dir.path().join("model.onnx");
    std::fs::write(&path, b"weights").unwrap();

    // URL 不可达也应命中缓存
    let got = cache
      .ensure("model.onnx", "https://invalid.invalid/model.onnx", "")
      .unwrap();
    assert_eq!(got, path);
  }

  #[test]
  fn rejects_path_traversal_names() {
    let dir = TempDir::new().unwrap();
    let cache = WeightsCache::at(dir.path().to_path_buf());

    for name in ["", "../evil.onnx", "a/b.onnx", "a\\b.onnx"] {
      let err = cache
        .ensure(name, "https://example.com/model.onnx", "")
        .unwrap_err();
      assert!(matches!(err, WeightsError::InvalidName(_)), "{name}");
    }
  }

  #[test]
  fn rejects_non_https_urls() {
    let dir = TempDir::new().unwrap();
    let cache = WeightsCache::at(dir.path().to_path_buf());

    let err = cache
      .ensure("model.onnx", "http://example.com/model.onnx", "")
      .unwrap_err();
    assert!(matches!(err, WeightsError::InsecureUrl(_)));
  }

  #[test]
  fn checksum_mismatch_is_reported() {
    let err = verify_checksum("model.onnx", "00", b"data").unwrap_err();
    assert!(matches!(err, WeightsError::ChecksumMismatch { .. }));
  }

}
