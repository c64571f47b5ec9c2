// 该文件是 Wangshan （望山） 项目的一部分。
// src/labels.rs - 类别表与调色板
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LabelTableError {
  #[error("无法读取类别文件: {0}")]
  IoError(#[from] std::io::Error),
}

/// 类别表：模型类别编号（1 起）到类别名称与绘制颜色的映射。
///
/// 类别名称按行读取，行尾换行符被去除；文件中的行号（1 起）即模型
/// 输出的类别编号。每个类别在启动时随机分配一个 RGB 颜色，整个运行
/// 期间保持不变。
#[derive(Debug)]
pub struct ClassTable {
  names: Vec<String>,
  colors: Vec<[u8; 3]>,
}

impl ClassTable {
  /// 从文本文件加载类别表，每行一个类别名称。
  ///
  /// `seed` 指定时调色板可复现，否则从系统熵初始化。
  pub fn from_file(path: &Path, seed: Option<u64>) -> Result<Self, LabelTableError> {
    let content = std::fs::read_to_string(path)?;
    let names = content.lines().map(str::to_owned).collect::<Vec<_>>();
    debug!("类别文件 {} 共 {} 个类别", path.display(), names.len());
    Ok(Self::from_names(names, seed))
  }

  pub fn from_names(names: Vec<String>, seed: Option<u64>) -> Self {
    let mut rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    let colors = names
      .iter()
      .map(|_| {
        [
          rng.gen_range(0..=255u8),
          rng.gen_range(0..=255u8),
          rng.gen_range(0..=255u8),
        ]
      })
      .collect();

    Self { names, colors }
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// 按模型类别编号（1 起）查询名称与颜色。
  ///
  /// 编号 0 或超出类别表范围时返回 `None`，由调用方给出明确报错。
  pub fn entry(&self, label: u32) -> Option<(&str, [u8; 3])> {
    let idx = (label as usize).checked_sub(1)?;
    let name = self.names.get(idx)?;
    Some((name.as_str(), self.colors[idx]))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn write_labels(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classes.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (dir, path)
  }

  #[test]
  fn one_color_per_class() {
    let (_dir, path) = write_labels("cat\ndog\nbird\n");
    let table = ClassTable::from_file(&path, Some(1)).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.names.len(), table.colors.len());
  }

  #[test]
  fn trailing_newline_is_stripped() {
    let (_dir, path) = write_labels("cat\ndog\n");
    let table = ClassTable::from_file(&path, Some(1)).unwrap();
    assert_eq!(table.entry(1).unwrap().0, "cat");
    assert_eq!(table.entry(2).unwrap().0, "dog");
  }

  #[test]
  fn interior_empty_lines_keep_ids_aligned() {
    // 行号即类别编号，空行也要占位
    let (_dir, path) = write_labels("cat\n\ndog\n");
    let table = ClassTable::from_file(&path, Some(1)).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.entry(2).unwrap().0, "");
    assert_eq!(table.entry(3).unwrap().0, "dog");
  }

  #[test]
  fn valid_labels_are_one_through_n() {
    let table = ClassTable::from_names(vec!["cat".into(), "dog".into()], Some(1));
    assert!(table.entry(0).is_none());
    assert!(table.entry(1).is_some());
    assert!(table.entry(2).is_some());
    assert!(table.entry(3).is_none());
  }

  #[test]
  fn same_seed_gives_same_palette() {
    let a = ClassTable::from_names(vec!["cat".into(), "dog".into()], Some(42));
    let b = ClassTable::from_names(vec!["cat".into(), "dog".into()], Some(42));
    assert_eq!(a.colors, b.colors);
    // 同一运行内重复查询得到同一颜色
    assert_eq!(a.entry(1).unwrap().1, a.entry(1).unwrap().1);
  }

  #[test]
  fn missing_file_is_io_error() {
    let err = ClassTable::from_file(Path::new("/no/such/classes.txt"), None).unwrap_err();
    assert!(matches!(err, LabelTableError::IoError(_)));
  }
}
