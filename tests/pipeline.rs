// 该文件是 Wangshan （望山） 项目的一部分。
// tests/pipeline.rs - 注入假检测器的整条流水线测试
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::convert::Infallible;

use ndarray::Array4;

use wangshan::{
  frame::BgrHwcFrame,
  labels::ClassTable,
  model::{DetectionSet, Detector},
  output::{draw_box, plan_annotations},
  preprocess,
};

/// 固定返回预置结果的检测器，流水线测试不依赖推理运行时。
struct FakeDetector {
  result: DetectionSet,
}

impl Detector for FakeDetector {
  type Error = Infallible;

  fn detect(&mut self, _batch: &Array4<f32>) -> Result<DetectionSet, Self::Error> {
    Ok(self.result.clone())
  }
}

fn cat_dog_table() -> ClassTable {
  ClassTable::from_names(vec!["cat".into(), "dog".into()], Some(7))
}

fn cat_at_ninety_percent() -> DetectionSet {
  DetectionSet::new(vec![[10.0, 10.0, 50.0, 50.0]], vec![1], vec![0.9]).unwrap()
}

#[test]
fn detection_above_threshold_is_annotated() {
  let table = cat_dog_table();
  let frame = BgrHwcFrame::with_shape(64, 64);
  let mut detector = FakeDetector {
    result: cat_at_ninety_percent(),
  };

  let tensor = preprocess::to_input_tensor(&frame);
  let result = detector.detect(&tensor).unwrap();
  let annotations = plan_annotations(&result, &table, 0.5).unwrap();

  assert_eq!(annotations.len(), 1);
  let a = &annotations[0];
  assert_eq!(a.text, "cat: 90.00%");
  assert_eq!((a.left, a.top, a.right, a.bottom), (10, 10, 50, 50));
  assert_eq!(a.color, table.entry(1).unwrap().1);
  // 上边缘距离不足时文字移到框内下方
  assert_eq!(a.text_pos, (10, 25));
}

#[test]
fn detection_below_threshold_is_dropped() {
  let table = cat_dog_table();
  let mut detector = FakeDetector {
    result: cat_at_ninety_percent(),
  };

  let frame = BgrHwcFrame::with_shape(64, 64);
  let tensor = preprocess::to_input_tensor(&frame);
  let result = detector.detect(&tensor).unwrap();
  let annotations = plan_annotations(&result, &table, 0.95).unwrap();

  assert!(annotations.is_empty());
}

#[test]
fn annotated_image_keeps_original_dimensions() {
  let table = cat_dog_table();
  let frame = BgrHwcFrame::with_shape(48, 96);
  let result = cat_at_ninety_percent();

  let annotations = plan_annotations(&result, &table, 0.5).unwrap();
  let mut image = frame.to_rgb_image();
  for annotation in &annotations {
    draw_box(&mut image, annotation);
  }

  assert_eq!(image.dimensions(), (96, 48));
}

#[test]
fn empty_detection_set_annotates_nothing() {
  let table = cat_dog_table();
  let annotations = plan_annotations(&DetectionSet::default(), &table, 0.5).unwrap();
  assert!(annotations.is_empty());
}
