//! 監視影片移動偵測元件
//!
//! 背景相減後找出前景區塊，面積落在範圍內即判定為有移動

mod background_model;
mod blob_finder;
mod main;
mod motion_detector;
mod scan_results;

pub use background_model::{BackgroundModel, BackgroundModelConfig, ForegroundMask};
pub use blob_finder::{Blob, BoundingBox, find_blobs};
pub use main::MotionScanner;
pub use motion_detector::{MotionDetector, MotionHit};
pub use scan_results::{MotionScanRecord, read_scan_results, write_scan_results};
