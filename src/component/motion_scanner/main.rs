//! 監視影片移動偵測主模組
//!
//! 掃描資料夾中的影片，判斷是否有移動物體並輸出結果 CSV

use super::motion_detector::{MotionDetector, MotionHit};
use super::scan_results::{MotionScanRecord, write_scan_results};
use crate::component::prompt::{confirm, prompt_directory, prompt_file};
use crate::config::Config;
use crate::tools::{FrameReader, PixelFormat, get_video_info, list_videos};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 監視影片移動偵測元件
pub struct MotionScanner {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl MotionScanner {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style("=== 監視影片移動偵測 ===").cyan().bold());

        let directory = prompt_directory(&self.config, "請輸入監視影片資料夾路徑")?;
        let threshold: f64 = Input::new()
            .with_prompt("請輸入移動區塊面積下限（像素）")
            .default(self.config.settings.motion.area_threshold)
            .interact_text()?;
        self.config.settings.motion.area_threshold = threshold;

        let results_path = prompt_file(
            "請輸入結果檔輸出路徑",
            &self.config.settings.motion.results_file,
        )?;

        if results_path.exists() && !confirm("結果檔已存在，確定要覆寫嗎？", false)? {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        let records = self.scan_folder(&directory)?;
        if records.is_empty() {
            println!("{}", style("找不到任何影片檔案").yellow());
        }

        write_scan_results(&results_path, &records)?;

        let flagged = records.iter().filter(|r| r.movement_detected).count();
        println!();
        println!("{}", style("=== 偵測結果 ===").cyan().bold());
        println!("  掃描: {} 個影片", records.len());
        println!("  有移動: {} 個", style(flagged).green());
        println!("  結果檔: {}", results_path.display());

        info!(
            "移動偵測完成 - 掃描: {}, 有移動: {}",
            records.len(),
            flagged
        );
        Ok(())
    }

    /// 掃描單一影片，回傳第一個移動區塊
    pub fn scan_video(&self, path: &Path) -> Result<Option<MotionHit>> {
        let tools = &self.config.settings.tools;
        let info = get_video_info(&tools.ffprobe, path)?;
        let frames = FrameReader::open(
            &tools.ffmpeg,
            path,
            info.width,
            info.height,
            PixelFormat::Gray,
        )?;
        MotionDetector::from_settings(&self.config.settings.motion).scan(frames)
    }

    /// 平行掃描資料夾，結果依檔名排序；中斷後未掃描的影片不會出現在結果中
    pub fn scan_folder(&self, directory: &Path) -> Result<Vec<MotionScanRecord>> {
        let videos = list_videos(directory, &self.config.settings.motion.video_extensions)?;

        let progress_bar = ProgressBar::new(videos.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        progress_bar.set_message("偵測中...");

        let records: Vec<Option<MotionScanRecord>> = videos
            .par_iter()
            .map(|path| {
                if self.shutdown_signal.load(Ordering::SeqCst) {
                    return None;
                }

                let movement_detected = match self.scan_video(path) {
                    Ok(Some(hit)) => {
                        info!(
                            "{}: 第 {} 格偵測到移動（面積 {}）",
                            path.display(),
                            hit.frame_index,
                            hit.blob.area
                        );
                        true
                    }
                    Ok(None) => false,
                    Err(e) => {
                        warn!("無法掃描 {}，記為無移動: {e:#}", path.display());
                        progress_bar.println(format!("無法掃描 {}: {e:#}", path.display()));
                        false
                    }
                };

                progress_bar.inc(1);
                Some(MotionScanRecord {
                    filename: path.to_string_lossy().to_string(),
                    movement_detected,
                })
            })
            .collect();

        if self.shutdown_signal.load(Ordering::SeqCst) {
            progress_bar.abandon_with_message("操作已中斷");
        } else {
            progress_bar.finish_with_message("完成");
        }

        Ok(records.into_iter().flatten().collect())
    }
}
