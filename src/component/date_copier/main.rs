//! 轉檔影片日期還原主模組
//!
//! Handbrake 轉檔不會保留原始日期，從原始相機檔讀回建立與修改日期，
//! 寫入轉檔後影片的標籤與檔案系統時間

use super::filename_matcher::{find_original, original_name_for};
use crate::component::prompt::{confirm, prompt_directory, prompt_directory_with_default};
use crate::config::{Config, ExtensionFilter};
use crate::tools::{
    ExifTool, FILE_CREATE_DATE, FILE_MODIFY_DATE, QUICKTIME_CREATE_DATE, QUICKTIME_MODIFY_DATE,
    list_videos, parse_exif_datetime, set_file_times,
};
use anyhow::{Result, anyhow};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 轉檔影片與其原始檔的對應
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCopyMatch {
    pub converted: PathBuf,
    pub expected_name: String,
    pub original: Option<PathBuf>,
}

/// 日期複製結果統計
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DateCopyResult {
    pub updated: usize,
    pub missing_original: usize,
    pub errors: usize,
    pub interrupted: bool,
}

/// 列出轉檔資料夾中的影片並找出各自的原始檔
pub fn plan_date_copies(
    original_dir: &Path,
    converted_dir: &Path,
    filter: &ExtensionFilter,
) -> Result<Vec<DateCopyMatch>> {
    list_videos(converted_dir, filter)?
        .into_iter()
        .map(|converted| {
            let converted_name = converted
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let expected_name = original_name_for(&converted_name);
            let original = find_original(original_dir, &expected_name)?;
            Ok(DateCopyMatch {
                converted,
                expected_name,
                original,
            })
        })
        .collect()
}

/// 轉檔影片日期還原元件
pub struct DateCopier {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    exiftool: ExifTool,
}

impl DateCopier {
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        let tools = &config.settings.tools;
        let exiftool = ExifTool::new(&tools.exiftool, tools.overwrite_original);
        Self {
            config,
            shutdown_signal,
            exiftool,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 還原轉檔影片日期 ===").cyan().bold());

        let original_dir = prompt_directory(&self.config, "請輸入原始影片資料夾路徑")?;
        let default_converted = original_dir
            .join(&self.config.settings.date_copier.converted_subfolder)
            .to_string_lossy()
            .to_string();
        let converted_dir =
            prompt_directory_with_default("請輸入轉檔影片資料夾路徑", Some(default_converted))?;

        let matches = plan_date_copies(
            &original_dir,
            &converted_dir,
            &self.config.settings.date_copier.video_extensions,
        )?;

        if matches.is_empty() {
            println!("{}", style("找不到任何轉檔影片").yellow());
            return Ok(());
        }

        let found = matches.iter().filter(|m| m.original.is_some()).count();
        println!(
            "{}",
            style(format!(
                "找到 {} 個轉檔影片，其中 {} 個有對應的原始檔",
                matches.len(),
                found
            ))
            .green()
        );

        if !confirm("確定要複製日期嗎？", true)? {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        let result = self.copy_matched_dates(&matches);
        self.display_summary(&result);

        Ok(())
    }

    /// 非互動版本：直接處理兩個資料夾
    pub fn copy_dates(&self, original_dir: &Path, converted_dir: &Path) -> Result<DateCopyResult> {
        let matches = plan_date_copies(
            original_dir,
            converted_dir,
            &self.config.settings.date_copier.video_extensions,
        )?;
        Ok(self.copy_matched_dates(&matches))
    }

    fn copy_matched_dates(&self, matches: &[DateCopyMatch]) -> DateCopyResult {
        let mut result = DateCopyResult::default();

        let progress_bar = ProgressBar::new(matches.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        for entry in matches {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                warn!("收到中斷訊號，停止處理");
                result.interrupted = true;
                return result;
            }

            let converted_name = entry.converted.display();
            match &entry.original {
                None => {
                    result.missing_original += 1;
                    progress_bar.println(format!(
                        "找不到原始檔 {} ({converted_name})",
                        entry.expected_name
                    ));
                    warn!("找不到原始檔 {} ({converted_name})", entry.expected_name);
                }
                Some(original) => match self.copy_video_dates(original, &entry.converted) {
                    Ok(()) => {
                        result.updated += 1;
                        info!("已更新日期: {converted_name}");
                    }
                    Err(e) => {
                        result.errors += 1;
                        progress_bar.println(format!("更新失敗 {converted_name}: {e:#}"));
                        error!("更新失敗 {converted_name}: {e:#}");
                    }
                },
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
        result
    }

    /// 將原始檔的建立與修改日期寫入轉檔影片
    ///
    /// 沒有檔案建立日期的系統（Linux）改用修改日期當作 QuickTime 建立日期
    pub fn copy_video_dates(&self, original: &Path, converted: &Path) -> Result<()> {
        let tags = self
            .exiftool
            .read_tags(original, &[FILE_CREATE_DATE, FILE_MODIFY_DATE])?;
        let modify_raw = tags
            .get(FILE_MODIFY_DATE)
            .ok_or_else(|| anyhow!("{} 缺少 {FILE_MODIFY_DATE}", original.display()))?;
        let modify_date = parse_exif_datetime(modify_raw)?;

        let mut writes = vec![
            (FILE_MODIFY_DATE, modify_raw.clone()),
            (QUICKTIME_MODIFY_DATE, modify_raw.clone()),
        ];
        match tags.get(FILE_CREATE_DATE) {
            Some(create_raw) => {
                parse_exif_datetime(create_raw)?;
                writes.push((FILE_CREATE_DATE, create_raw.clone()));
                writes.push((QUICKTIME_CREATE_DATE, create_raw.clone()));
            }
            None => {
                debug!("{} 沒有 {FILE_CREATE_DATE}，改用修改日期", original.display());
                writes.push((QUICKTIME_CREATE_DATE, modify_raw.clone()));
            }
        }

        self.exiftool.write_tags(converted, &writes)?;
        set_file_times(converted, &modify_date, &modify_date)
    }

    fn display_summary(&self, result: &DateCopyResult) {
        println!();
        println!("{}", style("=== 日期還原結果 ===").cyan().bold());
        println!("  已更新: {} 個", style(result.updated).green());
        if result.missing_original > 0 {
            println!("  找不到原始檔: {} 個", style(result.missing_original).yellow());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }
        if result.interrupted {
            println!("  {}", style("操作已中斷").yellow());
        }

        info!(
            "日期還原完成 - 更新: {}, 缺少原始檔: {}, 失敗: {}",
            result.updated, result.missing_original, result.errors
        );
    }
}
