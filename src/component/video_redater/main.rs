//! 影片日期重設主模組
//!
//! 將所有日期標籤設為同一時間，並同步檔案系統時間

use super::filename_timestamp::extract_filename_timestamp;
use crate::component::prompt::{confirm, prompt_directory, prompt_directory_with_default, prompt_file};
use crate::component::video_renamer::read_audit_log;
use crate::config::Config;
use crate::tools::{
    ExifTool, FILE_CREATE_DATE, FILE_CREATE_DATE_SUPPORTED, FILE_MODIFY_DATE, QUICKTIME_CREATE_DATE,
    QUICKTIME_MEDIA_CREATE_DATE, QUICKTIME_MEDIA_MODIFY_DATE, QUICKTIME_MODIFY_DATE,
    ensure_directory_exists, format_exif_datetime, list_videos, rename_no_clobber,
    set_file_times,
};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeDelta, TimeZone};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 日期來源
#[derive(Debug, Clone, PartialEq)]
pub enum RedateMode {
    /// 所有影片設為同一時間
    Fixed(DateTime<FixedOffset>),
    /// 以建立日期加上天數（可為小數），系統不支援建立日期時改用修改日期
    OffsetDays(f64),
    /// 由檔名中的日期時間決定（本地時間）
    FromFilename,
}

impl RedateMode {
    /// 找不到日期時顯示的訊息
    #[must_use]
    pub const fn skip_reason(&self) -> &'static str {
        match self {
            Self::FromFilename => "檔名中沒有日期，已跳過:",
            Self::Fixed(_) | Self::OffsetDays(_) => "沒有可用的日期，已跳過:",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedateResult {
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// 日期加上天數偏移
pub fn shift_by_days(date: &DateTime<FixedOffset>, days: f64) -> Result<DateTime<FixedOffset>> {
    let millis = (days * 86_400_000.0).round();
    if !millis.is_finite() {
        return Err(anyhow!("無效的天數偏移: {days}"));
    }
    TimeDelta::try_milliseconds(millis as i64)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| anyhow!("日期偏移超出範圍: {days} 天"))
}

/// 將本地時間轉為帶時區的時間
pub fn local_to_fixed(naive: &NaiveDateTime) -> Result<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(naive)
        .earliest()
        .map(|date| date.fixed_offset())
        .ok_or_else(|| anyhow!("本地時間不存在: {naive}"))
}

/// 影片日期重設元件
pub struct VideoRedater {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    exiftool: ExifTool,
}

impl VideoRedater {
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
        println!("{}", style("=== 重設影片日期 ===").cyan().bold());

        let modes = [
            "所有影片設為指定時間",
            "依建立日期偏移天數",
            "依檔名中的日期時間",
            "依重新命名稽核檔批次偏移",
        ];
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇日期來源")
            .items(&modes)
            .default(0)
            .interact_opt()?;

        let result = match selection {
            Some(0) => {
                let directory = prompt_directory(&self.config, "請輸入影片資料夾路徑")?;
                let date = self.prompt_fixed_date()?;
                self.confirm_then(|| self.redate_folder(&directory, &RedateMode::Fixed(date)))?
            }
            Some(1) => {
                let directory = prompt_directory(&self.config, "請輸入影片資料夾路徑")?;
                let days = self.prompt_day_offset()?;
                self.confirm_then(|| self.redate_folder(&directory, &RedateMode::OffsetDays(days)))?
            }
            Some(2) => {
                let directory = prompt_directory(&self.config, "請輸入影片資料夾路徑")?;
                self.confirm_then(|| self.redate_folder(&directory, &RedateMode::FromFilename))?
            }
            Some(3) => {
                let original_dir = prompt_directory(&self.config, "請輸入原始影片資料夾路徑")?;
                let target_dir = prompt_directory_with_default("請輸入要更新的影片資料夾路徑", None)?;
                let audit_path = prompt_file(
                    "請輸入稽核檔路徑",
                    &self.config.settings.renamer.audit_file,
                )?;
                let done: String = Input::new()
                    .with_prompt("exiftool 備份檔移至資料夾（留空則不移動）")
                    .allow_empty(true)
                    .interact_text()?;
                let done = done.trim().to_string();
                let days = self.prompt_day_offset()?;
                self.confirm_then(|| {
                    let done_dir = (!done.is_empty()).then(|| Path::new(&done));
                    self.redate_from_audit(&audit_path, &original_dir, &target_dir, done_dir, days)
                })?
            }
            _ => return Ok(()),
        };

        if let Some(result) = result {
            self.display_summary(&result);
        }
        Ok(())
    }

    fn confirm_then(
        &self,
        action: impl FnOnce() -> Result<RedateResult>,
    ) -> Result<Option<RedateResult>> {
        if !confirm("確定要修改這些影片的日期嗎？", false)? {
            println!("{}", style("操作已取消").yellow());
            return Ok(None);
        }
        action().map(Some)
    }

    fn prompt_fixed_date(&self) -> Result<DateTime<FixedOffset>> {
        let raw: String = Input::new()
            .with_prompt("請輸入時間 (YYYY-MM-DD HH:MM:SS，本地時間)")
            .validate_with(|input: &String| -> Result<(), String> {
                NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M:%S")
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;
        let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S")
            .with_context(|| format!("無法解析時間: {raw}"))?;
        local_to_fixed(&naive)
    }

    fn prompt_day_offset(&self) -> Result<f64> {
        let days: f64 = Input::new()
            .with_prompt("請輸入偏移天數（可為負數或小數）")
            .default(self.config.settings.redater.day_offset)
            .interact_text()?;
        Ok(days)
    }

    /// 寫入所有日期標籤並設定檔案系統時間
    pub fn apply_video_date(&self, path: &Path, date: &DateTime<FixedOffset>) -> Result<()> {
        let value = format_exif_datetime(date);
        let mut writes = vec![
            (FILE_MODIFY_DATE, value.clone()),
            (QUICKTIME_MODIFY_DATE, value.clone()),
            (QUICKTIME_CREATE_DATE, value.clone()),
            (QUICKTIME_MEDIA_MODIFY_DATE, value.clone()),
            (QUICKTIME_MEDIA_CREATE_DATE, value.clone()),
        ];
        if FILE_CREATE_DATE_SUPPORTED {
            writes.push((FILE_CREATE_DATE, value));
        }
        self.exiftool.write_tags(path, &writes)?;
        set_file_times(path, date, date)
    }

    /// 決定影片的新日期，檔名模式下找不到日期時回傳 `None`
    pub fn resolve_date(
        &self,
        path: &Path,
        mode: &RedateMode,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        match mode {
            RedateMode::Fixed(date) => Ok(Some(*date)),
            RedateMode::OffsetDays(days) => {
                let tag = if FILE_CREATE_DATE_SUPPORTED {
                    FILE_CREATE_DATE
                } else {
                    FILE_MODIFY_DATE
                };
                let created = self.exiftool.read_date(path, tag)?;
                shift_by_days(&created, *days).map(Some)
            }
            RedateMode::FromFilename => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                extract_filename_timestamp(&name)
                    .map(|naive| local_to_fixed(&naive))
                    .transpose()
            }
        }
    }

    pub fn redate_folder(&self, directory: &Path, mode: &RedateMode) -> Result<RedateResult> {
        let videos = list_videos(directory, &self.config.settings.redater.video_extensions)?;
        let mut result = RedateResult::default();
        let progress_bar = batch_progress_bar(videos.len());

        for path in &videos {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                warn!("收到中斷訊號，停止處理");
                return Ok(result);
            }

            let outcome = self
                .resolve_date(path, mode)
                .and_then(|date| date.map(|d| self.apply_video_date(path, &d)).transpose());

            match outcome {
                Ok(Some(())) => {
                    result.updated += 1;
                    info!("已更新日期: {}", path.display());
                }
                Ok(None) => {
                    result.skipped += 1;
                    progress_bar.println(format!(
                        "{} {}",
                        style(mode.skip_reason()).yellow(),
                        path.display()
                    ));
                }
                Err(e) => {
                    result.errors += 1;
                    progress_bar.println(format!(
                        "{} {}: {e:#}",
                        style("更新失敗").red(),
                        path.display()
                    ));
                    error!("更新失敗 {}: {e:#}", path.display());
                }
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
        Ok(result)
    }

    /// 依稽核檔：讀原始檔的修改日期加上偏移後寫入新檔名的影片，
    /// 單列失敗只記錄錯誤並繼續
    pub fn redate_from_audit(
        &self,
        audit_path: &Path,
        original_dir: &Path,
        target_dir: &Path,
        done_dir: Option<&Path>,
        days: f64,
    ) -> Result<RedateResult> {
        let records = read_audit_log(audit_path)?;
        if let Some(done_dir) = done_dir {
            ensure_directory_exists(done_dir)?;
        }

        let mut result = RedateResult::default();
        let progress_bar = batch_progress_bar(records.len());

        for record in &records {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                warn!("收到中斷訊號，停止處理");
                return Ok(result);
            }

            let original = original_dir.join(&record.old_name);
            let target = target_dir.join(&record.new_name);
            if !original.exists() || !target.exists() {
                result.skipped += 1;
                progress_bar.inc(1);
                continue;
            }

            let outcome = self
                .exiftool
                .read_date(&original, FILE_MODIFY_DATE)
                .and_then(|date| shift_by_days(&date, days))
                .and_then(|date| self.apply_video_date(&target, &date))
                .and_then(|()| match done_dir {
                    Some(done_dir) => move_exiftool_backup(target_dir, &record.new_name, done_dir),
                    None => Ok(()),
                });

            match outcome {
                Ok(()) => result.updated += 1,
                Err(e) => {
                    result.errors += 1;
                    progress_bar.println(format!(
                        "{} {}: {e:#}",
                        style("更新失敗").red(),
                        record.new_name
                    ));
                    error!("更新失敗 {}: {e:#}", record.new_name);
                }
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
        Ok(result)
    }

    fn display_summary(&self, result: &RedateResult) {
        println!();
        println!("{}", style("=== 日期重設結果 ===").cyan().bold());
        println!("  已更新: {} 個", style(result.updated).green());
        if result.skipped > 0 {
            println!("  已跳過: {} 個", style(result.skipped).yellow());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }

        info!(
            "日期重設完成 - 更新: {}, 跳過: {}, 失敗: {}",
            result.updated, result.skipped, result.errors
        );
    }
}

fn batch_progress_bar(len: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(len as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress_bar.set_message("更新日期中...");
    progress_bar
}

/// 將 exiftool 留下的 `<檔名>_original` 備份移到指定資料夾
pub fn move_exiftool_backup(directory: &Path, file_name: &str, done_dir: &Path) -> Result<()> {
    let backup_name = format!("{file_name}_original");
    let backup = directory.join(&backup_name);
    if !backup.exists() {
        return Ok(());
    }
    rename_no_clobber(&backup, &done_dir.join(&backup_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::fs;
    use tempfile::TempDir;

    fn date(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    #[test]
    fn test_shift_by_days_fractional() {
        let shifted = shift_by_days(&date("2020-01-01T00:00:00+01:00"), 1.5).unwrap();
        assert_eq!(shifted, date("2020-01-02T12:00:00+01:00"));
    }

    #[test]
    fn test_shift_by_days_negative() {
        let shifted = shift_by_days(&date("2020-03-01T08:00:00+00:00"), -1.0).unwrap();
        assert_eq!(shifted.month(), 2);
        assert_eq!(shifted.day(), 29);
    }

    #[test]
    fn test_shift_by_days_rejects_nan() {
        assert!(shift_by_days(&date("2020-03-01T08:00:00+00:00"), f64::NAN).is_err());
    }

    #[test]
    fn test_resolve_date_fixed_and_filename() {
        let redater = VideoRedater::new(Config::default(), Arc::new(AtomicBool::new(false)));
        let fixed = date("2021-07-04T12:00:00+00:00");

        let resolved = redater
            .resolve_date(Path::new("any.mp4"), &RedateMode::Fixed(fixed))
            .unwrap();
        assert_eq!(resolved, Some(fixed));

        let from_name = redater
            .resolve_date(Path::new("/v/20240615 153045.mp4"), &RedateMode::FromFilename)
            .unwrap()
            .unwrap();
        assert_eq!(from_name.year(), 2024);
        assert_eq!(from_name.hour(), 15);
        assert_eq!(from_name.minute(), 30);

        let none = redater
            .resolve_date(Path::new("/v/PICT0001.avi"), &RedateMode::FromFilename)
            .unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn test_redate_folder_skips_names_without_date() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("PICT0001.avi"), "x").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();

        let redater = VideoRedater::new(Config::default(), Arc::new(AtomicBool::new(false)));
        let result = redater
            .redate_folder(temp_dir.path(), &RedateMode::FromFilename)
            .unwrap();
        assert_eq!(
            result,
            RedateResult {
                updated: 0,
                skipped: 1,
                errors: 0,
            }
        );
    }

    #[test]
    fn test_redate_from_audit_skips_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let audit = temp_dir.path().join("renamed_files.csv");
        fs::write(&audit, "Old Name,New Name\nPICT0001.avi,deer_0001.avi\n").unwrap();

        let redater = VideoRedater::new(Config::default(), Arc::new(AtomicBool::new(false)));
        let result = redater
            .redate_from_audit(&audit, temp_dir.path(), temp_dir.path(), None, 1.0)
            .unwrap();
        assert_eq!(result.skipped, 1);
        assert_eq!(result.updated, 0);
    }

    #[test]
    fn test_move_exiftool_backup() {
        let temp_dir = TempDir::new().unwrap();
        let done = temp_dir.path().join("done");
        fs::create_dir(&done).unwrap();
        fs::write(temp_dir.path().join("deer_0001.avi_original"), "bak").unwrap();

        move_exiftool_backup(temp_dir.path(), "deer_0001.avi", &done).unwrap();
        assert!(done.join("deer_0001.avi_original").exists());

        // 沒有備份時不做任何事
        move_exiftool_backup(temp_dir.path(), "fox_0002.avi", &done).unwrap();
    }

    fn redater_without_exiftool() -> VideoRedater {
        let mut config = Config::default();
        config.settings.tools.exiftool = "definitely-not-exiftool".to_string();
        VideoRedater::new(config, Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn test_redate_from_audit_counts_row_errors_and_continues() {
        let temp_dir = TempDir::new().unwrap();
        let audit = temp_dir.path().join("renamed_files.csv");
        fs::write(
            &audit,
            "Old Name,New Name\nPICT0001.avi,deer_0001.avi\nPICT0002.avi,deer_0002.avi\n",
        )
        .unwrap();
        for name in ["PICT0001.avi", "PICT0002.avi", "deer_0001.avi", "deer_0002.avi"] {
            fs::write(temp_dir.path().join(name), "x").unwrap();
        }

        let result = redater_without_exiftool()
            .redate_from_audit(&audit, temp_dir.path(), temp_dir.path(), None, 1.0)
            .unwrap();
        assert_eq!(
            result,
            RedateResult {
                updated: 0,
                skipped: 0,
                errors: 2,
            }
        );
    }

    #[test]
    fn test_redate_folder_counts_errors_and_continues() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.mp4"), "x").unwrap();
        fs::write(temp_dir.path().join("b.mov"), "x").unwrap();

        let result = redater_without_exiftool()
            .redate_folder(temp_dir.path(), &RedateMode::OffsetDays(1.0))
            .unwrap();
        assert_eq!(result.errors, 2);
        assert_eq!(result.updated, 0);
    }

    #[test]
    fn test_skip_reason_follows_mode() {
        assert!(RedateMode::FromFilename.skip_reason().contains("檔名"));
        assert!(!RedateMode::OffsetDays(1.0).skip_reason().contains("檔名"));
        assert!(!RedateMode::Fixed(date("2024-01-01T00:00:00+00:00"))
            .skip_reason()
            .contains("檔名"));
    }

    #[test]
    fn test_redate_folder_stops_on_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.mp4"), "x").unwrap();

        let redater = VideoRedater::new(Config::default(), Arc::new(AtomicBool::new(true)));
        let result = redater
            .redate_folder(temp_dir.path(), &RedateMode::OffsetDays(1.0))
            .unwrap();
        assert_eq!(result, RedateResult::default());
    }
}
