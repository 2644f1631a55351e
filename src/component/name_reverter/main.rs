use crate::component::prompt::{confirm, prompt_directory, prompt_file};
use crate::component::video_renamer::{RenameRecord, read_audit_log};
use crate::config::Config;
use crate::tools::rename_no_clobber;
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RevertResult {
    pub reverted: usize,
    pub interrupted: bool,
}

/// 依稽核檔順序將 `New Name` 改回 `Old Name`，第一個失敗即中止
pub fn revert_renames(
    directory: &Path,
    records: &[RenameRecord],
    shutdown_signal: &AtomicBool,
) -> Result<RevertResult> {
    let mut result = RevertResult::default();

    let progress_bar = ProgressBar::new(records.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress_bar.set_message("還原中...");

    for record in records {
        if shutdown_signal.load(Ordering::SeqCst) {
            progress_bar.abandon_with_message("操作已中斷");
            warn!("收到中斷訊號，已還原 {} 個檔案", result.reverted);
            result.interrupted = true;
            return Ok(result);
        }

        let current = directory.join(&record.new_name);
        let restored = directory.join(&record.old_name);
        if let Err(e) = rename_no_clobber(&current, &restored) {
            progress_bar.abandon_with_message("批次已中止");
            return Err(e.context(format!("已還原 {} 個檔案後中止", result.reverted)));
        }
        result.reverted += 1;
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message("完成");

    info!("檔名還原完成 - {} 個檔案", result.reverted);
    Ok(result)
}

/// 檔名還原元件
pub struct NameReverter {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl NameReverter {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 依稽核檔還原檔名 ===").cyan().bold());

        let directory = prompt_directory(&self.config, "請輸入影片資料夾路徑")?;
        let audit_path = prompt_file(
            "請輸入稽核檔路徑",
            &directory
                .join(&self.config.settings.renamer.audit_file)
                .to_string_lossy(),
        )?;

        let records = read_audit_log(&audit_path)?;
        if records.is_empty() {
            println!("{}", style("稽核檔沒有任何紀錄").yellow());
            return Ok(());
        }

        println!(
            "{}",
            style(format!("將還原 {} 個檔案，例如：", records.len())).green()
        );
        for record in records.iter().take(5) {
            println!(
                "  {} {} {} {}",
                style("•").dim(),
                record.new_name,
                style("→").dim(),
                record.old_name
            );
        }

        if !confirm("確定要還原這些檔名嗎？", false)? {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        let result = revert_renames(&directory, &records, &self.shutdown_signal)?;

        println!();
        println!("  已還原: {} 個", style(result.reverted).green());
        if result.interrupted {
            println!("  {}", style("操作已中斷").yellow());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(old_name: &str, new_name: &str) -> RenameRecord {
        RenameRecord {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        }
    }

    #[test]
    fn test_revert_renames() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("deer_0001.avi"), "1").unwrap();
        fs::write(temp_dir.path().join("deer_0002.avi"), "2").unwrap();

        let records = [
            record("PICT0001.avi", "deer_0001.avi"),
            record("PICT0002.avi", "deer_0002.avi"),
        ];
        let result = revert_renames(temp_dir.path(), &records, &AtomicBool::new(false)).unwrap();

        assert_eq!(result.reverted, 2);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("PICT0002.avi")).unwrap(),
            "2"
        );
        assert!(!temp_dir.path().join("deer_0001.avi").exists());
    }

    #[test]
    fn test_revert_aborts_when_destination_exists() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("deer_0001.avi"), "1").unwrap();
        fs::write(temp_dir.path().join("PICT0001.avi"), "other").unwrap();
        fs::write(temp_dir.path().join("deer_0002.avi"), "2").unwrap();

        let records = [
            record("PICT0001.avi", "deer_0001.avi"),
            record("PICT0002.avi", "deer_0002.avi"),
        ];
        let result = revert_renames(temp_dir.path(), &records, &AtomicBool::new(false));

        assert!(result.is_err());
        assert!(temp_dir.path().join("deer_0002.avi").exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("PICT0001.avi")).unwrap(),
            "other"
        );
    }

    #[test]
    fn test_revert_aborts_when_renamed_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let records = [record("PICT0001.avi", "deer_0001.avi")];
        assert!(revert_renames(temp_dir.path(), &records, &AtomicBool::new(false)).is_err());
    }

    #[test]
    fn test_revert_stops_on_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("deer_0001.avi"), "x").unwrap();

        let records = [record("PICT0001.avi", "deer_0001.avi")];
        let result = revert_renames(temp_dir.path(), &records, &AtomicBool::new(true)).unwrap();

        assert!(result.interrupted);
        assert_eq!(result.reverted, 0);
        assert!(temp_dir.path().join("deer_0001.avi").exists());
    }
}
