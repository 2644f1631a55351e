//! 影片批次重新命名主模組
//!
//! 依紀錄檔展開編號區間，逐一重新命名並寫入稽核檔

use super::audit_log::{AuditWriter, RenameRecord};
use super::rename_log::{NamePattern, RenameEntry, RenamePair, read_rename_log};
use crate::component::prompt::{confirm, prompt_directory, prompt_file};
use crate::config::Config;
use crate::tools::rename_no_clobber;
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 重新命名結果統計
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenameResult {
    pub renamed: usize,
    pub interrupted: bool,
}

/// 依紀錄檔重新命名資料夾中的影片
///
/// 任何一個檔案失敗（來源不存在、目標已存在）就中止整個批次，
/// 已完成的部分保留在稽核檔中
pub fn rename_sequences(
    directory: &Path,
    entries: &[RenameEntry],
    pattern: &NamePattern,
    audit_path: &Path,
    shutdown_signal: &AtomicBool,
) -> Result<RenameResult> {
    let pairs: Vec<RenamePair> = entries
        .iter()
        .flat_map(|entry| entry.file_pairs(pattern))
        .collect();

    let mut audit = AuditWriter::create(audit_path)?;
    let mut result = RenameResult::default();

    let progress_bar = ProgressBar::new(pairs.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress_bar.set_message("重新命名中...");

    for pair in &pairs {
        if shutdown_signal.load(Ordering::SeqCst) {
            progress_bar.abandon_with_message("操作已中斷");
            warn!("收到中斷訊號，已重新命名 {} 個檔案", result.renamed);
            result.interrupted = true;
            return Ok(result);
        }

        let old_path = directory.join(&pair.old_name);
        let new_path = directory.join(&pair.new_name);
        if let Err(e) = rename_no_clobber(&old_path, &new_path) {
            progress_bar.abandon_with_message("批次已中止");
            return Err(e.context(format!(
                "已完成 {} 個檔案後中止，稽核檔保留已完成的紀錄",
                result.renamed
            )));
        }

        audit.append(&RenameRecord {
            old_name: pair.old_name.clone(),
            new_name: pair.new_name.clone(),
        })?;
        result.renamed += 1;
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message("完成");
    info!("重新命名完成 - {} 個檔案", result.renamed);
    Ok(result)
}

/// 影片批次重新命名元件
pub struct VideoRenamer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl VideoRenamer {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 依紀錄檔批次重新命名影片 ===").cyan().bold());

        let settings = &self.config.settings.renamer;
        let directory = prompt_directory(&self.config, "請輸入影片資料夾路徑")?;
        let log_path = prompt_file(
            "請輸入重新命名紀錄檔",
            &directory.join(&settings.log_file).to_string_lossy(),
        )?;
        let audit_path = prompt_file(
            "請輸入稽核檔輸出路徑",
            &directory.join(&settings.audit_file).to_string_lossy(),
        )?;

        let entries = read_rename_log(&log_path)?;
        if entries.is_empty() {
            println!("{}", style("紀錄檔沒有任何項目").yellow());
            return Ok(());
        }

        let pattern = NamePattern::from(settings);
        self.display_preview(&directory, &entries, &pattern);

        if audit_path.exists() {
            println!(
                "{}",
                style(format!("稽核檔 {} 已存在，將被覆寫", audit_path.display())).yellow()
            );
        }

        if !confirm("確定要重新命名這些檔案嗎？", false)? {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        let result = rename_sequences(
            &directory,
            &entries,
            &pattern,
            &audit_path,
            &self.shutdown_signal,
        )?;

        println!();
        println!("{}", style("=== 重新命名結果 ===").cyan().bold());
        println!("  成功: {} 個", style(result.renamed).green());
        if result.interrupted {
            println!("  {}", style("操作已中斷").yellow());
        }
        println!("  稽核檔: {}", audit_path.display());

        Ok(())
    }

    fn display_preview(&self, directory: &Path, entries: &[RenameEntry], pattern: &NamePattern) {
        let total: usize = entries.iter().map(RenameEntry::file_count).sum();
        println!();
        println!(
            "{}",
            style(format!("{} 組內容，共 {} 個檔案：", entries.len(), total)).cyan()
        );

        for entry in entries {
            println!(
                "  {} {} ({} ~ {})",
                style("→").dim(),
                style(&entry.content).cyan(),
                pattern.source_name(entry.start),
                pattern.source_name(entry.end)
            );
            for pair in entry.file_pairs(pattern) {
                if !directory.join(&pair.old_name).exists() {
                    println!("    {} {}", style("缺少:").red(), pair.old_name);
                } else if directory.join(&pair.new_name).exists() {
                    println!("    {} {}", style("已存在:").red(), pair.new_name);
                }
            }
        }
        println!();
    }
}
