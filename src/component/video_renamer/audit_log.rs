//! 重新命名稽核檔
//!
//! CSV 標頭為 `Old Name,New Name`，每列記錄一次重新命名，供還原使用

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRecord {
    #[serde(rename = "Old Name")]
    pub old_name: String,
    #[serde(rename = "New Name")]
    pub new_name: String,
}

/// 逐列寫入並立即 flush，中斷時已完成的列仍保留在檔案中
pub struct AuditWriter {
    writer: csv::Writer<File>,
}

impl AuditWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let writer = csv::Writer::from_path(path)
            .with_context(|| format!("無法建立稽核檔: {}", path.display()))?;
        let mut audit = Self { writer };
        audit
            .writer
            .write_record(["Old Name", "New Name"])
            .context("無法寫入稽核檔標頭")?;
        audit.writer.flush()?;
        Ok(audit)
    }

    pub fn append(&mut self, record: &RenameRecord) -> Result<()> {
        self.writer
            .write_record([&record.old_name, &record.new_name])
            .context("無法寫入稽核紀錄")?;
        self.writer.flush()?;
        Ok(())
    }
}

pub fn read_audit_log(path: &Path) -> Result<Vec<RenameRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("無法讀取稽核檔: {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(row, record)| record.with_context(|| format!("稽核檔第 {} 列格式錯誤", row + 2)))
        .collect()
}
