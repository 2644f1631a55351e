//! 重新命名紀錄檔解析
//!
//! 每列格式為 `內容標籤;起始編號[;結束編號]`，以分號分隔

use crate::config::RenamerSettings;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// 一段連續編號的影片與其內容標籤
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    pub content: String,
    pub start: u32,
    pub end: u32,
}

/// 單一檔案的重新命名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePair {
    pub old_name: String,
    pub new_name: String,
}

/// 檔名樣式：`{prefix}{index}.{ext}` → `{content}_{index}.{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    pub source_prefix: String,
    pub extension: String,
    pub index_width: usize,
}

impl Default for NamePattern {
    fn default() -> Self {
        Self::from(&RenamerSettings::default())
    }
}

impl From<&RenamerSettings> for NamePattern {
    fn from(settings: &RenamerSettings) -> Self {
        Self {
            source_prefix: settings.source_prefix.clone(),
            extension: settings.extension.clone(),
            index_width: settings.index_width,
        }
    }
}

impl NamePattern {
    #[must_use]
    pub fn source_name(&self, index: u32) -> String {
        format!(
            "{}{:0width$}.{}",
            self.source_prefix,
            index,
            self.extension,
            width = self.index_width
        )
    }

    #[must_use]
    pub fn target_name(&self, content: &str, index: u32) -> String {
        format!(
            "{}_{:0width$}.{}",
            content,
            index,
            self.extension,
            width = self.index_width
        )
    }
}

impl RenameEntry {
    #[must_use]
    pub const fn file_count(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    #[must_use]
    pub fn file_pairs(&self, pattern: &NamePattern) -> Vec<RenamePair> {
        (self.start..=self.end)
            .map(|index| RenamePair {
                old_name: pattern.source_name(index),
                new_name: pattern.target_name(&self.content, index),
            })
            .collect()
    }
}

pub fn read_rename_log(path: &Path) -> Result<Vec<RenameEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("無法讀取重新命名紀錄: {}", path.display()))?;
    parse_rename_log(&text).with_context(|| format!("紀錄檔格式錯誤: {}", path.display()))
}

/// 解析整份紀錄，任何一列格式錯誤都會使整份紀錄失敗
pub fn parse_rename_log(text: &str) -> Result<Vec<RenameEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("第 {} 列無法讀取", line + 1))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let entry = parse_record(&record).with_context(|| format!("第 {} 列", line + 1))?;
        entries.push(entry);
    }

    Ok(entries)
}

fn parse_record(record: &csv::StringRecord) -> Result<RenameEntry> {
    let content = record.get(0).unwrap_or_default();
    if content.is_empty() {
        bail!("缺少內容標籤");
    }

    let start = match record.get(1) {
        Some(value) if !value.is_empty() => parse_index(value)?,
        _ => bail!("缺少起始編號"),
    };

    let end = match record.get(2) {
        Some(value) if !value.is_empty() => parse_index(value)?,
        _ => start,
    };

    if end < start {
        bail!("結束編號 {end} 小於起始編號 {start}");
    }

    Ok(RenameEntry {
        content: content.to_string(),
        start,
        end,
    })
}

fn parse_index(value: &str) -> Result<u32> {
    value
        .parse()
        .with_context(|| format!("無效的編號: {value}"))
}
