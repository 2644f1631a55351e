//! exiftool 包裝
//!
//! 以子程序呼叫 exiftool 讀寫影片的日期標籤

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const FILE_CREATE_DATE: &str = "File:FileCreateDate";
pub const FILE_MODIFY_DATE: &str = "File:FileModifyDate";
pub const QUICKTIME_CREATE_DATE: &str = "QuickTime:CreateDate";
pub const QUICKTIME_MODIFY_DATE: &str = "QuickTime:ModifyDate";
pub const QUICKTIME_MEDIA_CREATE_DATE: &str = "QuickTime:MediaCreateDate";
pub const QUICKTIME_MEDIA_MODIFY_DATE: &str = "QuickTime:MediaModifyDate";

/// exiftool 只在 Windows 與 macOS 能讀寫 `File:FileCreateDate`
pub const FILE_CREATE_DATE_SUPPORTED: bool = cfg!(any(windows, target_os = "macos"));

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S%:z";

#[derive(Debug, Clone)]
pub struct ExifTool {
    executable: PathBuf,
    overwrite_original: bool,
}

impl ExifTool {
    pub fn new(executable: impl Into<PathBuf>, overwrite_original: bool) -> Self {
        Self {
            executable: executable.into(),
            overwrite_original,
        }
    }

    /// 檢查 exiftool 是否可執行
    #[must_use]
    pub fn is_available(&self) -> bool {
        Command::new(&self.executable)
            .arg("-ver")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    /// 讀取指定的群組標籤（例如 `File:FileCreateDate`），缺少的標籤不會出現在結果中
    pub fn read_tags(&self, path: &Path, tags: &[&str]) -> Result<HashMap<String, String>> {
        let mut cmd = Command::new(&self.executable);
        cmd.args(["-j", "-G"]);
        for tag in tags {
            cmd.arg(format!("-{tag}"));
        }
        cmd.arg(path);
        debug!("exiftool 讀取: {cmd:?}");

        let output = cmd
            .output()
            .with_context(|| format!("無法執行 exiftool: {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("exiftool 讀取失敗 {}: {}", path.display(), stderr.trim());
        }

        parse_tag_dump(&output.stdout, tags)
            .with_context(|| format!("無法解析 exiftool 輸出: {}", path.display()))
    }

    /// 讀取單一日期標籤
    pub fn read_date(&self, path: &Path, tag: &str) -> Result<DateTime<FixedOffset>> {
        let tags = self.read_tags(path, &[tag])?;
        let raw = tags
            .get(tag)
            .ok_or_else(|| anyhow!("{} 缺少標籤 {tag}", path.display()))?;
        parse_exif_datetime(raw)
    }

    pub fn write_tags(&self, path: &Path, tags: &[(&str, String)]) -> Result<()> {
        let mut cmd = Command::new(&self.executable);
        if self.overwrite_original {
            cmd.arg("-overwrite_original");
        }
        for (tag, value) in tags {
            cmd.arg(format!("-{tag}={value}"));
        }
        cmd.arg(path);
        debug!("exiftool 寫入: {cmd:?}");

        let output = cmd
            .output()
            .with_context(|| format!("無法執行 exiftool: {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("exiftool 寫入失敗 {}: {}", path.display(), stderr.trim());
        }

        Ok(())
    }
}

fn parse_tag_dump(stdout: &[u8], tags: &[&str]) -> Result<HashMap<String, String>> {
    let dump: serde_json::Value = serde_json::from_slice(stdout)?;
    let object = dump
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.as_object())
        .ok_or_else(|| anyhow!("exiftool 輸出不是預期的 JSON 陣列"))?;

    let values = tags
        .iter()
        .filter_map(|tag| {
            let value = match object.get(*tag)? {
                serde_json::Value::String(s) if !s.is_empty() => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some(((*tag).to_string(), value))
        })
        .collect();

    Ok(values)
}

/// 解析 exiftool 日期，例如 `2024:06:15 15:30:45+02:00`
///
/// 沒有時區的日期視為本地時間
pub fn parse_exif_datetime(raw: &str) -> Result<DateTime<FixedOffset>> {
    let raw = raw.trim();

    for format in [EXIF_DATE_FORMAT, "%Y:%m:%d %H:%M:%S%z"] {
        if let Ok(date) = DateTime::parse_from_str(raw, format) {
            return Ok(date);
        }
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y:%m:%d %H:%M:%S")
        .with_context(|| format!("無法解析日期: {raw}"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|date| date.fixed_offset())
        .ok_or_else(|| anyhow!("本地時間不存在: {raw}"))
}

#[must_use]
pub fn format_exif_datetime(date: &DateTime<FixedOffset>) -> String {
    date.format(EXIF_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_exif_datetime_with_colon_offset() {
        let date = parse_exif_datetime("2024:06:15 15:30:45+02:00").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 6);
        assert_eq!(date.hour(), 15);
        assert_eq!(date.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_parse_exif_datetime_without_colon_offset() {
        let date = parse_exif_datetime("2023:01:02 03:04:05-0500").unwrap();
        assert_eq!(date.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(date.second(), 5);
    }

    #[test]
    fn test_parse_exif_datetime_naive_is_local() {
        let date = parse_exif_datetime("2023:01:02 03:04:05").unwrap();
        assert_eq!(date.day(), 2);
        assert_eq!(date.hour(), 3);
    }

    #[test]
    fn test_parse_exif_datetime_invalid() {
        assert!(parse_exif_datetime("yesterday").is_err());
    }

    #[test]
    fn test_format_roundtrip_keeps_text() {
        let raw = "2024:06:15 15:30:45+02:00";
        let date = parse_exif_datetime(raw).unwrap();
        assert_eq!(format_exif_datetime(&date), raw);
    }

    #[test]
    fn test_parse_tag_dump() {
        let stdout = br#"[{"SourceFile":"a.mp4","File:FileCreateDate":"2024:06:15 15:30:45+02:00","File:FileModifyDate":""}]"#;
        let tags = parse_tag_dump(stdout, &[FILE_CREATE_DATE, FILE_MODIFY_DATE]).unwrap();
        assert_eq!(
            tags.get(FILE_CREATE_DATE).map(String::as_str),
            Some("2024:06:15 15:30:45+02:00")
        );
        assert!(!tags.contains_key(FILE_MODIFY_DATE));
    }

    #[test]
    fn test_parse_tag_dump_rejects_non_array() {
        assert!(parse_tag_dump(br#"{"a":1}"#, &[FILE_CREATE_DATE]).is_err());
    }
}
