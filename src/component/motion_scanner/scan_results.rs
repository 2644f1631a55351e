//! 移動偵測結果 CSV
//!
//! 標頭為 `Filename,Movement Detected`，值為 `True` / `False`

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionScanRecord {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Movement Detected", with = "title_case_bool")]
    pub movement_detected: bool,
}

mod title_case_bool {
    use super::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.trim().eq_ignore_ascii_case("true"))
    }
}

pub fn write_scan_results(path: &Path, records: &[MotionScanRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("無法建立結果檔: {}", path.display()))?;

    if records.is_empty() {
        writer.write_record(["Filename", "Movement Detected"])?;
    }
    for record in records {
        writer.serialize(record).context("無法寫入偵測結果")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_scan_results(path: &Path) -> Result<Vec<MotionScanRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("無法讀取結果檔: {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(row, record)| record.with_context(|| format!("結果檔第 {} 列格式錯誤", row + 2)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_uses_title_case_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.csv");
        let records = vec![
            MotionScanRecord {
                filename: "/cam/PICT0001.AVI".to_string(),
                movement_detected: true,
            },
            MotionScanRecord {
                filename: "/cam/PICT0002.AVI".to_string(),
                movement_detected: false,
            },
        ];
        write_scan_results(&path, &records).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Filename,Movement Detected\n/cam/PICT0001.AVI,True\n/cam/PICT0002.AVI,False\n"
        );
        assert_eq!(read_scan_results(&path).unwrap(), records);
    }

    #[test]
    fn test_empty_results_still_have_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.csv");
        write_scan_results(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Filename,Movement Detected\n");
        assert!(read_scan_results(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_accepts_any_case() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.csv");
        fs::write(&path, "Filename,Movement Detected\na.mp4,TRUE\nb.mp4,false\nc.mp4,true\n")
            .unwrap();
        let flags: Vec<bool> = read_scan_results(&path)
            .unwrap()
            .into_iter()
            .map(|r| r.movement_detected)
            .collect();
        assert_eq!(flags, vec![true, false, true]);
    }
}
