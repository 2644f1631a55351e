use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use filetime::FileTime;
use std::path::Path;

/// 將檔案系統的存取與修改時間設為指定時間
pub fn set_file_times<Tz: TimeZone>(
    path: &Path,
    accessed: &DateTime<Tz>,
    modified: &DateTime<Tz>,
) -> Result<()> {
    filetime::set_file_times(path, to_file_time(accessed), to_file_time(modified))
        .with_context(|| format!("無法設定檔案時間: {}", path.display()))
}

fn to_file_time<Tz: TimeZone>(date: &DateTime<Tz>) -> FileTime {
    FileTime::from_unix_time(date.timestamp(), date.timestamp_subsec_nanos())
}
