//! 從檔名擷取拍攝時間
//!
//! 支援 `20240615 153045`、`VID_20240615_153045`、`20240615-153045`、
//! `20240615T153045` 與 `20240615153045`

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

static REGEX_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{8})[ _\-T]?(\d{6})(?:\D|$)").expect("Invalid regex")
});

/// 找出檔名中的 8 位數日期加 6 位數時間，日期無效或找不到時回傳 `None`
#[must_use]
pub fn extract_filename_timestamp(filename: &str) -> Option<NaiveDateTime> {
    REGEX_DATE_TIME.captures_iter(filename).find_map(|caps| {
        let date = caps.get(1)?.as_str();
        let time = caps.get(2)?.as_str();
        NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S").ok()
    })
}
