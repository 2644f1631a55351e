//! 轉檔影片與原始影片的檔名對應
//!
//! Handbrake 輸出的檔名會把底線換成空白並加上 `-N` 編號，
//! 反向轉換即可得到原始相機檔名

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static REGEX_NUMBER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d+").expect("Invalid regex"));

/// 由轉檔後檔名推算原始檔名：移除 `-N`、空白轉底線、轉大寫
///
/// `"My Clip-2.mp4"` → `"MY_CLIP.MP4"`
#[must_use]
pub fn original_name_for(converted_name: &str) -> String {
    REGEX_NUMBER_SUFFIX
        .replace_all(converted_name, "")
        .replace(' ', "_")
        .to_uppercase()
}

/// 在原始資料夾中尋找對應檔案，先比對完整檔名，再不分大小寫比對
pub fn find_original(original_dir: &Path, expected_name: &str) -> Result<Option<PathBuf>> {
    let exact = original_dir.join(expected_name);
    if exact.is_file() {
        return Ok(Some(exact));
    }

    let wanted = expected_name.to_lowercase();
    let entries = fs::read_dir(original_dir)
        .with_context(|| format!("無法讀取資料夾: {}", original_dir.display()))?;

    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().to_lowercase() == wanted
            && entry.file_type()?.is_file()
        {
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_original_name_for_suffix_and_spaces() {
        assert_eq!(original_name_for("My Clip-2.mp4"), "MY_CLIP.MP4");
    }

    #[test]
    fn test_original_name_for_plain_name() {
        assert_eq!(original_name_for("dji_0042.mp4"), "DJI_0042.MP4");
    }

    #[test]
    fn test_original_name_for_removes_every_suffix() {
        assert_eq!(original_name_for("a-1 b-22.mov"), "A_B.MOV");
    }

    #[test]
    fn test_find_original_exact_and_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("MY_CLIP.MP4"), "x").unwrap();
        fs::write(temp_dir.path().join("other_clip.mp4"), "x").unwrap();

        let exact = find_original(temp_dir.path(), "MY_CLIP.MP4").unwrap();
        assert_eq!(exact, Some(temp_dir.path().join("MY_CLIP.MP4")));

        let folded = find_original(temp_dir.path(), "OTHER_CLIP.MP4").unwrap();
        assert_eq!(folded, Some(temp_dir.path().join("other_clip.mp4")));

        assert_eq!(find_original(temp_dir.path(), "NOPE.MP4").unwrap(), None);
    }

    #[test]
    fn test_find_original_ignores_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("CLIP.MP4")).unwrap();
        assert_eq!(find_original(temp_dir.path(), "CLIP.MP4").unwrap(), None);
    }
}
