use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 8;

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 副檔名過濾器（不分大小寫，含前導點）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionFilter(pub Vec<String>);

impl ExtensionFilter {
    #[must_use]
    pub fn new(extensions: &[&str]) -> Self {
        Self(extensions.iter().map(|ext| (*ext).to_string()).collect())
    }

    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let dotted = format!(".{}", ext.to_lowercase());
                self.0.iter().any(|allowed| allowed.to_lowercase() == dotted)
            })
    }
}

/// 外部工具路徑
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub exiftool: String,
    pub ffmpeg: String,
    pub ffprobe: String,
    pub ffplay: String,
    /// 寫入標籤時不保留 exiftool 的 `_original` 備份
    pub overwrite_original: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            exiftool: "exiftool".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            ffplay: "ffplay".to_string(),
            overwrite_original: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateCopierSettings {
    pub video_extensions: ExtensionFilter,
    /// 轉檔後影片所在的子資料夾名稱
    pub converted_subfolder: String,
}

impl Default for DateCopierSettings {
    fn default() -> Self {
        Self {
            video_extensions: ExtensionFilter::new(&[".mp4", ".mov", ".avi"]),
            converted_subfolder: "video_converted".to_string(),
        }
    }
}

/// 重新命名的檔名樣式：`PICT0001.avi` → `label_0001.avi`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamerSettings {
    pub log_file: String,
    pub audit_file: String,
    pub source_prefix: String,
    pub extension: String,
    pub index_width: usize,
}

impl Default for RenamerSettings {
    fn default() -> Self {
        Self {
            log_file: "_log.csv".to_string(),
            audit_file: "renamed_files.csv".to_string(),
            source_prefix: "PICT".to_string(),
            extension: "avi".to_string(),
            index_width: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedaterSettings {
    pub video_extensions: ExtensionFilter,
    /// 依 audit 檔批次調整時使用的預設天數偏移
    pub day_offset: f64,
}

impl Default for RedaterSettings {
    fn default() -> Self {
        Self {
            video_extensions: ExtensionFilter::new(&[".mp4", ".mov", ".avi"]),
            day_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub video_extensions: ExtensionFilter,
    /// 前景區塊面積下限（像素）
    pub area_threshold: f64,
    pub history: u32,
    pub var_threshold: f32,
    pub results_file: String,
    pub checkpoint_file: String,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            video_extensions: ExtensionFilter::new(&[".mp4", ".avi"]),
            area_threshold: 1000.0,
            history: 500,
            var_threshold: 16.0,
            results_file: "results.csv".to_string(),
            checkpoint_file: "last_played.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub recent_paths: Vec<String>,
    pub tools: ToolSettings,
    pub date_copier: DateCopierSettings,
    pub renamer: RenamerSettings,
    pub redater: RedaterSettings,
    pub motion: MotionSettings,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter_case_insensitive() {
        let filter = ExtensionFilter::new(&[".mp4", ".AVI"]);
        assert!(filter.matches(Path::new("clip.MP4")));
        assert!(filter.matches(Path::new("/x/PICT0001.avi")));
        assert!(!filter.matches(Path::new("notes.txt")));
        assert!(!filter.matches(Path::new("no_extension")));
    }

    #[test]
    fn test_settings_partial_json_uses_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"language":"zh-TW","motion":{"area_threshold":250.0}}"#)
                .unwrap();
        assert_eq!(settings.language, Language::ZhTw);
        assert!((settings.motion.area_threshold - 250.0).abs() < f64::EPSILON);
        assert_eq!(settings.motion.history, 500);
        assert_eq!(settings.renamer, RenamerSettings::default());
    }

    #[test]
    fn test_language_as_str() {
        assert_eq!(Language::EnUs.as_str(), "en-US");
        assert_eq!(Language::ZhTw.as_str(), "zh-TW");
    }
}
