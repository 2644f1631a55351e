use crate::config::ExtensionFilter;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 列出資料夾第一層中符合副檔名的影片，依檔名排序
pub fn list_videos(directory: &Path, filter: &ExtensionFilter) -> Result<Vec<PathBuf>> {
    let mut videos = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(1).follow_links(false) {
        let entry = entry.with_context(|| format!("無法讀取資料夾: {}", directory.display()))?;
        if entry.file_type().is_file() && filter.matches(entry.path()) {
            videos.push(entry.into_path());
        }
    }

    videos.sort();
    Ok(videos)
}
