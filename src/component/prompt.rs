//! 元件共用的互動輸入

use crate::config::Config;
use crate::config::load::SETTINGS_FILE;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::validate_directory_exists;
use anyhow::Result;
use dialoguer::{Confirm, Input};
use log::warn;
use std::path::{Path, PathBuf};

/// 詢問資料夾路徑，預設為最近使用的資料夾，確認存在後記錄到最近使用清單
pub fn prompt_directory(config: &Config, prompt: &str) -> Result<PathBuf> {
    let recent = config.settings.recent_paths.first().cloned();
    prompt_directory_with_default(prompt, recent)
}

pub fn prompt_directory_with_default(prompt: &str, default: Option<String>) -> Result<PathBuf> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default);
    }

    let directory = PathBuf::from(input.interact_text()?.trim());
    validate_directory_exists(&directory)?;
    remember_recent_path(&directory);

    Ok(directory)
}

/// 詢問檔案路徑（不檢查是否存在）
pub fn prompt_file(prompt: &str, default: &str) -> Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

fn remember_recent_path(directory: &Path) {
    let mut settings = Config::load_settings(Path::new(SETTINGS_FILE)).unwrap_or_default();
    add_recent_path(&mut settings, &directory.to_string_lossy());
    if let Err(e) = save_settings(&settings) {
        warn!("無法記錄最近使用的路徑: {e:#}");
    }
}
