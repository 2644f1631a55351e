use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    }
    Ok(())
}

/// 重新命名檔案，目標已存在時拒絕覆蓋
pub fn rename_no_clobber(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("來源檔案不存在: {}", from.display());
    }
    if to.exists() {
        bail!("目標檔案已存在: {}", to.display());
    }
    fs::rename(from, to)
        .with_context(|| format!("無法重新命名 {} -> {}", from.display(), to.display()))
}
