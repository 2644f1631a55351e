use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 上次播放到的檔名，存成單行文字檔
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 檔案不存在或為空時回傳 `None`
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text
                .lines()
                .next()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("無法讀取進度檔: {}", self.path.display())),
        }
    }

    pub fn save(&self, filename: &str) -> Result<()> {
        fs::write(&self.path, format!("{filename}\n"))
            .with_context(|| format!("無法寫入進度檔: {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).with_context(|| format!("無法刪除進度檔: {}", self.path.display()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_checkpoint_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let checkpoint = Checkpoint::new(temp_dir.path().join("last_played.txt"));
        assert_eq!(checkpoint.load().unwrap(), None);
        checkpoint.clear().unwrap();
    }

    #[test]
    fn test_save_load_clear() {
        let temp_dir = TempDir::new().unwrap();
        let checkpoint = Checkpoint::new(temp_dir.path().join("last_played.txt"));

        checkpoint.save("/cam/PICT0003.AVI").unwrap();
        assert_eq!(
            checkpoint.load().unwrap().as_deref(),
            Some("/cam/PICT0003.AVI")
        );

        checkpoint.clear().unwrap();
        assert!(!checkpoint.path().exists());
    }

    #[test]
    fn test_only_first_line_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("last_played.txt");
        fs::write(&path, "  a.mp4  \nb.mp4\n").unwrap();
        assert_eq!(Checkpoint::new(path).load().unwrap().as_deref(), Some("a.mp4"));
    }
}
