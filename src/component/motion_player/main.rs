//! 移動影片播放主模組

use super::checkpoint::Checkpoint;
use super::key_listener::{KeyCommand, KeyListener};
use super::playback::{FfplaySink, PlaybackOutcome, frame_interval, play_frames};
use super::playlist::build_playlist;
use crate::component::motion_scanner::read_scan_results;
use crate::component::prompt::prompt_file;
use crate::config::Config;
use crate::tools::{FrameReader, PixelFormat, get_video_info};
use anyhow::Result;
use console::style;
use dialoguer::{Input, Select};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub played: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 中途離開時最後播放的檔名
    pub quit_at: Option<String>,
}

/// 移動影片播放元件
pub struct MotionPlayer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl MotionPlayer {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 播放有移動的影片 ===").cyan().bold());

        let results_path = prompt_file(
            "請輸入偵測結果檔路徑",
            &self.config.settings.motion.results_file,
        )?;
        let records = read_scan_results(&results_path)?;

        let prefix: String = Input::new()
            .with_prompt("請輸入影片資料夾前綴（可留空）")
            .allow_empty(true)
            .default(String::new())
            .show_default(false)
            .interact_text()?;

        let checkpoint = Checkpoint::new(&self.config.settings.motion.checkpoint_file);
        let mut last_played = checkpoint.load()?;

        if let Some(last) = &last_played {
            let options = vec![format!("從上次進度繼續（{last} 之後）"), "從頭開始".to_string()];
            let selection = Select::new()
                .with_prompt("發現上次的播放進度")
                .items(&options)
                .default(0)
                .interact()?;
            if selection == 1 {
                checkpoint.clear()?;
                last_played = None;
            }
        }

        let playlist = build_playlist(&records, last_played.as_deref());
        if !playlist.checkpoint_found {
            warn!("進度檔中的檔案不在結果檔內: {last_played:?}");
            println!(
                "{}",
                style("進度檔中的檔案不在結果檔內，沒有可播放的影片；可選擇從頭開始").yellow()
            );
            return Ok(());
        }
        if playlist.filenames.is_empty() {
            println!("{}", style("沒有需要播放的影片").yellow());
            return Ok(());
        }

        println!(
            "共 {} 個影片，按 {} 暫停、{} 下一個、{} 離開",
            playlist.filenames.len(),
            style("空白鍵/p").cyan(),
            style("n").cyan(),
            style("q").cyan()
        );

        let listener = KeyListener::spawn();
        let summary = self.play_all(
            Path::new(prefix.trim()),
            &playlist.filenames,
            listener.receiver(),
        );
        listener.finish();

        if let Some(filename) = &summary.quit_at {
            checkpoint.save(filename)?;
            println!("已記錄進度: {filename}");
        }

        println!();
        println!("{}", style("=== 播放結果 ===").cyan().bold());
        println!("  播放完畢: {}", style(summary.played).green());
        println!("  跳過: {}", summary.skipped);
        if summary.failed > 0 {
            println!("  無法播放: {}", style(summary.failed).red());
        }

        info!(
            "播放結束 - 完成: {}, 跳過: {}, 失敗: {}",
            summary.played, summary.skipped, summary.failed
        );
        Ok(())
    }

    /// 依序播放清單；單一影片無法播放時記錄後繼續下一個
    fn play_all(
        &self,
        prefix: &Path,
        filenames: &[String],
        keys: &Receiver<KeyCommand>,
    ) -> PlaybackSummary {
        let mut summary = PlaybackSummary::default();

        for (index, filename) in filenames.iter().enumerate() {
            let path = prefix.join(filename);
            println!(
                "[{}/{}] {}",
                index + 1,
                filenames.len(),
                style(path.display()).cyan()
            );

            match self.play_video(&path, keys) {
                Ok(PlaybackOutcome::Finished) => summary.played += 1,
                Ok(PlaybackOutcome::Skipped) => summary.skipped += 1,
                Ok(PlaybackOutcome::Quit) => {
                    summary.quit_at = Some(filename.clone());
                    break;
                }
                Err(e) => {
                    warn!("無法播放 {}: {e:#}", path.display());
                    println!("{} {e:#}", style("無法播放:").red());
                    summary.failed += 1;
                }
            }

            if self.shutdown_signal.load(Ordering::SeqCst) {
                summary.quit_at = Some(filename.clone());
                break;
            }
        }

        summary
    }

    fn play_video(&self, path: &Path, keys: &Receiver<KeyCommand>) -> Result<PlaybackOutcome> {
        let tools = &self.config.settings.tools;
        let info = get_video_info(&tools.ffprobe, path)?;
        let frames = FrameReader::open(
            &tools.ffmpeg,
            path,
            info.width,
            info.height,
            PixelFormat::Rgb24,
        )?;
        let title = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy());
        let mut sink = FfplaySink::open(&tools.ffplay, &info, &title)?;

        play_frames(
            frames,
            &mut sink,
            keys,
            frame_interval(info.frame_rate),
            &self.shutdown_signal,
        )
    }
}
