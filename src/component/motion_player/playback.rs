//! 影片播放迴圈
//!
//! 每一格檢查一次按鍵，暫停時阻塞等待下一個按鍵

use super::key_listener::KeyCommand;
use crate::tools::{Frame, VideoInfo};
use anyhow::{Context, Result};
use log::debug;
use std::io::{ErrorKind, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Finished,
    Skipped,
    Quit,
}

/// 顯示影格的目的地
pub trait FrameSink {
    /// 回傳 `false` 表示視窗已關閉
    fn show(&mut self, frame: &Frame) -> Result<bool>;
}

pub fn play_frames<I, S>(
    frames: I,
    sink: &mut S,
    keys: &Receiver<KeyCommand>,
    frame_interval: Duration,
    shutdown_signal: &AtomicBool,
) -> Result<PlaybackOutcome>
where
    I: IntoIterator<Item = Result<Frame>>,
    S: FrameSink + ?Sized,
{
    for frame in frames {
        if shutdown_signal.load(Ordering::SeqCst) {
            return Ok(PlaybackOutcome::Quit);
        }

        match keys.try_recv() {
            Ok(KeyCommand::Quit) => return Ok(PlaybackOutcome::Quit),
            Ok(KeyCommand::Skip) => return Ok(PlaybackOutcome::Skipped),
            Ok(KeyCommand::Pause) => {
                debug!("暫停播放");
                // 暫停中只有 q 會結束，其他按鍵都繼續播放
                if let Ok(KeyCommand::Quit) = keys.recv() {
                    return Ok(PlaybackOutcome::Quit);
                }
            }
            Ok(KeyCommand::Other) | Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
        }

        let frame = frame?;
        let started = Instant::now();
        if !sink.show(&frame)? {
            return Ok(PlaybackOutcome::Skipped);
        }
        thread::sleep(frame_interval.saturating_sub(started.elapsed()));
    }

    Ok(PlaybackOutcome::Finished)
}

#[must_use]
pub fn frame_interval(frame_rate: f64) -> Duration {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Duration::from_secs_f64(1.0 / frame_rate)
    } else {
        Duration::from_secs_f64(1.0 / 30.0)
    }
}

/// 把 rgb24 影格寫進 ffplay 的標準輸入
pub struct FfplaySink {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfplaySink {
    pub fn open(ffplay: &str, info: &VideoInfo, title: &str) -> Result<Self> {
        let frame_rate = if info.frame_rate > 0.0 {
            info.frame_rate
        } else {
            30.0
        };

        let mut cmd = Command::new(ffplay);
        cmd.args(["-hide_banner", "-loglevel", "error", "-autoexit"])
            .args(["-window_title", title])
            .args(["-f", "rawvideo", "-pixel_format", "rgb24"])
            .args(["-video_size", &format!("{}x{}", info.width, info.height)])
            .args(["-framerate", &frame_rate.to_string()])
            .args(["-i", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        debug!("ffplay 播放: {cmd:?}");

        let mut child = cmd.spawn().context("無法執行 ffplay")?;
        let stdin = child.stdin.take().context("無法取得 ffplay 輸入")?;

        Ok(Self {
            child,
            stdin: Some(stdin),
        })
    }
}

impl FrameSink for FfplaySink {
    fn show(&mut self, frame: &Frame) -> Result<bool> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(false);
        };
        match stdin.write_all(&frame.data) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                self.stdin = None;
                Ok(false)
            }
            Err(e) => Err(e).context("無法寫入影格到 ffplay"),
        }
    }
}

impl Drop for FfplaySink {
    fn drop(&mut self) {
        self.stdin.take();
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
