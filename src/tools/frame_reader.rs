//! 影格讀取
//!
//! 以 ffmpeg 子程序將影片解碼為原始影格，透過 stdout 逐格讀取

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    Rgb24,
}

impl PixelFormat {
    #[must_use]
    pub const fn ffmpeg_name(&self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Rgb24 => "rgb24",
        }
    }

    #[must_use]
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb24 => 3,
        }
    }
}

/// 單一原始影格
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = frame_size(width, height, format);
        if data.len() != expected {
            bail!(
                "影格大小不符: {}x{} {} 需要 {} bytes，實際 {} bytes",
                width,
                height,
                format.ffmpeg_name(),
                expected,
                data.len()
            );
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    #[must_use]
    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

const fn frame_size(width: u32, height: u32, format: PixelFormat) -> usize {
    width as usize * height as usize * format.bytes_per_pixel()
}

/// ffmpeg 影格串流，依序產生 [`Frame`]
pub struct FrameReader {
    child: Child,
    stdout: ChildStdout,
    stderr: Option<JoinHandle<String>>,
    path: PathBuf,
    width: u32,
    height: u32,
    format: PixelFormat,
    finished: bool,
}

impl FrameReader {
    pub fn open(
        ffmpeg: &str,
        path: &Path,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("無效的影片尺寸 {width}x{height}: {}", path.display());
        }

        let mut cmd = Command::new(ffmpeg);
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-i"])
            .arg(path)
            .args([
                "-map",
                "0:v:0",
                "-vf",
                &format!("scale={width}:{height}"),
                "-f",
                "rawvideo",
                "-pix_fmt",
                format.ffmpeg_name(),
                "-",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("ffmpeg 解碼: {cmd:?}");

        let mut child = cmd
            .spawn()
            .with_context(|| format!("無法執行 ffmpeg: {}", path.display()))?;
        let stdout = child
            .stdout
            .take()
            .with_context(|| format!("無法取得 ffmpeg 輸出: {}", path.display()))?;

        // 另開執行緒收集錯誤訊息，避免 stderr 塞滿時卡住 ffmpeg
        let stderr = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut message = String::new();
                let _ = stderr.read_to_string(&mut message);
                message
            })
        });

        Ok(Self {
            child,
            stdout,
            stderr,
            path: path.to_path_buf(),
            width,
            height,
            format,
            finished: false,
        })
    }
}

impl Iterator for FrameReader {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut buffer = vec![0u8; frame_size(self.width, self.height, self.format)];
        match self.stdout.read_exact(&mut buffer) {
            Ok(()) => Some(Frame::new(self.width, self.height, self.format, buffer)),
            // 結尾不完整的影格直接捨棄，但 ffmpeg 失敗時要回報錯誤
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.finished = true;
                self.exit_error().map(Err)
            }
            Err(e) => {
                self.finished = true;
                Some(Err(anyhow::Error::new(e).context("讀取 ffmpeg 影格失敗")))
            }
        }
    }
}

impl FrameReader {
    fn exit_error(&mut self) -> Option<anyhow::Error> {
        let status = match self.child.wait() {
            Ok(status) => status,
            Err(e) => return Some(anyhow::Error::new(e).context("無法等待 ffmpeg 結束")),
        };
        if status.success() {
            return None;
        }

        let stderr = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        Some(anyhow!(
            "ffmpeg 解碼失敗 {} ({status}): {}",
            self.path.display(),
            stderr.trim()
        ))
    }
}

impl Drop for FrameReader {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
