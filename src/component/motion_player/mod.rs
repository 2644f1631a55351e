//! 移動影片播放元件
//!
//! 依偵測結果依序播放有移動的影片，可暫停、跳過，離開時記錄進度

mod checkpoint;
mod key_listener;
mod main;
mod playback;
mod playlist;

pub use checkpoint::Checkpoint;
pub use key_listener::{KeyCommand, KeyListener};
pub use main::{MotionPlayer, PlaybackSummary};
pub use playback::{FfplaySink, FrameSink, PlaybackOutcome, frame_interval, play_frames};
pub use playlist::{Playlist, build_playlist};
