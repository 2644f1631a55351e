//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod date_copier;
pub mod motion_player;
pub mod motion_scanner;
pub mod name_reverter;
pub mod prompt;
pub mod video_redater;
pub mod video_renamer;

pub use date_copier::DateCopier;
pub use motion_player::MotionPlayer;
pub use motion_scanner::MotionScanner;
pub use name_reverter::NameReverter;
pub use video_redater::VideoRedater;
pub use video_renamer::VideoRenamer;
