//! 影片批次重新命名元件
//!
//! 依分號分隔的紀錄檔將 `PICT0001.avi` 這類檔名改為 `內容_0001.avi`，
//! 並記錄新舊檔名以便還原

pub mod audit_log;
mod main;
pub mod rename_log;

pub use audit_log::{AuditWriter, RenameRecord, read_audit_log};
pub use main::{RenameResult, VideoRenamer, rename_sequences};
pub use rename_log::{NamePattern, RenameEntry, RenamePair, parse_rename_log, read_rename_log};
