//! 檔名還原元件
//!
//! 讀取重新命名稽核檔，依序把檔名改回原本的名稱

mod main;

pub use main::{NameReverter, RevertResult, revert_renames};
