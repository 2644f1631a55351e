//! 影片日期重設元件
//!
//! 以指定時間、天數偏移、檔名中的日期或重新命名稽核檔重設影片日期

mod filename_timestamp;
mod main;

pub use filename_timestamp::extract_filename_timestamp;
pub use main::{
    RedateMode, RedateResult, VideoRedater, local_to_fixed, move_exiftool_backup, shift_by_days,
};
