//! 轉檔影片日期還原元件
//!
//! 依檔名找出原始相機檔，將其日期複製到 Handbrake 轉檔後的影片

mod filename_matcher;
mod main;

pub use filename_matcher::{find_original, original_name_for};
pub use main::{DateCopier, DateCopyMatch, DateCopyResult, plan_date_copies};
