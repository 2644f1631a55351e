use crate::component::motion_scanner::MotionScanRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// 結果檔中的檔名，尚未加上資料夾前綴
    pub filenames: Vec<String>,
    /// 有指定進度時，進度是否出現在結果檔中
    pub checkpoint_found: bool,
}

/// 只保留判定有移動的影片；有進度時略過進度（含）之前的所有列。
/// 進度不在結果檔中時不會播放任何影片
#[must_use]
pub fn build_playlist(records: &[MotionScanRecord], checkpoint: Option<&str>) -> Playlist {
    let start = match checkpoint {
        None => 0,
        Some(last) => match records.iter().position(|r| r.filename == last) {
            Some(index) => index + 1,
            None => {
                return Playlist {
                    filenames: Vec::new(),
                    checkpoint_found: false,
                };
            }
        },
    };

    Playlist {
        filenames: records[start..]
            .iter()
            .filter(|r| r.movement_detected)
            .map(|r| r.filename.clone())
            .collect(),
        checkpoint_found: true,
    }
}
