//! 端對端測試 - 需要 ffmpeg / ffprobe / exiftool
//!
//! 找不到外部工具時會跳過

use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::{DateTime, FixedOffset};
use tempfile::TempDir;
use video_library_tools::component::date_copier::DateCopier;
use video_library_tools::component::motion_scanner::MotionScanner;
use video_library_tools::component::video_redater::{RedateMode, VideoRedater};
use video_library_tools::config::Config;
use video_library_tools::tools::{
    ExifTool, FILE_MODIFY_DATE, QUICKTIME_CREATE_DATE, QUICKTIME_MODIFY_DATE, get_video_info,
};

fn tool_available(name: &str, version_arg: &str) -> bool {
    Command::new(name)
        .arg(version_arg)
        .output()
        .is_ok_and(|output| output.status.success())
}

fn ffmpeg_available() -> bool {
    tool_available("ffmpeg", "-version") && tool_available("ffprobe", "-version")
}

fn exiftool_available() -> bool {
    ExifTool::new("exiftool", true).is_available()
}

/// 產生測試影片；`moving` 為真時畫面中有白色方塊由左往右移動
fn make_video(path: &Path, moving: bool) {
    let overlay_x = if moving { "10+t*40" } else { "10" };
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-loglevel", "error", "-y"])
        .args(["-f", "lavfi", "-i", "color=c=black:s=160x120:d=2:r=10"]);
    if moving {
        cmd.args(["-f", "lavfi", "-i", "color=c=white:s=20x20:d=2:r=10"])
            .args([
                "-filter_complex",
                &format!("[0][1]overlay=x='{overlay_x}':y=50:shortest=1"),
            ]);
    }
    let status = cmd
        .args(["-c:v", "mpeg4", "-q:v", "2", "-pix_fmt", "yuv420p"])
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success(), "ffmpeg 無法產生測試影片");
}

fn parse(raw: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(raw).unwrap()
}

#[test]
fn test_motion_scan_e2e() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg 或 ffprobe");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    make_video(&temp_dir.path().join("moving.mp4"), true);
    make_video(&temp_dir.path().join("still.mp4"), false);

    let info = get_video_info("ffprobe", &temp_dir.path().join("moving.mp4")).unwrap();
    assert_eq!((info.width, info.height), (160, 120));
    assert!((info.frame_rate - 10.0).abs() < 0.01);

    let mut config = Config::default();
    config.settings.motion.area_threshold = 100.0;
    let scanner = MotionScanner::new(config, Arc::new(AtomicBool::new(false)));

    let records = scanner.scan_folder(temp_dir.path()).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].filename.ends_with("moving.mp4"));
    assert!(records[0].movement_detected, "移動方塊應被偵測到");
    assert!(records[1].filename.ends_with("still.mp4"));
    assert!(!records[1].movement_detected, "靜止畫面不應有移動");

    println!("✓ 移動偵測端對端測試通過");
}

#[test]
fn test_date_copier_e2e() {
    if !ffmpeg_available() || !exiftool_available() {
        println!("跳過測試：找不到 ffmpeg 或 exiftool");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let original_dir = temp_dir.path();
    let converted_dir = original_dir.join("video_converted");
    std::fs::create_dir(&converted_dir).unwrap();

    let original = original_dir.join("MVI_0001.MP4");
    make_video(&original, false);
    make_video(&converted_dir.join("MVI 0001-1.mp4"), false);

    let exiftool = ExifTool::new("exiftool", true);
    exiftool
        .write_tags(
            &original,
            &[(FILE_MODIFY_DATE, "2019:07:04 06:31:00+02:00".to_string())],
        )
        .unwrap();

    let mut config = Config::default();
    config.settings.tools.overwrite_original = true;
    let copier = DateCopier::new(config, Arc::new(AtomicBool::new(false)));
    let result = copier.copy_dates(original_dir, &converted_dir).unwrap();
    assert_eq!(result.updated, 1);
    assert_eq!(result.errors, 0);

    let converted = converted_dir.join("MVI 0001-1.mp4");
    let modified = exiftool.read_date(&converted, FILE_MODIFY_DATE).unwrap();
    assert_eq!(modified, parse("2019-07-04T06:31:00+02:00"));

    let tags = exiftool
        .read_tags(&converted, &[QUICKTIME_CREATE_DATE, QUICKTIME_MODIFY_DATE])
        .unwrap();
    assert!(tags.contains_key(QUICKTIME_CREATE_DATE));
    assert!(tags.contains_key(QUICKTIME_MODIFY_DATE));

    let mtime = std::fs::metadata(&converted).unwrap().modified().unwrap();
    let mtime: DateTime<chrono::Utc> = mtime.into();
    assert_eq!(mtime, modified);

    println!("✓ 日期還原端對端測試通過");
}

#[test]
fn test_redate_fixed_e2e() {
    if !ffmpeg_available() || !exiftool_available() {
        println!("跳過測試：找不到 ffmpeg 或 exiftool");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    make_video(&temp_dir.path().join("clip.mp4"), false);

    let mut config = Config::default();
    config.settings.tools.overwrite_original = true;
    let redater = VideoRedater::new(config, Arc::new(AtomicBool::new(false)));

    let date = parse("2021-03-14T15:09:26+08:00");
    let result = redater
        .redate_folder(temp_dir.path(), &RedateMode::Fixed(date))
        .unwrap();
    assert_eq!(result.updated, 1);

    let written = ExifTool::new("exiftool", true)
        .read_date(&temp_dir.path().join("clip.mp4"), FILE_MODIFY_DATE)
        .unwrap();
    assert_eq!(written, date);

    println!("✓ 日期重設端對端測試通過");
}
