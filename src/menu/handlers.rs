//! 各功能的進入點，每次都重新讀取設定檔以取得最近使用的路徑

use crate::component::{
    DateCopier, MotionPlayer, MotionScanner, NameReverter, VideoRedater, VideoRenamer,
};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use log::warn;
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn report(term: &Term, shutdown_signal: &AtomicBool, result: Result<()>) -> Result<()> {
    if let Err(e) = result {
        warn!("功能執行失敗: {e:#}");
        eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold());
    }
    // 下一個功能重新開始
    shutdown_signal.store(false, Ordering::SeqCst);

    pause(term)
}

pub fn run_date_copier(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let copier = DateCopier::new(config, Arc::clone(shutdown_signal));
    report(term, shutdown_signal, copier.run())
}

pub fn run_video_renamer(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let renamer = VideoRenamer::new(config, Arc::clone(shutdown_signal));
    report(term, shutdown_signal, renamer.run())
}

pub fn run_name_reverter(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let reverter = NameReverter::new(config, Arc::clone(shutdown_signal));
    report(term, shutdown_signal, reverter.run())
}

pub fn run_video_redater(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let redater = VideoRedater::new(config, Arc::clone(shutdown_signal));
    report(term, shutdown_signal, redater.run())
}

pub fn run_motion_scanner(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let mut scanner = MotionScanner::new(config, Arc::clone(shutdown_signal));
    report(term, shutdown_signal, scanner.run())
}

pub fn run_motion_player(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let player = MotionPlayer::new(config, Arc::clone(shutdown_signal));
    report(term, shutdown_signal, player.run())
}
