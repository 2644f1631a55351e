use super::background_model::{BackgroundModel, BackgroundModelConfig};
use super::blob_finder::{Blob, find_blobs};
use crate::config::MotionSettings;
use crate::tools::Frame;
use anyhow::Result;
use log::debug;

/// 第一個符合條件的前景區塊
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionHit {
    pub frame_index: u64,
    pub blob: Blob,
}

pub struct MotionDetector {
    area_threshold: f64,
    model_config: BackgroundModelConfig,
}

impl MotionDetector {
    #[must_use]
    pub const fn new(area_threshold: f64, model_config: BackgroundModelConfig) -> Self {
        Self {
            area_threshold,
            model_config,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &MotionSettings) -> Self {
        Self::new(
            settings.area_threshold,
            BackgroundModelConfig {
                history: settings.history,
                var_threshold: settings.var_threshold,
                ..BackgroundModelConfig::default()
            },
        )
    }

    /// 面積需落在 `(threshold, 畫面面積 / 2)`，
    /// 超過半個畫面的區塊視為光線變化而忽略
    #[must_use]
    pub fn is_motion_blob(&self, blob: &Blob, frame_pixels: u64) -> bool {
        let area = blob.area as f64;
        area > self.area_threshold && area < frame_pixels as f64 / 2.0
    }

    /// 逐格更新背景模型，找到第一個移動區塊就停止讀取
    pub fn scan<I>(&self, frames: I) -> Result<Option<MotionHit>>
    where
        I: IntoIterator<Item = Result<Frame>>,
    {
        let mut model: Option<BackgroundModel> = None;

        for (frame_index, frame) in (0u64..).zip(frames) {
            let frame = frame?;
            let model = model.get_or_insert_with(|| {
                BackgroundModel::new(frame.width, frame.height, self.model_config.clone())
            });

            let mask = model.apply(&frame)?;
            let frame_pixels = frame.pixel_count();

            if let Some(blob) = find_blobs(&mask)
                .into_iter()
                .find(|blob| self.is_motion_blob(blob, frame_pixels))
            {
                debug!(
                    "第 {frame_index} 格偵測到移動: 面積 {} 位置 {:?}",
                    blob.area, blob.bounding_box
                );
                return Ok(Some(MotionHit { frame_index, blob }));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::motion_scanner::blob_finder::BoundingBox;
    use crate::tools::{FrameReader, PixelFormat};
    use std::path::Path;

    const WIDTH: u32 = 20;
    const HEIGHT: u32 = 10;

    fn background() -> Frame {
        Frame::new(WIDTH, HEIGHT, PixelFormat::Gray, vec![40; 200]).unwrap()
    }

    /// 在背景上畫一個亮色矩形
    fn with_square(x: u32, y: u32, size: u32) -> Frame {
        let mut frame = background();
        for row in y..y + size {
            for col in x..x + size {
                frame.data[(row * WIDTH + col) as usize] = 230;
            }
        }
        frame
    }

    fn detector(threshold: f64) -> MotionDetector {
        MotionDetector::new(threshold, BackgroundModelConfig::default())
    }

    fn ok_frames(frames: Vec<Frame>) -> Vec<Result<Frame>> {
        frames.into_iter().map(Ok).collect()
    }

    #[test]
    fn test_zero_frames_is_no_motion() {
        assert_eq!(detector(1.0).scan(Vec::new()).unwrap(), None);
    }

    #[test]
    fn test_static_video_is_no_motion() {
        let frames = ok_frames(vec![background(); 10]);
        assert_eq!(detector(1.0).scan(frames).unwrap(), None);
    }

    #[test]
    fn test_detects_moving_square() {
        let frames = ok_frames(vec![
            background(),
            background(),
            background(),
            with_square(2, 2, 4),
            with_square(8, 2, 4),
        ]);
        let hit = detector(10.0).scan(frames).unwrap().unwrap();
        assert_eq!(hit.frame_index, 3);
        assert_eq!(hit.blob.area, 16);
        assert_eq!(
            hit.blob.bounding_box,
            BoundingBox {
                x: 2,
                y: 2,
                width: 4,
                height: 4,
            }
        );
    }

    #[test]
    fn test_area_at_threshold_is_ignored() {
        let frames = ok_frames(vec![background(), background(), with_square(2, 2, 4)]);
        assert_eq!(detector(16.0).scan(frames).unwrap(), None);
    }

    #[test]
    fn test_blob_over_half_frame_is_ignored() {
        let mut lit = background();
        lit.data.iter_mut().take(150).for_each(|p| *p = 230);
        let frames = ok_frames(vec![background(), background(), lit]);
        assert_eq!(detector(1.0).scan(frames).unwrap(), None);
    }

    #[test]
    fn test_stops_reading_after_first_hit() {
        let frames = vec![
            Ok(background()),
            Ok(background()),
            Ok(with_square(2, 2, 4)),
            Err(anyhow::anyhow!("不應讀到這一格")),
        ];
        assert!(detector(10.0).scan(frames).unwrap().is_some());
    }

    #[test]
    fn test_decode_error_propagates() {
        let frames = vec![Ok(background()), Err(anyhow::anyhow!("decode failed"))];
        assert!(detector(10.0).scan(frames).is_err());
    }

    #[test]
    fn test_failed_decoder_is_not_reported_as_still_video() {
        if std::process::Command::new("false").status().is_err() {
            println!("跳過測試：找不到 false 指令");
            return;
        }

        let reader =
            FrameReader::open("false", Path::new("broken.mp4"), 8, 8, PixelFormat::Gray).unwrap();
        assert!(detector(1.0).scan(reader).is_err());
    }

    #[test]
    fn test_is_motion_blob_band() {
        let detector = detector(100.0);
        let blob = |area| Blob {
            area,
            bounding_box: BoundingBox {
                x: 0,
                y: 0,
                width: 1,
                height: 1,
            },
        };
        assert!(!detector.is_motion_blob(&blob(100), 1000));
        assert!(detector.is_motion_blob(&blob(101), 1000));
        assert!(detector.is_motion_blob(&blob(499), 1000));
        assert!(!detector.is_motion_blob(&blob(500), 1000));
    }
}
