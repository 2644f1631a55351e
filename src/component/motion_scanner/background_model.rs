//! 自適應背景模型
//!
//! 每個像素維護一個高斯分布（平均值與變異數），
//! 與平均值差距過大的像素視為前景，並持續以學習率更新模型

use crate::tools::{Frame, PixelFormat};
use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundModelConfig {
    /// 學習率下限為 `1 / history`
    pub history: u32,
    /// 前景判定：`差距² > var_threshold × 變異數`
    pub var_threshold: f32,
    pub var_init: f32,
    pub var_min: f32,
    pub var_max: f32,
}

impl Default for BackgroundModelConfig {
    fn default() -> Self {
        Self {
            history: 500,
            var_threshold: 16.0,
            var_init: 15.0,
            var_min: 4.0,
            var_max: 75.0,
        }
    }
}

/// 前景遮罩，`true` 為前景
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<bool>,
}

impl ForegroundMask {
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    #[must_use]
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&fg| fg).count()
    }
}

pub struct BackgroundModel {
    config: BackgroundModelConfig,
    width: u32,
    height: u32,
    mean: Vec<f32>,
    variance: Vec<f32>,
    frames_seen: u64,
}

impl BackgroundModel {
    #[must_use]
    pub fn new(width: u32, height: u32, config: BackgroundModelConfig) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            mean: vec![0.0; pixels],
            variance: vec![config.var_init; pixels],
            config,
            frames_seen: 0,
        }
    }

    /// 以新影格更新模型並回傳前景遮罩，第一格只用來初始化，遮罩為空
    pub fn apply(&mut self, frame: &Frame) -> Result<ForegroundMask> {
        if frame.format != PixelFormat::Gray {
            bail!("背景模型只接受灰階影格");
        }
        if frame.width != self.width || frame.height != self.height {
            bail!(
                "影格尺寸 {}x{} 與模型 {}x{} 不符",
                frame.width,
                frame.height,
                self.width,
                self.height
            );
        }

        if self.frames_seen == 0 {
            for (mean, &pixel) in self.mean.iter_mut().zip(&frame.data) {
                *mean = f32::from(pixel);
            }
            self.frames_seen = 1;
            return Ok(ForegroundMask::empty(self.width, self.height));
        }

        self.frames_seen += 1;
        let learning_rate = self.learning_rate();
        let config = &self.config;

        let data = self
            .mean
            .iter_mut()
            .zip(self.variance.iter_mut())
            .zip(&frame.data)
            .map(|((mean, variance), &pixel)| {
                let diff = f32::from(pixel) - *mean;
                let dist2 = diff * diff;
                let foreground = dist2 > config.var_threshold * *variance;

                *mean += learning_rate * diff;
                *variance = (*variance + learning_rate * (dist2 - *variance))
                    .clamp(config.var_min, config.var_max);

                foreground
            })
            .collect();

        Ok(ForegroundMask {
            width: self.width,
            height: self.height,
            data,
        })
    }

    fn learning_rate(&self) -> f32 {
        let window = (2 * self.frames_seen).min(u64::from(self.config.history.max(1)));
        1.0 / window as f32
    }
}
