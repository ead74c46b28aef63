//! # 光栅数据模块
//!
//! [`Raster`] 是所有核心操作共享的统一内存表示：按行优先、再按通道顺序排列的 8 位样本。

use crate::error::{Result, StegoError};
use image::{DynamicImage, ExtendedColorType};

/// 每个像素的通道布局。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

impl ChannelLayout {
    /// 每个像素的通道数。
    pub fn count(self) -> usize {
        match self {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }

    pub(crate) fn color_type(self) -> ExtendedColorType {
        match self {
            ChannelLayout::Rgb => ExtendedColorType::Rgb8,
            ChannelLayout::Rgba => ExtendedColorType::Rgba8,
        }
    }
}

/// 一幅图像的像素样本。
///
/// 不变式：`samples.len() == width * height * layout.count()`，且宽高均为正数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    samples: Vec<u8>,
}

impl Raster {
    /// 构造一个光栅，并校验样本数量与尺寸是否一致。
    ///
    /// # Errors
    ///
    /// 宽或高为 0，或样本数量不等于 `W·H·C` 时返回 [`StegoError::MalformedRaster`]。
    pub fn new(width: u32, height: u32, layout: ChannelLayout, samples: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(StegoError::MalformedRaster(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(layout.count()))
            .ok_or_else(|| {
                StegoError::MalformedRaster(format!("{width}x{height} overflows sample count"))
            })?;

        if samples.len() != expected {
            return Err(StegoError::MalformedRaster(format!(
                "expected {expected} samples for {width}x{height}x{}, got {}",
                layout.count(),
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            layout,
            samples,
        })
    }

    /// 从解码后的图像构造光栅：带 alpha 的图像转为 RGBA8，其余转为 RGB8。
    pub fn from_image(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        if image.color().has_alpha() {
            Raster::new(width, height, ChannelLayout::Rgba, image.into_rgba8().into_raw())
        } else {
            Raster::new(width, height, ChannelLayout::Rgb, image.into_rgb8().into_raw())
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.count()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// 样本总数，即 `W·H·C`。
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// 以相同尺寸和布局、替换后的样本构造新光栅。
    pub(crate) fn with_samples(&self, samples: Vec<u8>) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        Self {
            width: self.width,
            height: self.height,
            layout: self.layout,
            samples,
        }
    }
}
