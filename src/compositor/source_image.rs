//! 源图封装
//!
//! 源图由外部解码，创建后只读。内部用 `Arc` 共享像素，
//! 多个表面并发读取时无需任何同步。

use std::sync::Arc;

use image::{DynamicImage, RgbaImage};

use crate::error::StretchError;

/// 只读源图。克隆只复制引用计数。
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
}

impl SourceImage {
    /// 包装已解码的 RGBA 图像；宽或高为 0 时拒绝。
    pub fn new(pixels: RgbaImage) -> Result<Self, StretchError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(StretchError::InvalidDimension(format!(
                "源图尺寸非法：{}x{}",
                width, height
            )));
        }
        Ok(Self {
            pixels: Arc::new(pixels),
        })
    }

    /// 从任意像素格式的图像转换。
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, StretchError> {
        Self::new(image.to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_image() {
        let err = SourceImage::new(RgbaImage::new(0, 10)).unwrap_err();
        assert!(matches!(err, StretchError::InvalidDimension(_)));
    }

    #[test]
    fn test_clone_shares_pixels() {
        let image = SourceImage::new(RgbaImage::new(4, 8)).expect("valid image");
        let shared = image.clone();

        assert!(std::ptr::eq(image.pixels(), shared.pixels()));
        assert_eq!((shared.width(), shared.height()), (4, 8));
    }
}
