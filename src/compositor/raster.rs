//! # 栅格表面
//!
//! ## 设计思路
//!
//! `RgbaSurface` 持有一张 `RgbaImage` 画布与像素密度（每单位像素数），
//! 把设备无关单位的目标矩形映射到像素后拉伸绘制。
//!
//! ## 实现思路
//!
//! 1. 目标矩形的每条边独立四舍五入到像素，相邻段共享同一条边，像素上仍然无缝
//! 2. 裁剪源图段
//! 3. 优先使用 `fast_image_resize` 拉伸，失败时回退 `image::imageops::resize`
//! 4. 覆盖写入画布（三段不重叠，无需混合）

use std::path::Path;

use fast_image_resize as fr;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};

use super::{SourceImage, Surface};
use crate::error::StretchError;
use crate::slice::{ContainerSize, DestRect, SourceRect};

/// 基于 RGBA 画布的表面实现。
pub struct RgbaSurface {
    canvas: RgbaImage,
    density: f32,
    filter: FilterType,
    resizer: fr::Resizer,
}

impl RgbaSurface {
    /// 按容器尺寸（单位）与像素密度创建画布。
    pub fn new(container: ContainerSize, density: f32, filter: FilterType) -> Result<Self, StretchError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(StretchError::InvalidDimension(format!("像素密度非法：{}", density)));
        }
        let width_px = to_pixels(container.width, density);
        let height_px = to_pixels(container.height, density);
        if width_px == 0 || height_px == 0 {
            return Err(StretchError::InvalidDimension(format!(
                "画布尺寸非法：{}x{}（density={}）",
                container.width, container.height, density
            )));
        }

        Ok(Self {
            canvas: RgbaImage::new(width_px, height_px),
            density,
            filter,
            resizer: fr::Resizer::new(),
        })
    }

    /// 画布对应的容器尺寸（单位）。
    pub fn container_size(&self) -> ContainerSize {
        ContainerSize::new(
            self.canvas.width() as f32 / self.density,
            self.canvas.height() as f32 / self.density,
        )
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    /// 用单一颜色填充整个画布。
    pub fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = color;
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// 保存画布，格式由扩展名推断。
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StretchError> {
        let path = path.as_ref();
        self.canvas
            .save(path)
            .map_err(|e| StretchError::Image(format!("保存画布失败 {}：{}", path.display(), e)))
    }

    /// 目标矩形 → 像素区域 `(x, y, width, height)`，按边取整并裁剪到画布内。
    fn pixel_rect(&self, dst: DestRect) -> (u32, u32, u32, u32) {
        let (cw, ch) = self.canvas.dimensions();
        let x0 = to_pixels(dst.x, self.density).min(cw);
        let y0 = to_pixels(dst.y, self.density).min(ch);
        let x1 = to_pixels(dst.x + dst.width, self.density).min(cw);
        let y1 = to_pixels(dst.bottom(), self.density).min(ch);
        (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    fn stretch_band(
        &mut self,
        band: RgbaImage,
        target_width: u32,
        target_height: u32,
    ) -> RgbaImage {
        if band.dimensions() == (target_width, target_height) {
            return band;
        }

        match resize_with_fast_image_resize(
            &mut self.resizer,
            &band,
            target_width,
            target_height,
            self.filter,
        ) {
            Ok(resized) => resized,
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 拉伸失败，回退 image::resize：{}", err);
                imageops::resize(&band, target_width, target_height, self.filter)
            }
        }
    }
}

impl Surface for RgbaSurface {
    fn draw_band(
        &mut self,
        image: &SourceImage,
        src: SourceRect,
        dst: DestRect,
    ) -> Result<(), StretchError> {
        let (x, y, width, height) = self.pixel_rect(dst);
        if width == 0 || height == 0 || src.width == 0 || src.height == 0 {
            return Ok(());
        }

        if src.x + src.width > image.width() || src.y + src.height > image.height() {
            return Err(StretchError::InvalidDimension(format!(
                "源矩形越界：({}, {}, {}, {}) 超出 {}x{}",
                src.x,
                src.y,
                src.width,
                src.height,
                image.width(),
                image.height()
            )));
        }

        let band = imageops::crop_imm(image.pixels(), src.x, src.y, src.width, src.height).to_image();
        let stretched = self.stretch_band(band, width, height);
        imageops::replace(&mut self.canvas, &stretched, x as i64, y as i64);
        Ok(())
    }
}

fn to_pixels(units: f32, density: f32) -> u32 {
    let px = (units * density).round();
    if px.is_finite() && px > 0.0 { px as u32 } else { 0 }
}

fn resize_with_fast_image_resize(
    resizer: &mut fr::Resizer,
    band: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, StretchError> {
    let (src_width, src_height) = band.dimensions();

    // 借用原缓冲，失败时调用方还要用它回退
    let src_image =
        fr::images::ImageRef::new(src_width, src_height, band.as_raw(), fr::PixelType::U8x4)
            .map_err(|e| StretchError::Image(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let options = fr::ResizeOptions::new().resize_alg(to_resize_alg(filter));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| StretchError::Image(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| StretchError::Image("fast_image_resize 输出缓冲长度异常".to_string()))
}

/// `image` 滤波器到 fast_image_resize 算法的映射。
///
/// `Nearest` 对应真正的最近邻采样而不是卷积：`speed` 档要的是无混色的硬边拉伸。
fn to_resize_alg(filter: FilterType) -> fr::ResizeAlg {
    let kernel = match filter {
        FilterType::Nearest => return fr::ResizeAlg::Nearest,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Gaussian,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    };
    fr::ResizeAlg::Convolution(kernel)
}
