//! # 合成模块（compositor）
//!
//! ## 设计思路
//!
//! 每个渲染帧：
//! 1. 从高度驱动器取本帧动画高度（每帧只读一次）
//! 2. 钳制到当前容器可用范围，再交给切片计算得到六个矩形
//! 3. 按上 → 中 → 下绘制三段
//! 4. 返回覆盖区域，位置与高度直接取自中段目标矩形
//!
//! 图片绘制与覆盖区域共用同一个高度值，注入内容与图片中段逐帧同步。
//!
//! ## 错误恢复
//!
//! 几何错误（容器为 0 等）只跳过当前帧并记录警告，不中断渲染循环；
//! 下一帧以新的输入重新计算。

mod source_image;
mod raster;
mod surface;

pub use source_image::SourceImage;
pub use raster::RgbaSurface;
pub use surface::Surface;

use crate::driver::{Clock, HeightDriver, SystemClock, TimerTicket};
use crate::error::StretchError;
use crate::slice::{BandRects, ContainerSize, DestRect, SliceLayout, SliceRatios};

/// 注入内容的覆盖区域（设备无关单位）。
///
/// 上边缘等于上段目标高度，高度等于本帧拉伸高度，宽度铺满容器。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<DestRect> for OverlayRegion {
    fn from(rect: DestRect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// 单帧的布局结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub rects: BandRects,
    pub overlay: OverlayRegion,
    /// 本帧使用的拉伸高度（已按容器钳制）。
    pub stretch_height: f32,
}

/// 拉伸图片框合成器，每个组件实例一份。
pub struct Compositor<C: Clock = SystemClock> {
    image: SourceImage,
    layout: SliceLayout,
    driver: HeightDriver<C>,
}

impl<C: Clock> Compositor<C> {
    /// 使用默认切片比例（10% / 10% / 剩余）创建合成器。
    pub fn new(image: SourceImage, driver: HeightDriver<C>) -> Result<Self, StretchError> {
        let ratios = SliceRatios::new(image.height())?;
        Self::with_ratios(image, ratios, driver)
    }

    /// 使用指定切片创建；切片必须基于同一张源图。
    pub fn with_ratios(
        image: SourceImage,
        ratios: SliceRatios,
        driver: HeightDriver<C>,
    ) -> Result<Self, StretchError> {
        if ratios.image_height() != image.height() {
            return Err(StretchError::InvalidDimension(format!(
                "切片高度 {} 与源图高度 {} 不一致",
                ratios.image_height(),
                image.height()
            )));
        }
        let layout = SliceLayout::with_ratios(image.width(), ratios)?;

        log::info!(
            "🖼️ 合成器已创建：源图 {}x{}，切片 {}/{}/{} px",
            image.width(),
            image.height(),
            ratios.top_px(),
            ratios.middle_px(),
            ratios.bottom_px()
        );

        Ok(Self {
            image,
            layout,
            driver,
        })
    }

    /// 更新驱动信号（例如当前输入文本）。
    pub fn set_signal(&mut self, signal: impl Into<String>) -> Option<TimerTicket> {
        self.driver.set_signal(signal)
    }

    /// 提交已在外部防抖过的信号（例如 `spawn_debounce_task` 的输出）。
    pub fn commit_signal(&mut self, signal: impl Into<String>) -> bool {
        self.driver.commit_signal(signal)
    }

    /// 推进一次驱动器（检查防抖、更新目标、推进动画）并计算本帧布局，不绘制。
    ///
    /// 每帧只应调用一次；容器非法时返回 `None`。
    pub fn frame(&mut self, container: ContainerSize) -> Option<Frame> {
        let animated = self.driver.tick();
        let stretch_height = animated.clamp(0.0, self.layout.available_stretch_height(container.height));

        match self.layout.band_rects(container, stretch_height) {
            Ok(rects) => Some(Frame {
                rects,
                overlay: OverlayRegion::from(rects.dest.middle),
                stretch_height,
            }),
            Err(err) => {
                log::warn!("⚠️ 跳过本帧：{}", err);
                None
            }
        }
    }

    /// 计算布局并绘制三段，返回本帧结果供宿主放置覆盖内容。
    ///
    /// 任一段绘制失败时整帧作废并返回 `None`。
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        container: ContainerSize,
    ) -> Option<Frame> {
        let frame = self.frame(container)?;
        let source = frame.rects.source.in_paint_order();
        let dest = frame.rects.dest.in_paint_order();

        for (src, dst) in source.into_iter().zip(dest) {
            if let Err(err) = surface.draw_band(&self.image, *src, *dst) {
                log::warn!("⚠️ 绘制失败，跳过本帧：{}", err);
                return None;
            }
        }

        Some(frame)
    }

    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    pub fn layout(&self) -> &SliceLayout {
        &self.layout
    }

    pub fn driver(&self) -> &HeightDriver<C> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut HeightDriver<C> {
        &mut self.driver
    }
}
