//! # 三段切片计算模块（slice）
//!
//! ## 设计思路
//!
//! 把源图按高度切成上 / 中 / 下三段：上下两段保持原生比例，中段吸收全部高度变化。
//! 本模块只做纯几何计算，不持有任何状态，可在每帧、任意线程安全调用。
//!
//! - `ratios`：由图片高度推导整数切片（保证三段像素高度之和严格等于图片高度）
//! - `calculation`：由切片、容器尺寸与拉伸高度计算六个矩形
//!
//! ## 调用链
//!
//! ```text
//! SourceImage（宽高）
//!    ↓
//! SliceRatios（top/middle/bottom 像素）
//!    ↓
//! SliceLayout::band_rects(container, stretch)
//!    ↓
//! BandRects（3 个源矩形 + 3 个目标矩形）
//! ```

mod calculation;
mod ratios;

pub use calculation::{available_stretch_height, compute_band_rects, SliceLayout};
pub use ratios::{SliceRatios, DEFAULT_MIDDLE_FRACTION, DEFAULT_TOP_FRACTION};
pub(crate) use ratios::validate_fractions;

/// 源图中的整数像素矩形。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// 画布中的目标矩形（设备无关单位）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DestRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// 下边缘坐标。
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// 容器尺寸（设备无关单位），由宿主每帧提供。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 上 / 中 / 下三段的通用容器。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands<T> {
    pub top: T,
    pub middle: T,
    pub bottom: T,
}

impl<T> Bands<T> {
    /// 按绘制顺序（上 → 中 → 下）返回三段。
    pub fn in_paint_order(&self) -> [&T; 3] {
        [&self.top, &self.middle, &self.bottom]
    }
}

/// 单帧的六个矩形：三个源矩形 + 三个目标矩形。
///
/// 每帧重新计算，不做持久化。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRects {
    pub source: Bands<SourceRect>,
    pub dest: Bands<DestRect>,
}
