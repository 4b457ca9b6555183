//! 绘制表面抽象
//!
//! 合成器只关心“把源图某一段画进目标矩形”，具体栅格化交给宿主实现。
//! 内置实现见 `raster::RgbaSurface`。

use super::SourceImage;
use crate::error::StretchError;
use crate::slice::{DestRect, SourceRect};

/// 可绘制图片段的表面。
pub trait Surface {
    /// 把 `image` 中的 `src` 区域拉伸绘制到 `dst`（设备无关单位）。
    ///
    /// 三段互不重叠，按上 → 中 → 下依次调用，不需要混合。
    fn draw_band(
        &mut self,
        image: &SourceImage,
        src: SourceRect,
        dst: DestRect,
    ) -> Result<(), StretchError>;
}
