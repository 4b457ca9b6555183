//! 切片几何计算
//!
//! 纯函数实现：输入图片尺寸、切片、容器尺寸与拉伸高度，输出唯一的六个矩形。
//!
//! # 设计思路
//!
//! - 源矩形只依赖图片，按整数像素切分，三段首尾相接。
//! - 目标矩形：上段按取整后的 `top_ratio` 缩放到容器高度，中段高度即拉伸高度，
//!   下段取剩余部分，三段严格铺满容器高度。
//! - 先校验再计算，非法输入直接返回 `InvalidDimension`，由调用方决定跳过当前帧。

use super::{BandRects, Bands, ContainerSize, DestRect, SliceRatios, SourceRect};
use crate::error::StretchError;

/// 绑定到某一张源图的切片布局。
///
/// 每张源图构造一次，之后每帧调用 [`SliceLayout::band_rects`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceLayout {
    image_width: u32,
    ratios: SliceRatios,
}

impl SliceLayout {
    /// 使用默认比例（10% / 10% / 剩余）创建布局。
    pub fn new(image_width: u32, image_height: u32) -> Result<Self, StretchError> {
        Self::with_ratios(image_width, SliceRatios::new(image_height)?)
    }

    pub fn with_ratios(image_width: u32, ratios: SliceRatios) -> Result<Self, StretchError> {
        if image_width == 0 {
            return Err(StretchError::InvalidDimension("图片宽度为 0".to_string()));
        }
        Ok(Self { image_width, ratios })
    }

    pub fn ratios(&self) -> &SliceRatios {
        &self.ratios
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// 源图中三段的像素矩形，与容器无关。
    pub fn source_rects(&self) -> Bands<SourceRect> {
        let width = self.image_width;
        let top_px = self.ratios.top_px();
        let middle_px = self.ratios.middle_px();

        Bands {
            top: SourceRect::new(0, 0, width, top_px),
            middle: SourceRect::new(0, top_px, width, middle_px),
            bottom: SourceRect::new(0, top_px + middle_px, width, self.ratios.bottom_px()),
        }
    }

    /// 计算单帧的六个矩形。
    ///
    /// # 参数
    /// * `container`      - 容器尺寸，宽高必须为正
    /// * `stretch_height` - 中段目标高度，必须满足 `0 <= stretch_height <= container.height`
    ///
    /// # 后置条件
    /// - `dest.top.height + dest.middle.height + dest.bottom.height == container.height`
    /// - `dest.middle.y == dest.top.height`
    ///
    /// # 示例
    /// ```
    /// use stretch_box::slice::{ContainerSize, SliceLayout};
    ///
    /// let layout = SliceLayout::new(100, 100)?;
    /// let rects = layout.band_rects(ContainerSize::new(300.0, 400.0), 150.0)?;
    /// assert_eq!(rects.dest.middle.y, 40.0);
    /// assert_eq!(rects.dest.bottom.height, 210.0);
    /// # Ok::<(), stretch_box::StretchError>(())
    /// ```
    pub fn band_rects(
        &self,
        container: ContainerSize,
        stretch_height: f32,
    ) -> Result<BandRects, StretchError> {
        validate_container(container)?;

        if !stretch_height.is_finite() || stretch_height < 0.0 {
            return Err(StretchError::InvalidDimension(format!(
                "拉伸高度非法：{}",
                stretch_height
            )));
        }
        if stretch_height > container.height {
            return Err(StretchError::InvalidDimension(format!(
                "拉伸高度 {} 超过容器高度 {}",
                stretch_height, container.height
            )));
        }

        let width = container.width;
        let top_height = container.height * self.ratios.top_ratio();
        let bottom_height = container.height - top_height - stretch_height;

        Ok(BandRects {
            source: self.source_rects(),
            dest: Bands {
                top: DestRect::new(0.0, 0.0, width, top_height),
                middle: DestRect::new(0.0, top_height, width, stretch_height),
                bottom: DestRect::new(0.0, top_height + stretch_height, width, bottom_height),
            },
        })
    }

    /// 当前容器下中段可用的最大高度（扣除上段后剩余的部分）。
    pub fn available_stretch_height(&self, container_height: f32) -> f32 {
        available_stretch_height(&self.ratios, container_height)
    }
}

/// 使用默认切片比例计算六个矩形。
pub fn compute_band_rects(
    image_width: u32,
    image_height: u32,
    container: ContainerSize,
    stretch_height: f32,
) -> Result<BandRects, StretchError> {
    SliceLayout::new(image_width, image_height)?.band_rects(container, stretch_height)
}

/// 中段可用的最大高度：`container_height - container_height * top_ratio`，不小于 0。
///
/// 调用方在调用 [`SliceLayout::band_rects`] 之前用它钳制拉伸高度，保证下段高度非负。
pub fn available_stretch_height(ratios: &SliceRatios, container_height: f32) -> f32 {
    if !container_height.is_finite() || container_height <= 0.0 {
        return 0.0;
    }
    (container_height - container_height * ratios.top_ratio()).max(0.0)
}

fn validate_container(container: ContainerSize) -> Result<(), StretchError> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(container.width) || !valid(container.height) {
        return Err(StretchError::InvalidDimension(format!(
            "容器尺寸非法：{}x{}",
            container.width, container.height
        )));
    }
    Ok(())
}
