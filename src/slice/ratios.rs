//! 切片比例
//!
//! 由图片高度与配置的比例推导三段整数像素高度。
//! 上段与中段按四舍五入取整，下段取剩余部分，
//! 因此取整误差全部由下段吸收，源图永远被无缝、无重叠地完整覆盖。

use crate::error::StretchError;

/// 默认上段占比（图片高度的 10%）。
pub const DEFAULT_TOP_FRACTION: f32 = 0.1;
/// 默认中段占比（图片高度的 10%）。
pub const DEFAULT_MIDDLE_FRACTION: f32 = 0.1;

/// 每张源图一份、不可变的切片结果。
///
/// 不变量：`top_px + middle_px + bottom_px == image_height`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceRatios {
    image_height: u32,
    top_px: u32,
    middle_px: u32,
    bottom_px: u32,
}

impl SliceRatios {
    /// 使用默认比例（10% / 10% / 剩余）切片。
    pub fn new(image_height: u32) -> Result<Self, StretchError> {
        Self::from_fractions(image_height, DEFAULT_TOP_FRACTION, DEFAULT_MIDDLE_FRACTION)
    }

    /// 按指定的上段 / 中段占比切片。
    ///
    /// # 约束
    /// - `image_height > 0`
    /// - `top`、`middle` 均在 `(0, 1)` 内，且 `top + middle < 1`
    pub fn from_fractions(image_height: u32, top: f32, middle: f32) -> Result<Self, StretchError> {
        if image_height == 0 {
            return Err(StretchError::InvalidDimension("图片高度为 0".to_string()));
        }
        validate_fractions(top, middle)?;

        // f32 在 2^24 以上无法精确表示整数像素，统一在 f64 中计算
        let height = f64::from(image_height);
        let top_px = ((height * widen(top)).round() as u32).min(image_height);
        let middle_px = ((height * widen(middle)).round() as u32).min(image_height - top_px);
        let bottom_px = image_height - top_px - middle_px;

        Ok(Self {
            image_height,
            top_px,
            middle_px,
            bottom_px,
        })
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn top_px(&self) -> u32 {
        self.top_px
    }

    pub fn middle_px(&self) -> u32 {
        self.middle_px
    }

    pub fn bottom_px(&self) -> u32 {
        self.bottom_px
    }

    /// 上段实际占比（取整后）。目标矩形按这个比例缩放。
    pub fn top_ratio(&self) -> f32 {
        self.top_px as f32 / self.image_height as f32
    }

    pub fn middle_ratio(&self) -> f32 {
        self.middle_px as f32 / self.image_height as f32
    }

    pub fn bottom_ratio(&self) -> f32 {
        self.bottom_px as f32 / self.image_height as f32
    }
}

pub(crate) fn validate_fractions(top: f32, middle: f32) -> Result<(), StretchError> {
    let in_unit = |v: f32| v.is_finite() && v > 0.0 && v < 1.0;
    if !in_unit(top) || !in_unit(middle) || top + middle >= 1.0 {
        return Err(StretchError::Config(format!(
            "切片比例非法：top={} middle={}（要求均在 (0,1) 内且和小于 1）",
            top, middle
        )));
    }
    Ok(())
}

/// 按最短十进制表示扩展为 f64，使 `0.1f32` 对应 `0.1f64` 而不是 `0.10000000149…`。
fn widen(fraction: f32) -> f64 {
    fraction
        .to_string()
        .parse()
        .unwrap_or_else(|_| f64::from(fraction))
}
