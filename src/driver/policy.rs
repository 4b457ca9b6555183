//! # 高度策略
//!
//! ## 设计思路
//!
//! “信号 → 目标高度”的映射是可插拔的占位策略。契约只要求：
//! - 对信号长度单调不减
//! - 输出落在 `[min, max]` 内（越界由驱动器钳制并记录）
//! - 确定性
//!
//! 默认策略 `LineCountPolicy` 按每 10 个字符计一行、每行 20 个单位增长。

use crate::error::StretchError;

/// 拉伸高度的上下限。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBounds {
    min: f32,
    max: f32,
}

impl HeightBounds {
    /// 构造高度范围，要求 `0 < min < max` 且均为有限值。
    pub fn new(min: f32, max: f32) -> Result<Self, StretchError> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min >= max {
            return Err(StretchError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for HeightBounds {
    fn default() -> Self {
        Self {
            min: 40.0,
            max: 200.0,
        }
    }
}

/// 把已防抖的信号映射为目标拉伸高度。
pub trait HeightPolicy {
    fn target_height(&self, signal: &str, bounds: &HeightBounds) -> f32;
}

impl<F> HeightPolicy for F
where
    F: Fn(&str, &HeightBounds) -> f32,
{
    fn target_height(&self, signal: &str, bounds: &HeightBounds) -> f32 {
        self(signal, bounds)
    }
}

/// 默认策略：`min + max(1, 字符数 / chars_per_band) * unit_increment`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCountPolicy {
    pub chars_per_band: usize,
    pub unit_increment: f32,
}

impl Default for LineCountPolicy {
    fn default() -> Self {
        Self {
            chars_per_band: 10,
            unit_increment: 20.0,
        }
    }
}

impl LineCountPolicy {
    /// 信号对应的“行数”，至少为 1。按 Unicode 标量计数。
    pub fn bands(&self, signal: &str) -> usize {
        let per_band = self.chars_per_band.max(1);
        (signal.chars().count() / per_band).max(1)
    }
}

impl HeightPolicy for LineCountPolicy {
    fn target_height(&self, signal: &str, bounds: &HeightBounds) -> f32 {
        let raw = bounds.min() + self.bands(signal) as f32 * self.unit_increment;
        bounds.clamp(raw)
    }
}

/// 校验策略输出是否在范围内，宿主可用它在接入自定义策略时提前发现问题。
pub fn check_policy_output(value: f32, bounds: &HeightBounds) -> Result<f32, StretchError> {
    if bounds.contains(value) {
        Ok(value)
    } else {
        Err(StretchError::PolicyOutOfRange {
            value,
            min: bounds.min(),
            max: bounds.max(),
        })
    }
}

/// 求值策略并钳制到范围内；越界时记录警告而不是报错。
pub(crate) fn resolve_target(
    policy: &dyn HeightPolicy,
    signal: &str,
    bounds: &HeightBounds,
) -> f32 {
    let raw = policy.target_height(signal, bounds);
    match check_policy_output(raw, bounds) {
        Ok(value) => value,
        Err(err) => {
            let clamped = bounds.clamp(raw);
            log::warn!("⚠️ {}，已钳制为 {}", err, clamped);
            clamped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_validation() {
        assert!(HeightBounds::new(40.0, 200.0).is_ok());
        assert!(matches!(
            HeightBounds::new(200.0, 40.0),
            Err(StretchError::InvalidBounds { .. })
        ));
        assert!(HeightBounds::new(40.0, 40.0).is_err());
        assert!(HeightBounds::new(0.0, 40.0).is_err());
        assert!(HeightBounds::new(10.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_default_policy_reference_values() {
        let policy = LineCountPolicy::default();
        let bounds = HeightBounds::default();

        assert_eq!(policy.target_height("", &bounds), 60.0);
        // 13 个字符 → 1 行
        assert_eq!(policy.target_height("hello world!!", &bounds), 60.0);
        assert_eq!(policy.target_height(&"x".repeat(30), &bounds), 100.0);
        // 超过上限时钳制
        assert_eq!(policy.target_height(&"x".repeat(500), &bounds), 200.0);
    }

    #[test]
    fn test_bands_count_chars_not_bytes() {
        let policy = LineCountPolicy::default();
        // 20 个汉字 = 60 字节，但只有 20 个字符
        assert_eq!(policy.bands(&"字".repeat(20)), 2);
    }

    #[test]
    fn test_resolve_target_clamps_out_of_range_policy() {
        let bounds = HeightBounds::default();
        let too_big = |_: &str, _: &HeightBounds| 1_000.0_f32;
        let too_small = |_: &str, _: &HeightBounds| -5.0_f32;
        let not_a_number = |_: &str, _: &HeightBounds| f32::NAN;

        assert_eq!(resolve_target(&too_big, "a", &bounds), 200.0);
        assert_eq!(resolve_target(&too_small, "a", &bounds), 40.0);
        assert_eq!(resolve_target(&not_a_number, "a", &bounds), 40.0);
    }

    #[test]
    fn test_check_policy_output() {
        let bounds = HeightBounds::default();
        assert_eq!(check_policy_output(100.0, &bounds).ok(), Some(100.0));
        assert!(matches!(
            check_policy_output(250.0, &bounds),
            Err(StretchError::PolicyOutOfRange { .. })
        ));
    }
}
