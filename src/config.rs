//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有可调参数集中到 `BoxConfig`：高度范围、防抖时长、切片比例、默认策略参数、
//! 动画曲线与拉伸质量。配置可从 JSON 文件加载，缺失字段取默认值。
//!
//! ## 实现思路
//!
//! - `Default` 与原始组件行为一致（40 / 200、300ms、10% / 10%、临界阻尼弹簧）。
//! - `validate` 在构造阶段拒绝非法配置，宿主在首帧之前即可失败。
//! - `RenderQuality` 作为高层语义映射到具体拉伸滤镜。

use std::fs;
use std::path::Path;
use std::time::Duration;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::compositor::{Compositor, SourceImage};
use crate::driver::{
    AnimationSpec, Clock, DriverConfig, HeightBounds, HeightDriver, LineCountPolicy, SpringSpec,
    SystemClock,
};
use crate::error::StretchError;
use crate::slice::SliceRatios;

/// 拉伸质量档位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderQuality {
    Quality,
    Balanced,
    Speed,
}

impl RenderQuality {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```
    /// use stretch_box::config::RenderQuality;
    ///
    /// let q = RenderQuality::from_str("Speed")?;
    /// assert_eq!(q.as_str(), "speed");
    /// # Ok::<(), stretch_box::StretchError>(())
    /// ```
    pub fn from_str(quality: &str) -> Result<Self, StretchError> {
        match quality.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(StretchError::Config(format!(
                "未知拉伸质量：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    /// 对应的拉伸滤镜。
    pub fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::CatmullRom,
            Self::Balanced => FilterType::Triangle,
            Self::Speed => FilterType::Nearest,
        }
    }
}

/// 动画曲线种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Spring,
    Exponential,
    Snap,
}

/// 拉伸图片框配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    /// 中段最小拉伸高度（单位）。
    pub min_stretch_height: f32,
    /// 中段最大拉伸高度（单位）。
    pub max_stretch_height: f32,
    /// 防抖静默期（毫秒），必须大于 0。
    pub debounce_ms: u64,
    /// 上段占图片高度的比例。
    pub top_ratio: f32,
    /// 中段占图片高度的比例。
    pub middle_ratio: f32,
    /// 默认策略：每行增加的高度。
    pub unit_increment: f32,
    /// 默认策略：每行字符数。
    pub chars_per_band: usize,
    pub animation: AnimationKind,
    pub spring_stiffness: f32,
    pub spring_damping_ratio: f32,
    /// 指数逼近的半衰期（毫秒），必须大于 0；需要瞬间到位时使用 `snap`。
    pub half_life_ms: u64,
    /// 动画吸附到目标的阈值（单位）。
    pub visibility_threshold: f32,
    pub quality: RenderQuality,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            min_stretch_height: 40.0,
            max_stretch_height: 200.0,
            debounce_ms: 300,
            top_ratio: 0.1,
            middle_ratio: 0.1,
            unit_increment: 20.0,
            chars_per_band: 10,
            animation: AnimationKind::Spring,
            spring_stiffness: 1500.0,
            spring_damping_ratio: 1.0,
            half_life_ms: 60,
            visibility_threshold: 0.5,
            quality: RenderQuality::Balanced,
        }
    }
}

impl BoxConfig {
    /// 校验全部参数。
    pub fn validate(&self) -> Result<(), StretchError> {
        self.driver_config()?;
        crate::slice::validate_fractions(self.top_ratio, self.middle_ratio)?;

        if self.chars_per_band == 0 {
            return Err(StretchError::Config("chars_per_band 不能为 0".to_string()));
        }
        if !self.unit_increment.is_finite() || self.unit_increment < 0.0 {
            return Err(StretchError::Config(format!(
                "unit_increment 非法：{}",
                self.unit_increment
            )));
        }
        Ok(())
    }

    pub fn bounds(&self) -> Result<HeightBounds, StretchError> {
        HeightBounds::new(self.min_stretch_height, self.max_stretch_height)
    }

    pub fn animation_spec(&self) -> AnimationSpec {
        match self.animation {
            AnimationKind::Spring => AnimationSpec::Spring(SpringSpec {
                stiffness: self.spring_stiffness,
                damping_ratio: self.spring_damping_ratio,
                visibility_threshold: self.visibility_threshold,
            }),
            AnimationKind::Exponential => AnimationSpec::Exponential {
                half_life: Duration::from_millis(self.half_life_ms),
                visibility_threshold: self.visibility_threshold,
            },
            AnimationKind::Snap => AnimationSpec::Snap,
        }
    }

    pub fn driver_config(&self) -> Result<DriverConfig, StretchError> {
        let config = DriverConfig {
            bounds: self.bounds()?,
            quiet_period: Duration::from_millis(self.debounce_ms),
            animation: self.animation_spec(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn policy(&self) -> LineCountPolicy {
        LineCountPolicy {
            chars_per_band: self.chars_per_band,
            unit_increment: self.unit_increment,
        }
    }

    pub fn slice_ratios(&self, image_height: u32) -> Result<SliceRatios, StretchError> {
        SliceRatios::from_fractions(image_height, self.top_ratio, self.middle_ratio)
    }

    /// 按配置组装合成器（系统时钟）。
    pub fn build_compositor(
        &self,
        image: SourceImage,
        initial_signal: impl Into<String>,
    ) -> Result<Compositor<SystemClock>, StretchError> {
        self.build_compositor_with_clock(image, initial_signal, SystemClock)
    }

    /// 按配置组装合成器，使用指定时钟。
    pub fn build_compositor_with_clock<C: Clock>(
        &self,
        image: SourceImage,
        initial_signal: impl Into<String>,
        clock: C,
    ) -> Result<Compositor<C>, StretchError> {
        self.validate()?;
        let driver =
            HeightDriver::with_clock(initial_signal, self.driver_config()?, self.policy(), clock)?;
        let ratios = self.slice_ratios(image.height())?;
        Compositor::with_ratios(image, ratios, driver)
    }
}

/// 从 JSON 文件加载配置。
///
/// 文件不存在或无法解析时回退默认配置（记录警告）；结果随后会被校验。
pub fn load_config_from_path(config_path: &Path) -> Result<BoxConfig, StretchError> {
    let config = if config_path.exists() {
        match fs::read_to_string(config_path) {
            Ok(content) => match serde_json::from_str::<BoxConfig>(&content) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("解析配置文件失败，使用默认配置: {}", err);
                    BoxConfig::default()
                }
            },
            Err(err) => {
                log::warn!("读取配置文件失败，使用默认配置: {}", err);
                BoxConfig::default()
            }
        }
    } else {
        BoxConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// 将配置写为格式化 JSON。
pub fn save_config_to_path(config_path: &Path, config: &BoxConfig) -> Result<(), StretchError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| StretchError::Config(format!("序列化配置失败: {}", e)))?;
    fs::write(config_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir() -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("stretch-box-config-test-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn default_config_is_valid() {
        let config = BoxConfig::default();
        config.validate().expect("defaults are valid");
        assert_eq!(config.driver_config().expect("driver").quiet_period, Duration::from_millis(300));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config = BoxConfig {
            min_stretch_height: 200.0,
            max_stretch_height: 40.0,
            ..BoxConfig::default()
        };
        assert!(matches!(config.validate(), Err(StretchError::InvalidBounds { .. })));
    }

    #[test]
    fn zero_debounce_rejected() {
        let config = BoxConfig {
            debounce_ms: 0,
            ..BoxConfig::default()
        };
        assert!(matches!(config.validate(), Err(StretchError::Config(_))));
    }

    #[test]
    fn zero_half_life_rejected_for_exponential_only() {
        let exponential = BoxConfig {
            animation: AnimationKind::Exponential,
            half_life_ms: 0,
            ..BoxConfig::default()
        };
        assert!(matches!(exponential.validate(), Err(StretchError::Config(_))));

        // 半衰期只对指数动画生效
        let spring = BoxConfig {
            half_life_ms: 0,
            ..BoxConfig::default()
        };
        assert!(spring.validate().is_ok());
    }

    #[test]
    fn bad_ratios_rejected() {
        let config = BoxConfig {
            top_ratio: 0.7,
            middle_ratio: 0.3,
            ..BoxConfig::default()
        };
        assert!(matches!(config.validate(), Err(StretchError::Config(_))));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: BoxConfig =
            serde_json::from_str(r#"{"max_stretch_height": 320, "quality": "speed"}"#).expect("parse");

        assert_eq!(config.max_stretch_height, 320.0);
        assert_eq!(config.min_stretch_height, 40.0);
        assert_eq!(config.quality, RenderQuality::Speed);
        assert_eq!(config.quality.filter(), FilterType::Nearest);
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let dir = unique_temp_dir();
        let config_path = dir.join("stretch-box.json");
        let config = BoxConfig {
            debounce_ms: 150,
            animation: AnimationKind::Exponential,
            ..BoxConfig::default()
        };

        save_config_to_path(&config_path, &config).expect("save config");
        let loaded = load_config_from_path(&config_path).expect("load config");

        assert_eq!(loaded, config);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn load_bad_config_falls_back_to_default() {
        let dir = unique_temp_dir();
        let config_path = dir.join("stretch-box.json");
        std::fs::write(&config_path, "not-json").expect("write invalid config");

        let loaded = load_config_from_path(&config_path).expect("fallback");
        assert_eq!(loaded, BoxConfig::default());

        let missing = load_config_from_path(&dir.join("missing.json")).expect("fallback");
        assert_eq!(missing, BoxConfig::default());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn invalid_values_in_file_are_rejected() {
        let dir = unique_temp_dir();
        let config_path = dir.join("stretch-box.json");
        std::fs::write(&config_path, r#"{"min_stretch_height": 0}"#).expect("write config");

        assert!(load_config_from_path(&config_path).is_err());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn quality_parsing() {
        assert_eq!(RenderQuality::from_str(" Quality ").expect("parse"), RenderQuality::Quality);
        assert!(RenderQuality::from_str("ultra").is_err());
        assert_eq!(RenderQuality::Balanced.as_str(), "balanced");
    }
}
