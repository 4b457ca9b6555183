//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 使用单一错误枚举 `StretchError` 承载切片计算、高度驱动与合成阶段的全部错误。
//! 几何错误由合成器在本地恢复（跳过当前帧），配置错误在构造阶段直接返回，
//! 让宿主在首帧之前就能失败。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - `PolicyOutOfRange` 不会从驱动器向外传播：驱动器会钳制并记录日志，
//!   该分支仅供宿主显式校验自定义策略时使用。

/// 拉伸图片框统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum StretchError {
    /// 图片或容器尺寸非法（零 / 负数 / NaN），或拉伸高度越界
    #[error("尺寸非法: {0}")]
    InvalidDimension(String),

    /// 高度上下限配置非法（要求 0 < min < max）
    #[error("高度范围非法: min={min} max={max}")]
    InvalidBounds { min: f32, max: f32 },

    /// 自定义高度策略返回了范围外的值
    #[error("高度策略输出越界: {value}（允许范围 [{min}, {max}]）")]
    PolicyOutOfRange { value: f32, min: f32, max: f32 },

    /// 其他配置错误（切片比例、防抖时长、动画参数等）
    #[error("配置错误: {0}")]
    Config(String),

    /// 栅格绘制阶段的图像错误
    #[error("图像错误: {0}")]
    Image(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StretchError> for String {
    /// 兼容仍使用字符串错误的宿主调用点。
    fn from(error: StretchError) -> Self {
        error.to_string()
    }
}
