//! # 可拉伸图片框 — 库入口
//!
//! 把一张源图切成上 / 中 / 下三段：上下两段保持原生高度比例，中段吸收全部高度变化，
//! 注入内容始终覆盖在中段之上。中段高度由外部信号（例如输入文本长度）驱动，
//! 经防抖与动画平滑后逐帧生效。
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  宿主（UI 框架 / 渲染循环）                │
//! │   set_signal(text)            render(surface, container) │
//! └───────┬──────────────────────────────────┬───────────────┘
//!         ↓                                  ↓
//! ┌───────┴──────────────┐   每帧读取一次   ┌─┴────────────────────┐
//! │ driver               │ ───────────────→ │ compositor           │
//! │  Debouncer           │   动画高度        │  SliceLayout（slice） │
//! │  HeightPolicy        │                  │  Surface::draw_band  │
//! │  AnimatedHeight      │                  │  OverlayRegion       │
//! └──────────────────────┘                  └──────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`slice`] | 纯几何：三段源矩形与目标矩形计算 |
//! | [`driver`] | 防抖状态机、高度策略、弹簧动画、时钟注入 |
//! | [`compositor`] | 每帧合成：绘制三段并给出覆盖区域 |
//! | [`config`] | `BoxConfig` 配置、JSON 加载、拉伸质量档位 |
//! | [`error`] | 统一错误类型 `StretchError` |

pub mod compositor;
pub mod config;
pub mod driver;
pub mod error;
pub mod slice;

pub use compositor::{Compositor, Frame, OverlayRegion, RgbaSurface, SourceImage, Surface};
pub use config::{BoxConfig, RenderQuality};
pub use driver::{HeightBounds, HeightDriver, HeightPolicy, LineCountPolicy};
pub use error::StretchError;
pub use slice::{BandRects, ContainerSize, SliceLayout, SliceRatios};
