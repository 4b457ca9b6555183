//! # 可拉伸图片框 — 演示入口
//!
//! 读取一张图片，模拟逐字输入一段文本，等待防抖与动画结束后把最终帧保存为图片。
//!
//! ```text
//! stretch-box <image> <text> <out.png> [width height density]
//! ```
//!
//! 环境变量 `STRETCH_BOX_CONFIG` 指向 JSON 配置文件时按该配置运行。

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::Rgba;
use stretch_box::config::{load_config_from_path, BoxConfig};
use stretch_box::driver::ManualClock;
use stretch_box::{ContainerSize, RgbaSurface, SourceImage, StretchError};

const KEYSTROKE_INTERVAL: Duration = Duration::from_millis(40);
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const MAX_SETTLE_FRAMES: usize = 600;

struct Args {
    image: PathBuf,
    text: String,
    output: PathBuf,
    container: ContainerSize,
    density: f32,
}

fn parse_args() -> Result<Args, StretchError> {
    let mut args = std::env::args().skip(1);
    let usage = || StretchError::Config("用法: stretch-box <image> <text> <out.png> [width height density]".to_string());

    let image = args.next().map(PathBuf::from).ok_or_else(usage)?;
    let text = args.next().ok_or_else(usage)?;
    let output = args.next().map(PathBuf::from).ok_or_else(usage)?;

    let mut number = |name: &str, default: f32| -> Result<f32, StretchError> {
        match args.next() {
            Some(raw) => raw
                .parse::<f32>()
                .map_err(|e| StretchError::Config(format!("参数 {} 非法：{}（{}）", name, raw, e))),
            None => Ok(default),
        }
    };
    let width = number("width", 300.0)?;
    let height = number("height", 400.0)?;
    let density = number("density", 1.0)?;

    Ok(Args {
        image,
        text,
        output,
        container: ContainerSize::new(width, height),
        density,
    })
}

fn load_config() -> Result<BoxConfig, StretchError> {
    match std::env::var_os("STRETCH_BOX_CONFIG") {
        Some(path) => load_config_from_path(Path::new(&path)),
        None => Ok(BoxConfig::default()),
    }
}

fn run() -> Result<(), StretchError> {
    let args = parse_args()?;
    let config = load_config()?;

    let decoded = image::open(&args.image)
        .map_err(|e| StretchError::Image(format!("读取图片失败 {}：{}", args.image.display(), e)))?;
    let source = SourceImage::from_dynamic(decoded)?;

    let clock = ManualClock::new();
    let mut compositor = config.build_compositor_with_clock(source, "", clock.clone())?;

    // 逐字输入，期间每帧推进一次
    let mut typed = String::new();
    for ch in args.text.chars() {
        typed.push(ch);
        compositor.set_signal(typed.clone());
        let mut waited = Duration::ZERO;
        while waited < KEYSTROKE_INTERVAL {
            compositor.frame(args.container);
            clock.advance(FRAME_INTERVAL);
            waited += FRAME_INTERVAL;
        }
    }

    let mut frames = 0;
    while !compositor.driver().is_idle() && frames < MAX_SETTLE_FRAMES {
        compositor.frame(args.container);
        clock.advance(FRAME_INTERVAL);
        frames += 1;
    }
    log::info!(
        "⏱️ 输入结束后 {} 帧静止（虚拟时间 {}ms）",
        frames,
        clock.elapsed().as_millis()
    );

    let mut surface = RgbaSurface::new(args.container, args.density, config.quality.filter())?;
    surface.clear(Rgba([0, 0, 0, 0]));
    let frame = compositor
        .render(&mut surface, args.container)
        .ok_or_else(|| StretchError::InvalidDimension("最终帧绘制失败".to_string()))?;

    log::info!(
        "🧩 覆盖区域：x={} y={} width={} height={}（目标高度 {}）",
        frame.overlay.x,
        frame.overlay.y,
        frame.overlay.width,
        frame.overlay.height,
        compositor.driver().target_height()
    );

    surface.save(&args.output)?;
    log::info!("✅ 已保存 {}", args.output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
