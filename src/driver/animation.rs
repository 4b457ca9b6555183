//! # 高度动画
//!
//! ## 设计思路
//!
//! 动画被建模为显式的插值函数 `(current, target, elapsed) -> new`，
//! 与任何 UI 框架解耦，可以脱离渲染循环单独测试。
//!
//! - 默认使用临界阻尼弹簧（阻尼比 1.0，刚度 1500），从静止出发不会过冲；
//! - 也可选指数衰减（按半衰期逼近）；
//! - 目标变化时直接重定向正在进行的动画，保留当前速度，不排队。
//!
//! ## 实现思路
//!
//! 弹簧使用解析解推进，任意步长都稳定（不依赖固定帧率）。
//! 位移与速度都低于可见阈值时直接吸附到目标，保证有限时间内收敛。

use std::time::Duration;

/// 弹簧参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 刚度（1/s²）。
    pub stiffness: f32,
    /// 阻尼比，1.0 为临界阻尼。
    pub damping_ratio: f32,
    /// 可见阈值：位移与速度都低于该值时吸附到目标。
    pub visibility_threshold: f32,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            stiffness: 1500.0,
            damping_ratio: 1.0,
            visibility_threshold: 0.5,
        }
    }
}

/// 动画曲线。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationSpec {
    Spring(SpringSpec),
    Exponential {
        half_life: Duration,
        visibility_threshold: f32,
    },
    /// 无动画，直接跳到目标。
    Snap,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::Spring(SpringSpec::default())
    }
}

/// 按弹簧解析解推进一步，返回 `(新位置, 新速度)`。
pub fn spring_step(
    current: f32,
    velocity: f32,
    target: f32,
    elapsed: Duration,
    spec: &SpringSpec,
) -> (f32, f32) {
    let t = elapsed.as_secs_f64();
    if t <= 0.0 {
        return (current, velocity);
    }

    let omega = (spec.stiffness.max(f32::MIN_POSITIVE) as f64).sqrt();
    let zeta = spec.damping_ratio.max(f32::MIN_POSITIVE) as f64;
    let x0 = (current - target) as f64;
    let v0 = velocity as f64;

    let (x, v) = if (zeta - 1.0).abs() < 1e-4 {
        let c1 = x0;
        let c2 = v0 + omega * x0;
        let decay = (-omega * t).exp();
        ((c1 + c2 * t) * decay, (c2 - omega * (c1 + c2 * t)) * decay)
    } else if zeta > 1.0 {
        let root = omega * (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * zeta + root;
        let r2 = -omega * zeta - root;
        let c2 = (v0 - r1 * x0) / (r2 - r1);
        let c1 = x0 - c2;
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
    } else {
        let alpha = zeta * omega;
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let a = x0;
        let b = (v0 + alpha * x0) / omega_d;
        let decay = (-alpha * t).exp();
        let (sin, cos) = (omega_d * t).sin_cos();
        (
            decay * (a * cos + b * sin),
            decay * ((-alpha * a + b * omega_d) * cos + (-alpha * b - a * omega_d) * sin),
        )
    };

    let (x, v) = (x as f32, v as f32);
    if x.abs() < spec.visibility_threshold && v.abs() < spec.visibility_threshold {
        (target, 0.0)
    } else {
        (target + x, v)
    }
}

/// 按半衰期做指数逼近。
pub fn exponential_step(
    current: f32,
    target: f32,
    elapsed: Duration,
    half_life: Duration,
    visibility_threshold: f32,
) -> f32 {
    if half_life.is_zero() {
        return target;
    }
    let factor = 0.5_f64.powf(elapsed.as_secs_f64() / half_life.as_secs_f64()) as f32;
    let next = target + (current - target) * factor;
    if (next - target).abs() < visibility_threshold {
        target
    } else {
        next
    }
}

/// 每个组件实例一份的动画高度。
///
/// 每帧读取一次；新的目标只会重定向当前动画。
#[derive(Debug, Clone)]
pub struct AnimatedHeight {
    value: f32,
    velocity: f32,
    target: f32,
    spec: AnimationSpec,
}

impl AnimatedHeight {
    /// 以 `initial` 为起点与目标创建（首帧不做动画）。
    pub fn new(initial: f32, spec: AnimationSpec) -> Self {
        Self {
            value: initial,
            velocity: 0.0,
            target: initial,
            spec,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        if target != self.target {
            log::trace!("🎯 动画目标重定向：{} -> {}（当前 {}）", self.target, target, self.value);
            self.target = target;
        }
    }

    /// 推进 `elapsed` 时长并返回新值。
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        if self.is_settled() {
            return self.value;
        }

        match self.spec {
            AnimationSpec::Spring(spring) => {
                let (value, velocity) =
                    spring_step(self.value, self.velocity, self.target, elapsed, &spring);
                self.value = value;
                self.velocity = velocity;
            }
            AnimationSpec::Exponential {
                half_life,
                visibility_threshold,
            } => {
                self.value = exponential_step(
                    self.value,
                    self.target,
                    elapsed,
                    half_life,
                    visibility_threshold,
                );
                self.velocity = 0.0;
            }
            AnimationSpec::Snap => {
                self.value = self.target;
                self.velocity = 0.0;
            }
        }

        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn critically_damped_spring_converges_without_overshoot() {
        let mut anim = AnimatedHeight::new(60.0, AnimationSpec::default());
        anim.set_target(200.0);

        let mut ticks = 0;
        while !anim.is_settled() {
            let value = anim.advance(FRAME);
            assert!(value <= 200.0 + 1e-3, "overshoot: {}", value);
            ticks += 1;
            assert!(ticks < 120, "spring did not settle");
        }
        assert_eq!(anim.value(), 200.0);
    }

    #[test]
    fn spring_step_is_frame_rate_independent() {
        let spec = SpringSpec::default();
        let (one_step, _) = spring_step(0.0, 0.0, 100.0, Duration::from_millis(64), &spec);

        let mut value = 0.0;
        let mut velocity = 0.0;
        for _ in 0..4 {
            (value, velocity) = spring_step(value, velocity, 100.0, FRAME, &spec);
        }

        assert!((one_step - value).abs() < 1e-2);
    }

    #[test]
    fn underdamped_spring_overshoots_then_settles() {
        let spec = SpringSpec {
            stiffness: 400.0,
            damping_ratio: 0.3,
            visibility_threshold: 0.5,
        };
        let mut anim = AnimatedHeight::new(40.0, AnimationSpec::Spring(spec));
        anim.set_target(200.0);

        let mut peak = f32::MIN;
        for _ in 0..600 {
            peak = peak.max(anim.advance(FRAME));
        }

        assert!(peak > 200.0);
        assert!(anim.is_settled());
    }

    #[test]
    fn overdamped_spring_converges() {
        let spec = SpringSpec {
            stiffness: 800.0,
            damping_ratio: 2.0,
            visibility_threshold: 0.5,
        };
        let mut anim = AnimatedHeight::new(200.0, AnimationSpec::Spring(spec));
        anim.set_target(40.0);

        for _ in 0..300 {
            anim.advance(FRAME);
        }
        assert_eq!(anim.value(), 40.0);
    }

    #[test]
    fn exponential_step_halves_distance_per_half_life() {
        let half_life = Duration::from_millis(100);
        let next = exponential_step(0.0, 100.0, half_life, half_life, 0.01);
        assert!((next - 50.0).abs() < 1e-3);
        assert_eq!(exponential_step(99.9, 100.0, half_life, half_life, 0.5), 100.0);
        assert_eq!(exponential_step(0.0, 100.0, FRAME, Duration::ZERO, 0.5), 100.0);
    }

    #[test]
    fn redirect_keeps_single_animation() {
        let mut anim = AnimatedHeight::new(60.0, AnimationSpec::default());
        anim.set_target(200.0);
        anim.advance(FRAME);
        anim.advance(FRAME);
        let mid = anim.value();
        assert!(mid > 60.0 && mid < 200.0);

        anim.set_target(80.0);
        assert_eq!(anim.target(), 80.0);
        for _ in 0..120 {
            anim.advance(FRAME);
        }
        assert_eq!(anim.value(), 80.0);
    }

    #[test]
    fn snap_jumps_immediately() {
        let mut anim = AnimatedHeight::new(60.0, AnimationSpec::Snap);
        anim.set_target(120.0);
        assert_eq!(anim.advance(FRAME), 120.0);
        assert!(anim.is_settled());
    }

    #[test]
    fn zero_elapsed_is_noop() {
        let (value, velocity) =
            spring_step(10.0, 3.0, 100.0, Duration::ZERO, &SpringSpec::default());
        assert_eq!((value, velocity), (10.0, 3.0));
    }
}
