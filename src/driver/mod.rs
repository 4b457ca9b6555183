//! # 高度驱动模块（driver）
//!
//! ## 设计思路
//!
//! 把“原始信号 → 防抖信号 → 目标高度 → 动画高度”拆成独立的显式状态单元，
//! 每个渲染帧按固定规则拉取更新，不依赖任何响应式框架：
//!
//! ```text
//! set_signal(text)                        （事件循环写入）
//!    ↓
//! Debouncer（Idle → Pending → Settled）    clock/debounce
//!    ↓ 提交
//! HeightPolicy + 钳制到 [min, max]         policy
//!    ↓
//! AnimatedHeight（弹簧 / 指数逼近）         animation
//!    ↓
//! tick() → 当前动画高度                    （每帧读取一次）
//! ```
//!
//! ## 实现思路
//!
//! - 时钟通过 `Clock` 注入，测试使用 `ManualClock` 精确推进。
//! - 所有可变状态只有一个写入方（事件 / 渲染循环），因此不需要锁。
//! - 已有 tokio 运行时的宿主可以改用 `spawn_debounce_task` 完成防抖，
//!   再把输出交给 `commit_signal`，避免二次防抖。

mod animation;
mod async_debounce;
mod clock;
mod debounce;
mod policy;

use std::time::{Duration, Instant};

pub use animation::{exponential_step, spring_step, AnimatedHeight, AnimationSpec, SpringSpec};
pub use async_debounce::spawn_debounce_task;
pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::{DebouncePhase, Debouncer, TimerTicket, DEFAULT_QUIET_PERIOD};
pub use policy::{check_policy_output, HeightBounds, HeightPolicy, LineCountPolicy};

use crate::error::StretchError;

/// 高度驱动器配置。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    pub bounds: HeightBounds,
    pub quiet_period: Duration,
    pub animation: AnimationSpec,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            bounds: HeightBounds::default(),
            quiet_period: DEFAULT_QUIET_PERIOD,
            animation: AnimationSpec::default(),
        }
    }
}

impl DriverConfig {
    pub(crate) fn validate(&self) -> Result<(), StretchError> {
        if self.quiet_period.is_zero() {
            return Err(StretchError::Config("防抖静默期不能为 0".to_string()));
        }
        match self.animation {
            AnimationSpec::Spring(spring) => {
                let positive = |v: f32| v.is_finite() && v > 0.0;
                if !positive(spring.stiffness)
                    || !positive(spring.damping_ratio)
                    || !positive(spring.visibility_threshold)
                {
                    return Err(StretchError::Config(format!(
                        "弹簧参数非法：stiffness={} damping_ratio={} threshold={}",
                        spring.stiffness, spring.damping_ratio, spring.visibility_threshold
                    )));
                }
            }
            AnimationSpec::Exponential {
                half_life,
                visibility_threshold,
            } => {
                // 需要瞬间到位请使用 Snap
                if half_life.is_zero() {
                    return Err(StretchError::Config("指数动画半衰期不能为 0".to_string()));
                }
                if !visibility_threshold.is_finite() || visibility_threshold <= 0.0 {
                    return Err(StretchError::Config(format!(
                        "可见阈值非法：{}",
                        visibility_threshold
                    )));
                }
            }
            AnimationSpec::Snap => {}
        }
        Ok(())
    }
}

/// 每个组件实例一份的高度驱动器。
pub struct HeightDriver<C: Clock = SystemClock> {
    clock: C,
    bounds: HeightBounds,
    policy: Box<dyn HeightPolicy>,
    debouncer: Debouncer<String>,
    animation: AnimatedHeight,
    last_tick: Option<Instant>,
}

impl HeightDriver<SystemClock> {
    /// 使用系统时钟与默认策略创建驱动器。
    pub fn new(initial_signal: impl Into<String>, config: DriverConfig) -> Result<Self, StretchError> {
        Self::with_clock(initial_signal, config, LineCountPolicy::default(), SystemClock)
    }
}

impl<C: Clock> HeightDriver<C> {
    /// 使用指定策略与时钟创建驱动器。
    ///
    /// 初始状态即为已提交：防抖值等于初始信号，动画高度直接位于初始目标，首帧不做动画。
    pub fn with_clock(
        initial_signal: impl Into<String>,
        config: DriverConfig,
        policy: impl HeightPolicy + 'static,
        clock: C,
    ) -> Result<Self, StretchError> {
        config.validate()?;

        let initial_signal = initial_signal.into();
        let boxed: Box<dyn HeightPolicy> = Box::new(policy);
        let initial_target = policy::resolve_target(boxed.as_ref(), &initial_signal, &config.bounds);

        log::info!(
            "📐 高度驱动器已创建：bounds=[{}, {}] quiet={}ms initial={}",
            config.bounds.min(),
            config.bounds.max(),
            config.quiet_period.as_millis(),
            initial_target
        );

        Ok(Self {
            clock,
            bounds: config.bounds,
            policy: boxed,
            debouncer: Debouncer::new(initial_signal, config.quiet_period),
            animation: AnimatedHeight::new(initial_target, config.animation),
            last_tick: None,
        })
    }

    /// 更新驱动信号，（重新）开始静默计时。
    ///
    /// 返回的票据可交给宿主定时器，到期后调用 [`HeightDriver::fire`]；
    /// 只依赖 [`HeightDriver::tick`] 拉取的宿主可以忽略它。
    pub fn set_signal(&mut self, signal: impl Into<String>) -> Option<TimerTicket> {
        let now = self.clock.now();
        self.debouncer.on_change(signal.into(), now)
    }

    /// 宿主定时器到期回调；过期或提前触发的票据被忽略。
    pub fn fire(&mut self, ticket: TimerTicket) -> bool {
        let now = self.clock.now();
        match self.debouncer.fire(ticket, now) {
            Some(committed) => {
                self.retarget(&committed);
                true
            }
            None => false,
        }
    }

    /// 提交一个已在外部防抖过的信号，立即更新目标高度。
    ///
    /// 与当前已提交值相同时不做任何事，返回 `false`。
    pub fn commit_signal(&mut self, signal: impl Into<String>) -> bool {
        let signal = signal.into();
        if self.debouncer.phase() != DebouncePhase::Pending && signal == *self.debouncer.committed() {
            return false;
        }
        let committed = self.debouncer.commit_value(signal);
        self.retarget(&committed);
        true
    }

    /// 渲染帧入口：检查防抖、更新目标并推进动画，返回本帧使用的高度。
    pub fn tick(&mut self) -> f32 {
        let now = self.clock.now();

        if let Some(committed) = self.debouncer.poll(now) {
            self.retarget(&committed);
        }

        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);

        let value = self.animation.advance(elapsed);
        log::trace!("🎞️ 动画帧：height={:.2} target={:.2}", value, self.animation.target());
        value
    }

    /// 当前动画高度（不推进）。
    pub fn current_height(&self) -> f32 {
        self.animation.value()
    }

    /// 当前目标高度，恒在 `[min, max]` 内。
    pub fn target_height(&self) -> f32 {
        self.animation.target()
    }

    pub fn debounced_signal(&self) -> &str {
        self.debouncer.committed()
    }

    pub fn phase(&self) -> DebouncePhase {
        self.debouncer.phase()
    }

    pub fn bounds(&self) -> &HeightBounds {
        &self.bounds
    }

    /// 防抖已提交且动画已静止。
    pub fn is_idle(&self) -> bool {
        self.debouncer.phase() != DebouncePhase::Pending && self.animation.is_settled()
    }

    fn retarget(&mut self, committed: &str) {
        let target = policy::resolve_target(self.policy.as_ref(), committed, &self.bounds);
        log::debug!(
            "✅ 防抖信号已提交（{} 个字符），目标高度 {} -> {}",
            committed.chars().count(),
            self.animation.target(),
            target
        );
        // 静止期间不累计时间，新动画从提交时刻开始
        if self.animation.is_settled() {
            self.last_tick = Some(self.clock.now());
        }
        self.animation.set_target(target);
    }
}
