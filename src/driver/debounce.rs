//! # 防抖状态机
//!
//! ## 设计思路
//!
//! 驱动信号可能在一个静默窗口内变化多次，只有“最后一次变化之后保持静默满 D”
//! 才提交。状态机为 `Idle → Pending → Settled`，任何新变化都会重新进入 `Pending`
//! 并重置计时。
//!
//! ## 实现思路
//!
//! - 纯状态机，不持有真实定时器，时间由调用方以 `Instant` 传入，便于测试。
//! - 两种驱动方式：
//!   1. 拉取式：每帧调用 `poll(now)`，到期即提交；
//!   2. 定时器式：`on_change` 返回 `TimerTicket`，宿主定时器到期后调用 `fire(ticket, now)`。
//!      每次变化都会递增代号，旧票据一律作废，过期定时器永远无法覆盖新值；
//!      提前触发的定时器同样不会提交，阶段保持 `Pending`。
//! - 外部已完成防抖的宿主可调用 `commit_value` 直接提交。

use std::time::{Duration, Instant};

/// 默认静默期。
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// 防抖阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePhase {
    /// 尚未发生过变化。
    Idle,
    /// 有变化在等待静默期结束。
    Pending,
    /// 最近一次变化已经提交。
    Settled,
}

/// 一次计时的凭据，`fire` 时用来判断该计时是否已被后续变化取消。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket {
    generation: u64,
    deadline: Instant,
}

impl TimerTicket {
    /// 该计时的到期时刻。
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// 单次检查的决策结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DebounceDecision {
    Commit,
    Wait { remaining: Duration },
}

/// 根据距上次变化的时长判断是否可以提交。
pub(crate) fn decide_commit(since_change: Duration, quiet: Duration) -> DebounceDecision {
    if since_change >= quiet {
        DebounceDecision::Commit
    } else {
        DebounceDecision::Wait {
            remaining: quiet - since_change,
        }
    }
}

/// 泛型防抖器。
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    latest: T,
    committed: T,
    phase: DebouncePhase,
    changed_at: Option<Instant>,
    generation: u64,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// 创建防抖器，已提交值与最新值都等于 `initial`。
    pub fn new(initial: T, quiet: Duration) -> Self {
        Self {
            quiet,
            latest: initial.clone(),
            committed: initial,
            phase: DebouncePhase::Idle,
            changed_at: None,
            generation: 0,
        }
    }

    /// 记录一次信号变化，并（重新）开始静默计时。
    ///
    /// 与最新值相同的输入不算变化，返回 `None` 且不重置计时。
    pub fn on_change(&mut self, value: T, now: Instant) -> Option<TimerTicket> {
        if value == self.latest {
            return None;
        }

        self.latest = value;
        self.phase = DebouncePhase::Pending;
        self.changed_at = Some(now);
        self.generation = self.generation.wrapping_add(1);

        Some(TimerTicket {
            generation: self.generation,
            deadline: now + self.quiet,
        })
    }

    /// 拉取式检查：静默期已满则提交并返回新值。
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.phase != DebouncePhase::Pending {
            return None;
        }
        let changed_at = self.changed_at?;

        match decide_commit(now.saturating_duration_since(changed_at), self.quiet) {
            DebounceDecision::Commit => Some(self.commit()),
            DebounceDecision::Wait { .. } => None,
        }
    }

    /// 定时器式提交：票据仍是最新一代且已到期时才提交。
    pub fn fire(&mut self, ticket: TimerTicket, now: Instant) -> Option<T> {
        if self.phase != DebouncePhase::Pending || ticket.generation != self.generation {
            log::trace!("⏭️ 忽略过期防抖计时（generation={}）", ticket.generation);
            return None;
        }
        if now < ticket.deadline {
            log::trace!(
                "⏳ 防抖计时提前触发，仍需等待 {:?}",
                ticket.deadline.saturating_duration_since(now)
            );
            return None;
        }
        Some(self.commit())
    }

    /// 直接提交一个已在外部完成防抖的值，并作废所有未到期的票据。
    pub fn commit_value(&mut self, value: T) -> T {
        self.latest = value;
        self.generation = self.generation.wrapping_add(1);
        self.commit()
    }

    /// 距离提交还剩多久；不在 `Pending` 时返回 `None`。
    pub fn time_until_commit(&self, now: Instant) -> Option<Duration> {
        if self.phase != DebouncePhase::Pending {
            return None;
        }
        let changed_at = self.changed_at?;
        match decide_commit(now.saturating_duration_since(changed_at), self.quiet) {
            DebounceDecision::Commit => Some(Duration::ZERO),
            DebounceDecision::Wait { remaining } => Some(remaining),
        }
    }

    pub fn phase(&self) -> DebouncePhase {
        self.phase
    }

    pub fn latest(&self) -> &T {
        &self.latest
    }

    pub fn committed(&self) -> &T {
        &self.committed
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    fn commit(&mut self) -> T {
        self.committed = self.latest.clone();
        self.phase = DebouncePhase::Settled;
        self.changed_at = None;
        self.committed.clone()
    }
}
