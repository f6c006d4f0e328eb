//! # Ticker 模块
//!
//! tick 源抽象。引擎只会请求启动/停止，真正的计时由宿主提供。
//!
//! 默认实现 [`IntervalTicker`] 面向按帧更新的宿主：每帧把经过的时间喂给它，
//! 它按固定间隔折算出应当执行的 tick 数。

use std::time::Duration;

/// 默认 tick 间隔
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5);

/// tick 源接口
pub trait TickSource {
    /// 启动（已在运行时保持运行）
    fn start(&mut self);

    /// 停止
    fn stop(&mut self);

    /// 是否正在运行
    fn is_running(&self) -> bool;

    /// tick 间隔
    fn interval(&self) -> Duration;

    /// 经过 `elapsed` 后应当执行的 tick 数
    ///
    /// 未运行时始终返回 0。
    fn poll(&mut self, elapsed: Duration) -> u32;
}

/// 固定间隔 tick 源
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    interval: Duration,
    running: bool,
    /// 尚未折算成 tick 的时间
    pending: Duration,
}

impl IntervalTicker {
    /// 创建 tick 源
    ///
    /// 零间隔会被提升为 1ms。
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            running: false,
            pending: Duration::ZERO,
        }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.pending = Duration::ZERO;
        }
    }

    fn stop(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn poll(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }

        self.pending += elapsed;
        let due = self.pending.as_nanos() / self.interval.as_nanos();
        let due = u32::try_from(due).unwrap_or(u32::MAX);
        self.pending = self
            .pending
            .saturating_sub(self.interval.saturating_mul(due));
        due
    }
}
