//! # Engine 模块
//!
//! 动画引擎：持有实例存储、tick 源与订阅表，每个 tick 推进全部实例。
//!
//! ```rust,ignore
//! let mut engine: AnimationEngine<Color> = AnimationEngine::multiple();
//! engine.on_progress(|engine| request_repaint(engine));
//!
//! // 鼠标按下：以点击位置为中心启动涟漪
//! engine.start_new_animation_with(AnimationDirection::In, (12.0, 8.0), Some(color));
//!
//! // 每帧
//! engine.update(frame_dt);
//! for i in 0..engine.animation_count() {
//!     let radius = engine.progress_at(i)? * max_radius;
//!     let center = engine.source_at(i)?;
//! }
//! ```
//!
//! 引擎是单线程的：`advance()`、启动与访问方法都应在同一个线程（UI 线程）上调用，
//! 引擎本身不做任何同步。

use std::fmt;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{EngineConfig, validate_increment};
use crate::direction::AnimationDirection;
use crate::easing::EffectType;
use crate::error::{EffectError, EffectResult};
use crate::instance::{AnimationInstance, Point};
use crate::observer::{Channel, Observers, SubscriptionId};
use crate::store::{EngineMode, InstanceStore};
use crate::ticker::{IntervalTicker, TickSource};

/// 单次 `update()` 最多补跑的 tick 数
///
/// 宿主挂起后恢复时经过的时间可能很长，超出部分直接丢弃。
pub const MAX_CATCH_UP_TICKS: u32 = 100;

/// 单个 tick 的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// 本 tick 清除的实例数（仅多实例模式）
    pub removed: usize,
    /// 本 tick 是否停止了 tick 源
    pub finished: bool,
    /// 尚未结束的实例数
    pub active: usize,
}

/// 动画引擎
///
/// `D` 是调用方附加在每个实例上的数据类型，引擎不解读。
pub struct AnimationEngine<D: 'static = ()> {
    /// 实例存储（构造时按模式选定）
    store: Box<dyn InstanceStore<D>>,
    /// tick 源
    ticker: Box<dyn TickSource>,
    /// 进度/完成通知
    observers: Observers<AnimationEngine<D>>,
    /// 主步长
    increment: f64,
    /// 往返下降阶段的步长
    secondary_increment: f64,
    /// 读取进度时的缓动效果
    effect: EffectType,
    /// 动画进行中再次启动时是否替换
    interrupt: bool,
}

impl<D: 'static> fmt::Debug for AnimationEngine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationEngine")
            .field("mode", &self.store.mode())
            .field("animations", &self.store.len())
            .field("animating", &self.ticker.is_running())
            .field("increment", &self.increment)
            .field("secondary_increment", &self.secondary_increment)
            .field("effect", &self.effect)
            .field("interrupt", &self.interrupt)
            .field("observers", &self.observers)
            .finish()
    }
}

impl<D: 'static> Default for AnimationEngine<D> {
    fn default() -> Self {
        Self::singular()
    }
}

impl<D: 'static> AnimationEngine<D> {
    /// 按模式创建引擎，其余参数使用默认配置
    pub fn new(mode: EngineMode) -> Self {
        let defaults = EngineConfig::default();
        Self {
            store: mode.create_store(),
            ticker: Box::new(IntervalTicker::new(defaults.interval())),
            observers: Observers::new(),
            increment: defaults.increment,
            secondary_increment: defaults.secondary_increment,
            effect: defaults.effect,
            interrupt: defaults.interrupt,
        }
    }

    /// 单实例引擎
    pub fn singular() -> Self {
        Self::new(EngineMode::Singular)
    }

    /// 多实例引擎
    pub fn multiple() -> Self {
        Self::new(EngineMode::Multiple)
    }

    /// 从配置创建引擎
    pub fn from_config(config: &EngineConfig) -> EffectResult<Self> {
        config.validate()?;
        Ok(Self {
            store: config.mode.create_store(),
            ticker: Box::new(IntervalTicker::new(config.interval())),
            observers: Observers::new(),
            increment: config.increment,
            secondary_increment: config.secondary_increment,
            effect: config.effect,
            interrupt: config.interrupt,
        })
    }

    /// 设置缓动效果
    pub fn with_effect(mut self, effect: EffectType) -> Self {
        self.effect = effect;
        self
    }

    /// 设置替换策略
    pub fn with_interrupt(mut self, interrupt: bool) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// 替换 tick 源（例如宿主自己的 UI 定时器）
    pub fn with_ticker(mut self, ticker: impl TickSource + 'static) -> Self {
        self.ticker = Box::new(ticker);
        self
    }

    /// 设置主步长
    pub fn with_increment(mut self, increment: f64) -> EffectResult<Self> {
        self.set_increment(increment)?;
        Ok(self)
    }

    /// 设置往返下降阶段的步长
    pub fn with_secondary_increment(mut self, secondary_increment: f64) -> EffectResult<Self> {
        self.set_secondary_increment(secondary_increment)?;
        Ok(self)
    }

    // ========== 参数 ==========

    pub fn mode(&self) -> EngineMode {
        self.store.mode()
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// 设置主步长，必须在 (0, 1] 之间
    pub fn set_increment(&mut self, increment: f64) -> EffectResult<()> {
        validate_increment("increment", increment)?;
        self.increment = increment;
        Ok(())
    }

    pub fn secondary_increment(&self) -> f64 {
        self.secondary_increment
    }

    /// 设置下降阶段步长，必须在 (0, 1] 之间
    pub fn set_secondary_increment(&mut self, secondary_increment: f64) -> EffectResult<()> {
        validate_increment("secondary_increment", secondary_increment)?;
        self.secondary_increment = secondary_increment;
        Ok(())
    }

    pub fn effect(&self) -> EffectType {
        self.effect
    }

    pub fn set_effect(&mut self, effect: EffectType) {
        self.effect = effect;
    }

    pub fn interrupt(&self) -> bool {
        self.interrupt
    }

    pub fn set_interrupt(&mut self, interrupt: bool) {
        self.interrupt = interrupt;
    }

    // ========== 动画控制 ==========

    /// 启动方向为 `direction` 的动画，起点为原点，无附加数据
    pub fn start_new_animation(&mut self, direction: AnimationDirection) -> Option<usize> {
        self.start_new_animation_with(direction, Point::origin(), None)
    }

    /// 启动动画并记录起点
    pub fn start_new_animation_at(
        &mut self,
        direction: AnimationDirection,
        origin: impl Into<Point>,
    ) -> Option<usize> {
        self.start_new_animation_with(direction, origin, None)
    }

    /// 启动动画
    ///
    /// 动画进行中且不允许替换时，本次调用只会（重新）启动 tick 源。
    ///
    /// # 返回
    /// - `Some(index)`: 新实例的索引（单实例模式总是 0）
    /// - `None`: 请求被忽略
    pub fn start_new_animation_with(
        &mut self,
        direction: AnimationDirection,
        origin: impl Into<Point>,
        payload: Option<D>,
    ) -> Option<usize> {
        let placed = if !self.ticker.is_running() || self.interrupt {
            self.store.place(AnimationInstance::new(direction, origin.into(), payload));
            let index = match self.store.mode() {
                EngineMode::Singular => 0,
                EngineMode::Multiple => self.store.len() - 1,
            };
            debug!(direction = %direction, index, mode = ?self.store.mode(), "启动动画");
            Some(index)
        } else {
            debug!(direction = %direction, "动画进行中且不允许替换，忽略启动请求");
            None
        };

        self.ticker.start();
        placed
    }

    /// 按名称启动动画
    ///
    /// 名称无法识别时返回 `InvalidDirection`，引擎状态不变。
    pub fn start_new_animation_named(
        &mut self,
        direction: &str,
        origin: impl Into<Point>,
        payload: Option<D>,
    ) -> EffectResult<Option<usize>> {
        let direction: AnimationDirection = direction.parse()?;
        Ok(self.start_new_animation_with(direction, origin, payload))
    }

    /// 推进一个 tick
    ///
    /// 由 tick 源每个间隔调用一次。
    pub fn advance(&mut self) -> TickReport {
        let (increment, secondary) = (self.increment, self.secondary_increment);
        for instance in self.store.as_mut_slice() {
            instance.step(increment, secondary);
        }

        let removed = self.store.sweep();
        if removed > 0 {
            debug!(removed, remaining = self.store.len(), "清除已结束的动画");
        }

        let active = self
            .store
            .as_mut_slice()
            .iter()
            .filter(|instance| !instance.is_terminal())
            .count();
        trace!(active, "tick");

        self.notify(Channel::Progress);

        let finished = self.store.is_settled() && self.ticker.is_running();
        if finished {
            self.ticker.stop();
            debug!(mode = ?self.store.mode(), "动画全部结束，停止 tick 源");
            self.notify(Channel::Finished);
        }

        TickReport {
            removed,
            finished,
            active,
        }
    }

    /// 按经过的时间推进
    ///
    /// 向 tick 源询问到期的 tick 数并依次执行，tick 源停止后不再继续。
    /// 最多执行 [`MAX_CATCH_UP_TICKS`] 个 tick。
    ///
    /// # 返回
    /// 实际执行的 tick 数
    pub fn update(&mut self, elapsed: Duration) -> u32 {
        let due = self.ticker.poll(elapsed);
        if due > MAX_CATCH_UP_TICKS {
            debug!(due, max = MAX_CATCH_UP_TICKS, "到期 tick 过多，丢弃超出部分");
        }
        let due = due.min(MAX_CATCH_UP_TICKS);
        let mut processed = 0;
        for _ in 0..due {
            if !self.ticker.is_running() {
                break;
            }
            self.advance();
            processed += 1;
        }
        processed
    }

    fn notify(&mut self, channel: Channel) {
        // 回调可以启动动画、订阅或取消订阅
        let mut observers = self.observers.detach();
        observers.notify(channel, self);
        self.observers.reattach(observers);
    }

    // ========== 订阅 ==========

    /// 订阅进度通知（每个 tick 一次）
    pub fn on_progress(&mut self, callback: impl FnMut(&mut Self) + 'static) -> SubscriptionId {
        self.observers.subscribe(Channel::Progress, callback)
    }

    /// 订阅完成通知（tick 源停止时一次）
    ///
    /// 回调中可以接着启动下一个动画，tick 源会重新启动。
    pub fn on_finished(&mut self, callback: impl FnMut(&mut Self) + 'static) -> SubscriptionId {
        self.observers.subscribe(Channel::Finished, callback)
    }

    /// 取消订阅
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ========== 查询方法 ==========

    /// tick 源是否在运行
    pub fn is_animating(&self) -> bool {
        self.ticker.is_running()
    }

    /// 实例数量（单实例模式总是 1）
    pub fn animation_count(&self) -> usize {
        self.store.len()
    }

    /// 缓动后的进度
    pub fn progress_at(&self, index: usize) -> EffectResult<f64> {
        let instance = self.store.get(index)?;
        Ok(self.effect.calculate(instance.progress()))
    }

    /// 未缓动的原始进度
    pub fn raw_progress_at(&self, index: usize) -> EffectResult<f64> {
        Ok(self.store.get(index)?.progress())
    }

    pub fn direction_at(&self, index: usize) -> EffectResult<AnimationDirection> {
        Ok(self.store.get(index)?.direction())
    }

    /// 动画起点
    pub fn source_at(&self, index: usize) -> EffectResult<Point> {
        Ok(self.store.get(index)?.origin())
    }

    pub fn data_at(&self, index: usize) -> EffectResult<Option<&D>> {
        Ok(self.store.get(index)?.payload())
    }

    /// 替换附加数据
    pub fn set_data_at(&mut self, index: usize, payload: Option<D>) -> EffectResult<()> {
        self.store.get_mut(index)?.set_payload(payload);
        Ok(())
    }

    /// 直接设置方向，不触发边界转移
    pub fn set_direction_at(
        &mut self,
        index: usize,
        direction: AnimationDirection,
    ) -> EffectResult<()> {
        self.store.get_mut(index)?.set_direction(direction);
        Ok(())
    }

    /// 直接设置原始进度，超出 [0, 1] 的值被截断
    pub fn set_progress_at(&mut self, index: usize, progress: f64) -> EffectResult<()> {
        if !progress.is_finite() {
            return Err(EffectError::InvalidProgress { value: progress });
        }
        self.store.get_mut(index)?.set_progress(progress);
        Ok(())
    }

    // ========== 单实例访问 ==========

    fn singular_index(&self) -> EffectResult<usize> {
        match self.store.mode() {
            EngineMode::Singular => Ok(0),
            EngineMode::Multiple => Err(EffectError::invalid_operation(
                "多实例模式下必须指定动画索引",
            )),
        }
    }

    /// 缓动后的进度（仅单实例模式）
    pub fn progress(&self) -> EffectResult<f64> {
        self.progress_at(self.singular_index()?)
    }

    /// 当前方向（仅单实例模式）
    pub fn direction(&self) -> EffectResult<AnimationDirection> {
        self.direction_at(self.singular_index()?)
    }

    /// 动画起点（仅单实例模式）
    pub fn source(&self) -> EffectResult<Point> {
        self.source_at(self.singular_index()?)
    }

    /// 附加数据（仅单实例模式）
    pub fn data(&self) -> EffectResult<Option<&D>> {
        self.data_at(self.singular_index()?)
    }

    pub fn set_progress(&mut self, progress: f64) -> EffectResult<()> {
        let index = self.singular_index()?;
        self.set_progress_at(index, progress)
    }

    pub fn set_direction(&mut self, direction: AnimationDirection) -> EffectResult<()> {
        let index = self.singular_index()?;
        self.set_direction_at(index, direction)
    }

    pub fn set_data(&mut self, payload: Option<D>) -> EffectResult<()> {
        let index = self.singular_index()?;
        self.set_data_at(index, payload)
    }
}
