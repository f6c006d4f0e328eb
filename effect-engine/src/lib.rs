//! # Effect Engine
//!
//! 控件过渡效果（涟漪、悬停渐变、开关滑动）的动画引擎。
//!
//! ## 架构概述
//!
//! 引擎只负责 **进度随 tick 的变化**，不知道像素、颜色或路径。
//! 渲染层在每次进度通知时读取进度/方向/起点/附加数据，自行决定如何绘制：
//!
//! ```text
//! 调用方                  AnimationEngine                 渲染层
//!   │ start_new_animation()    │                            │
//!   │─────────────────────────►│ 追加/覆盖实例，启动 tick 源 │
//!   │                          │                            │
//!   │        tick 源 ─────────►│ advance()                  │
//!   │                          │ 步进 → 截断 → 方向转移      │
//!   │                          │ → 清除结束实例              │
//!   │                          │── on_progress ────────────►│ progress_at(i) ...
//!   │                          │── on_finished（一次）──────►│
//! ```
//!
//! ## 核心类型
//!
//! - [`AnimationEngine`]：动画引擎
//! - [`AnimationDirection`]：动画方向与状态转移
//! - [`EffectType`]：缓动效果
//! - [`EngineMode`]：单实例/多实例模式，对应 [`SingleSlot`] / [`GrowableSet`]
//! - [`TickSource`]：tick 源接口，默认实现 [`IntervalTicker`]
//! - [`EngineConfig`]：可从 JSON 加载的引擎配置
//!
//! ## 模块结构
//!
//! - [`easing`]：缓动效果
//! - [`direction`]：动画方向
//! - [`instance`]：动画实例
//! - [`store`]：实例存储
//! - [`observer`]：通知订阅
//! - [`ticker`]：tick 源
//! - [`engine`]：引擎
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod config;
pub mod direction;
pub mod easing;
pub mod engine;
pub mod error;
pub mod instance;
pub mod observer;
pub mod store;
pub mod ticker;

// 重导出核心类型
pub use config::EngineConfig;
pub use direction::{AnimationDirection, StepKind};
pub use easing::{CUSTOM_QUADRATIC_BOOST, EffectType};
pub use engine::{AnimationEngine, MAX_CATCH_UP_TICKS, TickReport};
pub use error::{EffectError, EffectResult};
pub use instance::{AnimationInstance, Point};
pub use observer::{Channel, Observers, SubscriptionId};
pub use store::{EngineMode, GrowableSet, InstanceStore, SingleSlot};
pub use ticker::{DEFAULT_INTERVAL, IntervalTicker, TickSource};
