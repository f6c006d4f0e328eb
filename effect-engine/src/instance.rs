//! # Instance 模块
//!
//! 单个动画实例：进度、方向、起点、附加数据存放在同一条记录里，
//! 增删时总是一起发生。

use serde::{Deserialize, Serialize};

use crate::direction::{AnimationDirection, StepKind};

/// 距离边界小于该值时直接吸附到边界
///
/// 例如 10 次 0.1 的累加在浮点下是 0.9999999999999999。
pub(crate) const BOUND_EPSILON: f64 = 1e-9;

/// 二维点
///
/// 渲染层用作效果的起点（例如涟漪中心），引擎本身不解读。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// 创建新的点
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 原点
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// 动画实例
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationInstance<D> {
    /// 原始进度（未应用缓动）
    progress: f64,
    /// 当前方向
    direction: AnimationDirection,
    /// 起点
    origin: Point,
    /// 调用方附加数据
    payload: Option<D>,
}

impl<D> AnimationInstance<D> {
    /// 按方向创建实例，初始进度由方向决定
    pub fn new(direction: AnimationDirection, origin: Point, payload: Option<D>) -> Self {
        Self {
            progress: direction.initial_progress(),
            direction,
            origin,
            payload,
        }
    }

    /// 原始进度
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn direction(&self) -> AnimationDirection {
        self.direction
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn payload(&self) -> Option<&D> {
        self.payload.as_ref()
    }

    /// 设置原始进度，截断到 [0, 1]
    ///
    /// 调用方保证 `progress` 是有限数值。
    pub(crate) fn set_progress(&mut self, progress: f64) {
        self.progress = clamp_progress(progress);
    }

    pub(crate) fn set_direction(&mut self, direction: AnimationDirection) {
        self.direction = direction;
    }

    pub(crate) fn set_payload(&mut self, payload: Option<D>) {
        self.payload = payload;
    }

    /// 推进一个 tick：按方向加/减步长、截断、在边界上转移方向
    pub(crate) fn step(&mut self, increment: f64, secondary_increment: f64) {
        let delta = match self.direction.step_kind() {
            StepKind::Primary => increment,
            StepKind::Secondary => secondary_increment,
        };

        let next = if self.direction.is_rising() {
            self.progress + delta
        } else {
            self.progress - delta
        };

        self.progress = clamp_progress(next);
        self.direction = self.direction.transition(self.progress);
    }

    /// 是否已到达结束状态
    pub fn is_terminal(&self) -> bool {
        self.direction.is_terminal_at(self.progress)
    }
}

/// 截断到 [0, 1]，并把贴近边界的值吸附到边界
fn clamp_progress(value: f64) -> f64 {
    if value >= 1.0 - BOUND_EPSILON {
        1.0
    } else if value <= BOUND_EPSILON {
        0.0
    } else {
        value
    }
}
