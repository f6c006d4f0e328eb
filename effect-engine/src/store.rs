//! # Store 模块
//!
//! 动画实例的存储。引擎构造时选定一种实现，之后不再改变：
//!
//! - [`SingleSlot`]：单实例模式，唯一的槽位被原地覆盖，永不移除
//! - [`GrowableSet`]：多实例模式，追加新实例，结束的实例由引擎清除

use serde::{Deserialize, Serialize};

use crate::direction::AnimationDirection;
use crate::error::{EffectError, EffectResult};
use crate::instance::{AnimationInstance, Point};

/// 引擎模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// 单实例
    #[default]
    Singular,
    /// 多实例
    Multiple,
}

impl EngineMode {
    /// 创建与模式对应的存储
    pub fn create_store<D: 'static>(self) -> Box<dyn InstanceStore<D>> {
        match self {
            EngineMode::Singular => Box::new(SingleSlot::new()),
            EngineMode::Multiple => Box::new(GrowableSet::new()),
        }
    }
}

/// 实例存储接口
pub trait InstanceStore<D> {
    /// 存储对应的模式
    fn mode(&self) -> EngineMode;

    /// 放入新启动的实例（单实例覆盖，多实例追加）
    fn place(&mut self, instance: AnimationInstance<D>);

    /// 实例数量
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按索引读取
    fn get(&self, index: usize) -> EffectResult<&AnimationInstance<D>>;

    /// 按索引修改
    fn get_mut(&mut self, index: usize) -> EffectResult<&mut AnimationInstance<D>>;

    /// 按索引顺序遍历全部实例
    fn as_mut_slice(&mut self) -> &mut [AnimationInstance<D>];

    /// 清除已结束的实例，返回清除数量
    fn sweep(&mut self) -> usize;

    /// 是否已没有活跃的实例
    fn is_settled(&self) -> bool;
}

/// 单实例存储
///
/// 构造时即存在一个实例（方向 `In`、进度 0、起点原点、无数据）。
#[derive(Debug, Clone)]
pub struct SingleSlot<D> {
    slot: AnimationInstance<D>,
    /// 是否启动过动画；启动之前访问实例属于误用
    started: bool,
}

impl<D> SingleSlot<D> {
    pub fn new() -> Self {
        Self {
            slot: AnimationInstance::new(AnimationDirection::In, Point::origin(), None),
            started: false,
        }
    }

    fn check(&self, index: usize) -> EffectResult<()> {
        if !self.started {
            return Err(EffectError::invalid_operation("单实例动画尚未启动"));
        }
        if index != 0 {
            return Err(EffectError::IndexOutOfRange { index, count: 1 });
        }
        Ok(())
    }
}

impl<D> Default for SingleSlot<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> InstanceStore<D> for SingleSlot<D> {
    fn mode(&self) -> EngineMode {
        EngineMode::Singular
    }

    fn place(&mut self, instance: AnimationInstance<D>) {
        self.slot = instance;
        self.started = true;
    }

    fn len(&self) -> usize {
        1
    }

    fn get(&self, index: usize) -> EffectResult<&AnimationInstance<D>> {
        self.check(index)?;
        Ok(&self.slot)
    }

    fn get_mut(&mut self, index: usize) -> EffectResult<&mut AnimationInstance<D>> {
        self.check(index)?;
        Ok(&mut self.slot)
    }

    fn as_mut_slice(&mut self) -> &mut [AnimationInstance<D>] {
        if !self.started {
            return &mut [];
        }
        std::slice::from_mut(&mut self.slot)
    }

    fn sweep(&mut self) -> usize {
        // 停在边界上，不移除
        0
    }

    fn is_settled(&self) -> bool {
        !self.started || self.slot.is_terminal()
    }
}

/// 多实例存储
#[derive(Debug, Clone)]
pub struct GrowableSet<D> {
    instances: Vec<AnimationInstance<D>>,
}

impl<D> GrowableSet<D> {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }
}

impl<D> Default for GrowableSet<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> InstanceStore<D> for GrowableSet<D> {
    fn mode(&self) -> EngineMode {
        EngineMode::Multiple
    }

    fn place(&mut self, instance: AnimationInstance<D>) {
        self.instances.push(instance);
    }

    fn len(&self) -> usize {
        self.instances.len()
    }

    fn get(&self, index: usize) -> EffectResult<&AnimationInstance<D>> {
        let count = self.instances.len();
        self.instances
            .get(index)
            .ok_or(EffectError::IndexOutOfRange { index, count })
    }

    fn get_mut(&mut self, index: usize) -> EffectResult<&mut AnimationInstance<D>> {
        let count = self.instances.len();
        self.instances
            .get_mut(index)
            .ok_or(EffectError::IndexOutOfRange { index, count })
    }

    fn as_mut_slice(&mut self) -> &mut [AnimationInstance<D>] {
        &mut self.instances
    }

    fn sweep(&mut self) -> usize {
        let before = self.instances.len();
        self.instances.retain(|instance| !instance.is_terminal());
        before - self.instances.len()
    }

    fn is_settled(&self) -> bool {
        self.instances.is_empty()
    }
}
