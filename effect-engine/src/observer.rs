//! # Observer 模块
//!
//! 进度通知与完成通知的订阅表。
//!
//! 回调在调用 `advance()` 的线程上同步执行，按注册顺序调用，
//! 参数是被观察对象的可变引用（例如在完成通知里接着启动下一个动画）。
//!
//! 通知期间回调列表被 [`Observers::detach`] 移出，被观察对象上留下的订阅表
//! 只记录新增与取消，通知结束后由 [`Observers::reattach`] 合并。

use std::fmt;

/// 订阅 ID，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 通知通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// 每个 tick 结束后触发
    Progress,
    /// tick 源停止的那个 tick 触发一次
    Finished,
}

type Callback<T> = Box<dyn FnMut(&mut T)>;

/// 订阅表
pub struct Observers<T> {
    next_id: u64,
    progress: Vec<(SubscriptionId, Callback<T>)>,
    finished: Vec<(SubscriptionId, Callback<T>)>,
    /// 进行中的通知层数
    depth: u32,
    /// 通知期间取消、但回调不在本表中的订阅
    cancelled: Vec<SubscriptionId>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("progress", &self.progress.len())
            .field("finished", &self.finished.len())
            .field("depth", &self.depth)
            .finish()
    }
}

impl<T> Observers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            progress: Vec::new(),
            finished: Vec::new(),
            depth: 0,
            cancelled: Vec::new(),
        }
    }

    fn list_mut(&mut self, channel: Channel) -> &mut Vec<(SubscriptionId, Callback<T>)> {
        match channel {
            Channel::Progress => &mut self.progress,
            Channel::Finished => &mut self.finished,
        }
    }

    /// 注册回调
    pub fn subscribe(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&mut T) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.list_mut(channel).push((id, Box::new(callback)));
        id
    }

    /// 取消订阅
    ///
    /// 通知期间取消的订阅在 [`Observers::reattach`] 时移除，本轮通知中
    /// 排在后面的该回调仍会被调用。
    ///
    /// # 返回
    /// - `true`: 找到并移除（通知期间：ID 曾被分配）
    /// - `false`: ID 不存在（已取消或从未注册）
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.remove(id) {
            return true;
        }
        if self.depth > 0 && id.0 < self.next_id && !self.cancelled.contains(&id) {
            self.cancelled.push(id);
            return true;
        }
        false
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        for channel in [Channel::Progress, Channel::Finished] {
            let list = self.list_mut(channel);
            if let Some(pos) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// 通道上的订阅数量
    pub fn count(&self, channel: Channel) -> usize {
        match channel {
            Channel::Progress => self.progress.len(),
            Channel::Finished => self.finished.len(),
        }
    }

    /// 按注册顺序调用通道上的全部回调
    pub fn notify(&mut self, channel: Channel, subject: &mut T) {
        for (_, callback) in self.list_mut(channel).iter_mut() {
            callback(subject);
        }
    }

    /// 移出全部回调，供通知期间使用
    ///
    /// 本表继续分配 ID（不会与移出的订阅冲突），并记录通知期间的取消。
    pub fn detach(&mut self) -> Self {
        self.depth += 1;
        Self {
            next_id: self.next_id,
            progress: std::mem::take(&mut self.progress),
            finished: std::mem::take(&mut self.finished),
            depth: 0,
            cancelled: Vec::new(),
        }
    }

    /// 放回 [`Observers::detach`] 移出的回调
    ///
    /// 通知期间新增的订阅排在原有订阅之后，期间取消的订阅被移除。
    pub fn reattach(&mut self, mut detached: Self) {
        detached.progress.append(&mut self.progress);
        detached.finished.append(&mut self.finished);
        self.progress = detached.progress;
        self.finished = detached.finished;
        self.depth = self.depth.saturating_sub(1);

        for id in std::mem::take(&mut self.cancelled) {
            // 外层通知移出的订阅要等外层放回后才能移除
            if !self.remove(id) && self.depth > 0 {
                self.cancelled.push(id);
            }
        }
    }
}
