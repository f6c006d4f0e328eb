//! # Direction 模块
//!
//! 动画方向，以及方向在进度边界上的状态转移。
//!
//! | 方向 | 边界 | 转移 |
//! |---|---|---|
//! | `In` | 1.0 | 结束 |
//! | `Out` | 0.0 | 结束 |
//! | `InOutIn` | 1.0 | → `InOutOut` |
//! | `InOutOut` | 0.0 | 结束 |
//! | `InOutRepeatingIn` | 1.0 | → `InOutRepeatingOut` |
//! | `InOutRepeatingOut` | 0.0 | → `InOutRepeatingIn`（永不结束） |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EffectError;

/// 动画方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationDirection {
    /// 单次上升 0 → 1
    #[default]
    In,
    /// 单次下降 1 → 0
    Out,
    /// 往返的上升阶段
    InOutIn,
    /// 往返的下降阶段
    InOutOut,
    /// 循环往返的上升阶段
    InOutRepeatingIn,
    /// 循环往返的下降阶段
    InOutRepeatingOut,
}

/// 每次 tick 的进度步长选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// 使用主步长 `increment`
    Primary,
    /// 使用往返下降阶段的 `secondary_increment`
    Secondary,
}

impl AnimationDirection {
    /// 所有方向，按声明顺序
    pub const ALL: [AnimationDirection; 6] = [
        AnimationDirection::In,
        AnimationDirection::Out,
        AnimationDirection::InOutIn,
        AnimationDirection::InOutOut,
        AnimationDirection::InOutRepeatingIn,
        AnimationDirection::InOutRepeatingOut,
    ];

    /// 是否朝 1.0 推进
    pub fn is_rising(self) -> bool {
        matches!(self, Self::In | Self::InOutIn | Self::InOutRepeatingIn)
    }

    /// 是否属于循环往返
    pub fn is_repeating(self) -> bool {
        matches!(self, Self::InOutRepeatingIn | Self::InOutRepeatingOut)
    }

    /// 动画开始时的原始进度
    pub fn initial_progress(self) -> f64 {
        if self.is_rising() { 0.0 } else { 1.0 }
    }

    /// 本方向使用哪一个步长
    pub fn step_kind(self) -> StepKind {
        match self {
            Self::InOutOut | Self::InOutRepeatingOut => StepKind::Secondary,
            _ => StepKind::Primary,
        }
    }

    /// 进度到达边界后的方向
    ///
    /// 未到达边界、或到达边界后应当结束的方向原样返回。
    pub fn transition(self, progress: f64) -> Self {
        match self {
            Self::InOutIn if progress >= 1.0 => Self::InOutOut,
            Self::InOutRepeatingIn if progress >= 1.0 => Self::InOutRepeatingOut,
            Self::InOutRepeatingOut if progress <= 0.0 => Self::InOutRepeatingIn,
            other => other,
        }
    }

    /// 在给定进度下是否已结束
    ///
    /// 循环方向永远不会结束。
    pub fn is_terminal_at(self, progress: f64) -> bool {
        match self {
            Self::In => progress >= 1.0,
            Self::Out | Self::InOutOut => progress <= 0.0,
            Self::InOutIn | Self::InOutRepeatingIn | Self::InOutRepeatingOut => false,
        }
    }

    /// 方向名称（与配置文件中的写法一致）
    pub fn name(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOutIn => "in_out_in",
            Self::InOutOut => "in_out_out",
            Self::InOutRepeatingIn => "in_out_repeating_in",
            Self::InOutRepeatingOut => "in_out_repeating_out",
        }
    }
}

impl fmt::Display for AnimationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationDirection {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|direction| direction.name() == normalized)
            .ok_or_else(|| EffectError::InvalidDirection {
                name: s.to_string(),
            })
    }
}
