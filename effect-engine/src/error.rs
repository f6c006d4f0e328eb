//! # Error 模块
//!
//! 定义 effect-engine 中使用的错误类型。
//!
//! 这里的错误都表示调用方违反了 API 约定，不存在可重试的错误类别。

use thiserror::Error;

/// 动画引擎错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    /// 无法识别的动画方向
    #[error("无效的动画方向 '{name}'")]
    InvalidDirection { name: String },

    /// 索引越界
    #[error("无效的动画索引 {index}，有效范围是 0..{count}")]
    IndexOutOfRange { index: usize, count: usize },

    /// 当前模式或状态不允许此操作
    #[error("无效的操作: {message}")]
    InvalidOperation { message: String },

    /// 无法识别的缓动效果
    #[error("不支持的缓动效果 '{name}'")]
    UnsupportedEffect { name: String },

    /// 非有限的进度值
    #[error("无效的进度值 {value}，必须是有限数值")]
    InvalidProgress { value: f64 },

    /// 配置项无效
    #[error("配置项 '{field}' 无效 - {message}")]
    InvalidConfig { field: String, message: String },

    /// 配置文件读写失败
    #[error("配置 IO 错误: {0}")]
    ConfigIo(String),

    /// 配置文件解析失败
    #[error("配置解析失败: {0}")]
    ConfigParse(String),
}

impl EffectError {
    /// 构造 `InvalidOperation`
    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type EffectResult<T> = Result<T, EffectError>;
