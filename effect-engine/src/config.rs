//! # Config 模块
//!
//! 引擎配置，可从 JSON 加载。
//!
//! ```json
//! {
//!   "mode": "multiple",
//!   "increment": 0.04,
//!   "secondary_increment": 0.08,
//!   "effect": "ease_out",
//!   "interrupt": false,
//!   "interval_ms": 5
//! }
//! ```
//!
//! 所有字段都有默认值，缺省字段使用默认值。

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::easing::EffectType;
use crate::error::{EffectError, EffectResult};
use crate::store::EngineMode;

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 单实例/多实例模式
    #[serde(default)]
    pub mode: EngineMode,

    /// 每个 tick 的主步长
    #[serde(default = "default_increment")]
    pub increment: f64,

    /// 往返动画下降阶段的步长
    #[serde(default = "default_increment")]
    pub secondary_increment: f64,

    /// 读取进度时使用的缓动效果
    #[serde(default)]
    pub effect: EffectType,

    /// 动画进行中再次启动时是否替换当前动画
    #[serde(default = "default_interrupt")]
    pub interrupt: bool,

    /// tick 间隔（毫秒）
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_increment() -> f64 {
    0.03
}

fn default_interrupt() -> bool {
    true
}

fn default_interval_ms() -> u64 {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::default(),
            increment: default_increment(),
            secondary_increment: default_increment(),
            effect: EffectType::default(),
            interrupt: default_interrupt(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl EngineConfig {
    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(json: &str) -> EffectResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EffectError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载并校验
    pub fn load(path: impl AsRef<Path>) -> EffectResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| EffectError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&content)?;
        debug!(path = %path.display(), mode = ?config.mode, "动画配置加载成功");
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> EffectResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EffectError::ConfigParse(e.to_string()))?;
        fs::write(path, json).map_err(|e| EffectError::ConfigIo(e.to_string()))?;
        Ok(())
    }

    /// tick 间隔
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> EffectResult<()> {
        validate_increment("increment", self.increment)?;
        validate_increment("secondary_increment", self.secondary_increment)?;

        if self.interval_ms == 0 {
            return Err(EffectError::InvalidConfig {
                field: "interval_ms".to_string(),
                message: "必须大于 0".to_string(),
            });
        }

        Ok(())
    }
}

/// 步长必须是 (0, 1] 内的有限数值
pub(crate) fn validate_increment(field: &str, value: f64) -> EffectResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(EffectError::InvalidConfig {
            field: field.to_string(),
            message: format!("必须在 (0, 1] 之间，实际为 {}", value),
        });
    }
    Ok(())
}
