//! # Easing 模块
//!
//! 缓动效果，把线性进度映射为视觉上的缓动进度。

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EffectError;

/// `CustomQuadratic` 的起效阈值
///
/// 进度低于该值时输出保持为 0。
pub const CUSTOM_QUADRATIC_BOOST: f64 = 0.6;

/// 缓动效果类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    /// 线性（匀速）
    #[default]
    Linear,
    /// 缓出（先快后慢）
    EaseOut,
    /// 缓入缓出
    EaseInOut,
    /// 阈值后二次加速
    CustomQuadratic,
}

impl EffectType {
    /// 所有效果，按声明顺序
    pub const ALL: [EffectType; 4] = [
        EffectType::Linear,
        EffectType::EaseOut,
        EffectType::EaseInOut,
        EffectType::CustomQuadratic,
    ];

    /// 计算缓动值
    ///
    /// # 参数
    /// - `progress`: 线性进度 (0.0 - 1.0)
    ///
    /// 输出不做截断，需要单调 [0, 1] 输出的调用方自行 clamp。
    pub fn calculate(self, progress: f64) -> f64 {
        match self {
            EffectType::Linear => progress,
            EffectType::EaseOut => ease_out(progress),
            EffectType::EaseInOut => ease_in_out(progress),
            EffectType::CustomQuadratic => custom_quadratic(progress),
        }
    }

    /// 效果名称（与配置文件中的写法一致）
    pub fn name(self) -> &'static str {
        match self {
            EffectType::Linear => "linear",
            EffectType::EaseOut => "ease_out",
            EffectType::EaseInOut => "ease_in_out",
            EffectType::CustomQuadratic => "custom_quadratic",
        }
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectType {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        EffectType::ALL
            .into_iter()
            .find(|effect| effect.name() == normalized)
            .ok_or_else(|| EffectError::UnsupportedEffect {
                name: s.to_string(),
            })
    }
}

fn ease_out(p: f64) -> f64 {
    -p * (p - 2.0)
}

/// 保留既有公式：化简后等于 `p - sin(p)`。
fn ease_in_out(p: f64) -> f64 {
    p - (p * 2.0 * PI / (2.0 * PI)).sin()
}

fn custom_quadratic(p: f64) -> f64 {
    let boost = CUSTOM_QUADRATIC_BOOST;
    1.0 - ((p.max(boost) - boost) * PI / (2.0 - 2.0 * boost)).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_linear() {
        let effect = EffectType::Linear;
        assert_eq!(effect.calculate(0.0), 0.0);
        assert_eq!(effect.calculate(0.5), 0.5);
        assert_eq!(effect.calculate(1.0), 1.0);
    }

    #[test]
    fn test_ease_out() {
        let effect = EffectType::EaseOut;
        assert_eq!(effect.calculate(0.0), 0.0);
        assert_eq!(effect.calculate(0.5), 0.75);
        assert_eq!(effect.calculate(1.0), 1.0);
    }

    #[test]
    fn test_ease_in_out_keeps_literal_formula() {
        let effect = EffectType::EaseInOut;
        for p in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!((effect.calculate(p) - (p - p.sin())).abs() < EPS);
        }
        // 在 [0, 1] 上远小于线性值
        assert!(effect.calculate(1.0) < 0.2);
    }

    #[test]
    fn test_custom_quadratic() {
        let effect = EffectType::CustomQuadratic;
        // 阈值之前保持为 0
        assert_eq!(effect.calculate(0.0), 0.0);
        assert_eq!(effect.calculate(0.3), 0.0);
        assert_eq!(effect.calculate(CUSTOM_QUADRATIC_BOOST), 0.0);

        let mid = effect.calculate(0.8);
        assert!(mid > 0.0 && mid < 1.0);
        assert!((effect.calculate(1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("linear".parse::<EffectType>(), Ok(EffectType::Linear));
        assert_eq!("Ease-Out".parse::<EffectType>(), Ok(EffectType::EaseOut));
        assert_eq!(
            "custom_quadratic".parse::<EffectType>(),
            Ok(EffectType::CustomQuadratic)
        );
        for effect in EffectType::ALL {
            assert_eq!(effect.to_string().parse::<EffectType>(), Ok(effect));
        }
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "bounce".parse::<EffectType>().unwrap_err();
        assert_eq!(
            err,
            EffectError::UnsupportedEffect {
                name: "bounce".to_string()
            }
        );
    }
}
