/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 学习率策略（随训练轮数调整学习率）
 */

use serde::{Deserialize, Serialize};

/// 学习率策略
///
/// 序列化示例：`{"type": "STEP", "gamma": 0.9, "step_size": 100}`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatePolicy {
    /// 固定学习率
    #[default]
    Fixed,
    /// 每 `step_size` 轮乘以一次 `gamma`
    Step { gamma: f64, step_size: usize },
    /// 每轮乘以 `gamma`
    Exp { gamma: f64 },
    /// `base * (1 + gamma * iteration)^(-power)`
    Inv { gamma: f64, power: f64 },
}

impl RatePolicy {
    pub const fn step() -> Self {
        Self::Step {
            gamma: 0.9,
            step_size: 100,
        }
    }

    pub const fn exp() -> Self {
        Self::Exp { gamma: 0.999 }
    }

    pub const fn inv() -> Self {
        Self::Inv {
            gamma: 0.001,
            power: 2.0,
        }
    }

    /// 第 `iteration` 轮（从 0 开始）使用的学习率
    pub fn rate(&self, base_rate: f64, iteration: usize) -> f64 {
        match *self {
            Self::Fixed => base_rate,
            Self::Step { gamma, step_size } => {
                let steps = iteration / step_size.max(1);
                base_rate * gamma.powi(steps as i32)
            }
            Self::Exp { gamma } => base_rate * gamma.powi(iteration as i32),
            Self::Inv { gamma, power } => base_rate * (1.0 + gamma * iteration as f64).powf(-power),
        }
    }
}
