/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 代价（误差）函数
 */

use serde::{Deserialize, Serialize};

/// 对数运算前的截断下限，避免 ln(0)
const EPSILON: f64 = 1e-15;

/// 代价函数
///
/// `compute` 给出一个样本的误差，训练时按样本取平均作为该轮的误差；
/// `output_delta` 给出反向传播时输出节点的误差责任。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cost {
    /// 交叉熵，适用于 (0, 1) 区间的输出
    CrossEntropy,
    /// 均方误差
    #[default]
    Mse,
    /// 二值误判数：将 `x * 2` 四舍五入后比较
    Binary,
    /// 平均绝对误差
    Mae,
    /// 平均绝对百分比误差
    Mape,
    /// 均方对数误差
    Msle,
    /// 合页损失，目标取 -1/+1
    Hinge,
}

impl Cost {
    pub const ALL: [Self; 7] = [
        Self::CrossEntropy,
        Self::Mse,
        Self::Binary,
        Self::Mae,
        Self::Mape,
        Self::Msle,
        Self::Hinge,
    ];

    /// 计算一个样本的误差（`target` 与 `output` 等长，由调用方保证）
    pub fn compute(self, target: &[f64], output: &[f64]) -> f64 {
        let n = target.len().max(1) as f64;
        let pairs = target.iter().zip(output.iter());
        match self {
            Self::CrossEntropy => {
                let sum: f64 = pairs
                    .map(|(&t, &o)| {
                        let o = o.clamp(EPSILON, 1.0 - EPSILON);
                        -(t * o.ln() + (1.0 - t) * (1.0 - o).ln())
                    })
                    .sum();
                sum / n
            }
            Self::Mse => pairs.map(|(&t, &o)| (t - o).powi(2)).sum::<f64>() / n,
            Self::Binary => pairs
                .filter(|&(&t, &o)| (t * 2.0).round() != (o * 2.0).round())
                .count() as f64,
            Self::Mae => pairs.map(|(&t, &o)| (t - o).abs()).sum::<f64>() / n,
            Self::Mape => {
                pairs
                    .map(|(&t, &o)| ((o - t) / t.max(EPSILON)).abs())
                    .sum::<f64>()
                    / n
            }
            Self::Msle => {
                pairs
                    .map(|(&t, &o)| (t.max(EPSILON).ln() - o.max(EPSILON).ln()).powi(2))
                    .sum::<f64>()
                    / n
            }
            Self::Hinge => pairs.map(|(&t, &o)| (1.0 - t * o).max(0.0)).sum::<f64>() / n,
        }
    }

    /// 输出节点的误差责任
    ///
    /// 交叉熵与 logistic 输出配对时导数项互相抵消，直接取 `target - activation`；
    /// 其余代价统一使用均方误差的 delta：`(target - activation) * squash'(state)`。
    pub(in crate::nn) fn output_delta(self, target: f64, activation: f64, derivative: f64) -> f64 {
        match self {
            Self::CrossEntropy => target - activation,
            _ => (target - activation) * derivative,
        }
    }
}
