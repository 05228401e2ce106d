/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 激活（squash）函数目录
 *
 * 每种激活函数都固定对应一对 (函数, 导数)，存于静态表中；
 * 变异只会切换枚举标签，不会重新绑定任意闭包。
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// 激活函数的函数指针类型
type SquashFn = fn(f64) -> f64;

const SELU_ALPHA: f64 = 1.673_263_242_354_377_3;
const SELU_SCALE: f64 = 1.050_700_987_355_480_5;

/// 激活函数种类（封闭枚举）
///
/// 序列化时使用大写名称（如 `"LOGISTIC"`），与记录格式中的 `squash` 字段对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Activation {
    #[default]
    Logistic,
    Tanh,
    Identity,
    Step,
    Relu,
    Softsign,
    Sinusoid,
    Gaussian,
    BentIdentity,
    Bipolar,
    BipolarSigmoid,
    HardTanh,
    Absolute,
    Inverse,
    Selu,
}

/// (函数, 导数) 静态表，下标与 `Activation` 的声明顺序一致
static SQUASH_TABLE: [(SquashFn, SquashFn); 15] = [
    (logistic, logistic_derivative),
    (tanh, tanh_derivative),
    (identity, identity_derivative),
    (step, zero_derivative),
    (relu, relu_derivative),
    (softsign, softsign_derivative),
    (sinusoid, sinusoid_derivative),
    (gaussian, gaussian_derivative),
    (bent_identity, bent_identity_derivative),
    (bipolar, zero_derivative),
    (bipolar_sigmoid, bipolar_sigmoid_derivative),
    (hard_tanh, hard_tanh_derivative),
    (absolute, absolute_derivative),
    (inverse, inverse_derivative),
    (selu, selu_derivative),
];

impl Activation {
    /// 全部激活函数（默认的变异候选集）
    pub const ALL: [Self; 15] = [
        Self::Logistic,
        Self::Tanh,
        Self::Identity,
        Self::Step,
        Self::Relu,
        Self::Softsign,
        Self::Sinusoid,
        Self::Gaussian,
        Self::BentIdentity,
        Self::Bipolar,
        Self::BipolarSigmoid,
        Self::HardTanh,
        Self::Absolute,
        Self::Inverse,
        Self::Selu,
    ];

    /// 计算 squash(x)
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        (SQUASH_TABLE[self as usize].0)(x)
    }

    /// 计算 squash'(x)
    #[inline]
    pub fn derivative(self, x: f64) -> f64 {
        (SQUASH_TABLE[self as usize].1)(x)
    }

    /// 记录格式中使用的名称
    pub const fn name(self) -> &'static str {
        match self {
            Self::Logistic => "LOGISTIC",
            Self::Tanh => "TANH",
            Self::Identity => "IDENTITY",
            Self::Step => "STEP",
            Self::Relu => "RELU",
            Self::Softsign => "SOFTSIGN",
            Self::Sinusoid => "SINUSOID",
            Self::Gaussian => "GAUSSIAN",
            Self::BentIdentity => "BENT_IDENTITY",
            Self::Bipolar => "BIPOLAR",
            Self::BipolarSigmoid => "BIPOLAR_SIGMOID",
            Self::HardTanh => "HARD_TANH",
            Self::Absolute => "ABSOLUTE",
            Self::Inverse => "INVERSE",
            Self::Selu => "SELU",
        }
    }

    /// 按名称查找（大小写不敏感）
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ========== 各函数实现 ==========

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn logistic_derivative(x: f64) -> f64 {
    let fx = logistic(x);
    fx * (1.0 - fx)
}

fn tanh(x: f64) -> f64 {
    x.tanh()
}

fn tanh_derivative(x: f64) -> f64 {
    1.0 - x.tanh().powi(2)
}

fn identity(x: f64) -> f64 {
    x
}

fn identity_derivative(_x: f64) -> f64 {
    1.0
}

fn step(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

fn zero_derivative(_x: f64) -> f64 {
    0.0
}

fn relu(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}

fn relu_derivative(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

fn softsign(x: f64) -> f64 {
    x / (1.0 + x.abs())
}

fn softsign_derivative(x: f64) -> f64 {
    1.0 / (1.0 + x.abs()).powi(2)
}

fn sinusoid(x: f64) -> f64 {
    x.sin()
}

fn sinusoid_derivative(x: f64) -> f64 {
    x.cos()
}

fn gaussian(x: f64) -> f64 {
    (-x * x).exp()
}

fn gaussian_derivative(x: f64) -> f64 {
    -2.0 * x * (-x * x).exp()
}

fn bent_identity(x: f64) -> f64 {
    ((x * x + 1.0).sqrt() - 1.0) / 2.0 + x
}

fn bent_identity_derivative(x: f64) -> f64 {
    x / (2.0 * (x * x + 1.0).sqrt()) + 1.0
}

fn bipolar(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { -1.0 }
}

fn bipolar_sigmoid(x: f64) -> f64 {
    2.0 / (1.0 + (-x).exp()) - 1.0
}

fn bipolar_sigmoid_derivative(x: f64) -> f64 {
    let fx = bipolar_sigmoid(x);
    (1.0 + fx) * (1.0 - fx) / 2.0
}

fn hard_tanh(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

fn hard_tanh_derivative(x: f64) -> f64 {
    if x > -1.0 && x < 1.0 { 1.0 } else { 0.0 }
}

fn absolute(x: f64) -> f64 {
    x.abs()
}

fn absolute_derivative(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

fn inverse(x: f64) -> f64 {
    1.0 - x
}

fn inverse_derivative(_x: f64) -> f64 {
    -1.0
}

fn selu(x: f64) -> f64 {
    let fx = if x > 0.0 { x } else { SELU_ALPHA * x.exp() - SELU_ALPHA };
    fx * SELU_SCALE
}

fn selu_derivative(x: f64) -> f64 {
    if x > 0.0 {
        SELU_SCALE
    } else {
        SELU_ALPHA * x.exp() * SELU_SCALE
    }
}
