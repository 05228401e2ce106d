/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 模块的配置与训练相关类型
 */

use crate::nn::methods::{Cost, MutationConfig, RatePolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 网络级配置（构造时传入，不使用全局开关）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// 是否通过 `log::warn!` 报告被忽略的操作（如前置条件不满足的变异）
    pub warnings: bool,
    pub mutation: MutationConfig,
}

/// 一个训练样本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub output: Vec<f64>,
}

impl Sample {
    pub fn new(input: &[f64], output: &[f64]) -> Self {
        Self {
            input: input.to_vec(),
            output: output.to_vec(),
        }
    }
}

/// 训练取消标记（可跨线程共享，训练循环每轮检查一次）
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 交叉验证：取样本集末尾的 `test_size` 比例作为验证集，
/// 验证误差不高于 `test_error` 时提前停止
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossValidate {
    pub test_size: f64,
    pub test_error: f64,
}

/// 训练参数
///
/// `iterations` 与 `error` 至少指定一个：
/// - 只有 `iterations`：恰好训练这么多轮
/// - 只有 `error`：训练到误差不高于该值为止
/// - 两者都有：先满足哪个就停
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    pub iterations: Option<usize>,
    pub error: Option<f64>,
    pub rate: f64,
    pub momentum: f64,
    /// 每轮结束后打乱样本顺序
    pub shuffle: bool,
    pub cost: Cost,
    /// 每多少个样本更新一次权重（1 为在线学习）
    pub batch_size: usize,
    /// 隐藏节点在训练时被屏蔽的概率
    pub dropout: f64,
    /// 每轮结束后清空网络的瞬态量（适用于序列数据）
    pub clear: bool,
    pub rate_policy: RatePolicy,
    /// 每多少轮记录一次日志（0 为不记录）
    pub log: usize,
    pub cross_validate: Option<CrossValidate>,
    #[serde(skip)]
    pub cancel: Option<CancelToken>,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            iterations: None,
            error: None,
            rate: 0.3,
            momentum: 0.0,
            shuffle: false,
            cost: Cost::default(),
            batch_size: 1,
            dropout: 0.0,
            clear: false,
            rate_policy: RatePolicy::default(),
            log: 0,
            cross_validate: None,
            cancel: None,
        }
    }
}

/// 训练结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainResult {
    /// 最后一轮的平均误差（交叉验证时为验证集误差）
    pub error: f64,
    /// 实际训练的轮数
    pub iterations: usize,
    pub elapsed: Duration,
}

/// 测试结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub error: f64,
    pub elapsed: Duration,
}
