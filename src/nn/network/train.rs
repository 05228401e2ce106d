/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 训练/测试循环
 */

use super::error::NetworkError;
use super::types::{Sample, TestResult, TrainOptions, TrainResult};
use super::Network;
use crate::nn::methods::Cost;
use rand::seq::SliceRandom;
use std::time::Instant;

impl Network {
    /// 在样本集上训练
    ///
    /// 每轮依次对每个样本做一次前向激活与反向传播，该轮误差为各样本误差（更新前计算）的均值。
    /// 达到目标误差、达到轮数上限或被取消时停止；未达到目标误差不算错误。
    ///
    /// # 示例
    /// ```ignore
    /// let options = TrainOptions {
    ///     iterations: Some(1000),
    ///     error: Some(0.002),
    ///     ..Default::default()
    /// };
    /// let result = network.train(&set, &options)?;
    /// ```
    pub fn train(
        &mut self,
        set: &[Sample],
        options: &TrainOptions,
    ) -> Result<TrainResult, NetworkError> {
        let start = Instant::now();
        self.check_set(set)?;

        if options.iterations.is_none() && options.error.is_none() {
            return Err(NetworkError::InvalidOperation(
                "iterations 与 error 至少需要指定一个".to_string(),
            ));
        }
        if options.batch_size == 0 || options.batch_size > set.len() {
            return Err(NetworkError::InvalidOperation(format!(
                "batch_size 须在[1, {}]内，实际为{}",
                set.len(),
                options.batch_size
            )));
        }
        // 只给轮数时跑满全部轮数
        let target_error = options.error.unwrap_or(-1.0);

        let (mut train_set, test_set): (Vec<&Sample>, Vec<&Sample>) =
            match options.cross_validate {
                Some(cv) => {
                    let train_len = ((1.0 - cv.test_size) * set.len() as f64).ceil() as usize;
                    let train_len = train_len.clamp(1, set.len());
                    (
                        set[..train_len].iter().collect(),
                        set[train_len..].iter().collect(),
                    )
                }
                None => (set.iter().collect(), Vec::new()),
            };
        if options.cross_validate.is_some() && test_set.is_empty() {
            return Err(NetworkError::InvalidOperation(
                "交叉验证的验证集为空".to_string(),
            ));
        }

        self.dropout = options.dropout;
        if self.dropout <= 0.0 {
            self.reset_masks(1.0);
        }
        let batch_size = options.batch_size.min(train_set.len());

        let mut error = 1.0;
        let mut iteration = 0;
        while error > target_error && options.iterations.is_none_or(|cap| iteration < cap) {
            if options.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                log::info!("训练在第{iteration}轮被取消");
                break;
            }
            if let Some(cv) = options.cross_validate {
                if error <= cv.test_error {
                    break;
                }
            }

            let rate = options.rate_policy.rate(options.rate, iteration);
            iteration += 1;

            let train_error =
                self.train_epoch(&train_set, batch_size, rate, options.momentum, options.cost)?;
            if options.clear {
                self.clear();
            }

            error = if options.cross_validate.is_some() {
                self.inference_masks();
                let test_error = self.evaluate(&test_set, options.cost);
                self.clear();
                test_error
            } else {
                train_error
            };

            if options.shuffle {
                self.with_rng(|rng| train_set.shuffle(rng));
            }
            if options.log > 0 && iteration % options.log == 0 {
                log::info!("第{iteration}轮：误差={error:.6}，学习率={rate:.6}");
            }
        }

        if options.clear {
            self.clear();
        }
        self.inference_masks();

        Ok(TrainResult {
            error,
            iterations: iteration,
            elapsed: start.elapsed(),
        })
    }

    /// 在样本集上评估误差（不训练，不记录迹）
    pub fn test(&mut self, set: &[Sample], cost: Cost) -> Result<TestResult, NetworkError> {
        let start = Instant::now();
        self.check_set(set)?;
        self.inference_masks();
        let samples: Vec<&Sample> = set.iter().collect();
        let error = self.evaluate(&samples, cost);
        Ok(TestResult {
            error,
            elapsed: start.elapsed(),
        })
    }

    fn train_epoch(
        &mut self,
        set: &[&Sample],
        batch_size: usize,
        rate: f64,
        momentum: f64,
        cost: Cost,
    ) -> Result<f64, NetworkError> {
        let mut error_sum = 0.0;
        for (i, sample) in set.iter().enumerate() {
            let update = (i + 1) % batch_size == 0 || i + 1 == set.len();
            let output = self.activate_with_dropout(&sample.input);
            error_sum += cost.compute(&sample.output, &output);
            self.propagate_with(&sample.output, rate, momentum, update, cost)?;
        }
        Ok(error_sum / set.len() as f64)
    }

    fn evaluate(&mut self, set: &[&Sample], cost: Cost) -> f64 {
        let mut error_sum = 0.0;
        for sample in set {
            if let Ok(output) = self.no_trace_activate(&sample.input) {
                error_sum += cost.compute(&sample.output, &output);
            }
        }
        error_sum / set.len().max(1) as f64
    }

    /// 推理时按保留概率缩放：dropout 训练留下的随机 0/1 掩码不参与评估
    fn inference_masks(&mut self) {
        if self.dropout > 0.0 {
            self.reset_masks(1.0 - self.dropout);
        }
    }

    /// 隐藏区段（隐藏节点与常量节点）的掩码统一设为 `mask`
    fn reset_masks(&mut self, mask: f64) {
        for id in self.hidden_nodes() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.mask = mask;
            }
        }
    }

    /// 样本集非空，且每个样本的输入/输出长度与网络一致
    fn check_set(&self, set: &[Sample]) -> Result<(), NetworkError> {
        if set.is_empty() {
            return Err(NetworkError::InvalidOperation("样本集为空".to_string()));
        }
        for sample in set {
            self.check_input(&sample.input)?;
            if sample.output.len() != self.output {
                return Err(NetworkError::shape_mismatch(
                    self.output,
                    sample.output.len(),
                    "样本的输出向量长度与输出节点数不一致",
                ));
            }
        }
        Ok(())
    }
}
