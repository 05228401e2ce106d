/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 反向传播（基于资格迹的实时梯度）
 *
 * 节点按序列倒序处理：
 * - 输出节点：误差责任由代价函数给出
 * - 隐藏节点：projected = f'(s) * Σ 出边 to.responsibility * weight * gain
 *             gated     = f'(s) * Σ 门控连接 to.responsibility * influence
 * - 入边梯度：projected * eligibility + Σ xtrace[k] * k.responsibility
 * 常量节点计算误差但不更新；输入节点跳过。
 */

use super::error::NetworkError;
use super::Network;
use crate::nn::methods::Cost;
use crate::nn::node::{NodeId, NodeKind};

impl Network {
    /// 反向传播并立即更新权重与偏置（须紧跟在 `activate` 之后调用）
    ///
    /// 输出节点的误差责任为 `(target - activation) * squash'(state)`
    pub fn propagate(
        &mut self,
        target: &[f64],
        rate: f64,
        momentum: f64,
    ) -> Result<(), NetworkError> {
        self.propagate_with(target, rate, momentum, true, Cost::Mse)
    }

    /// 反向传播的完整形式
    ///
    /// - `update = false` 时只累积本次的增量，留到下一次 `update = true` 时一并应用（小批量）
    /// - `cost` 决定输出节点的误差责任，见 `Cost`
    pub fn propagate_with(
        &mut self,
        target: &[f64],
        rate: f64,
        momentum: f64,
        update: bool,
        cost: Cost,
    ) -> Result<(), NetworkError> {
        if target.len() != self.output {
            return Err(NetworkError::shape_mismatch(
                self.output,
                target.len(),
                "目标向量长度与输出节点数不一致",
            ));
        }

        let n = self.order.len();
        for position in (self.input..n).rev() {
            let id = self.order[position];
            let output_target = (position >= n - self.output)
                .then(|| target[position - (n - self.output)]);
            self.propagate_node(id, output_target, rate, momentum, update, cost);
        }
        Ok(())
    }

    fn propagate_node(
        &mut self,
        id: NodeId,
        target: Option<f64>,
        rate: f64,
        momentum: f64,
        update: bool,
        cost: Cost,
    ) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };

        // 1. 误差责任
        let (projected, responsibility) = match target {
            Some(target) => {
                let delta = cost.output_delta(target, node.activation, node.derivative);
                (delta, delta)
            }
            None => {
                let mut error = 0.0;
                for conn_id in &node.outgoing {
                    if let Some(conn) = self.connections.get(conn_id) {
                        error += self.responsibility_of(conn.to) * conn.effective_factor();
                    }
                }
                let projected = node.derivative * error;

                let mut error = 0.0;
                for conn_id in &node.gated {
                    let Some(conn) = self.connections.get(conn_id) else {
                        continue;
                    };
                    if !conn.enabled {
                        continue;
                    }
                    let memory = if self.self_gated_by(conn.to, id) {
                        self.nodes.get(&conn.to).map_or(0.0, |n| n.old)
                    } else {
                        0.0
                    };
                    let influence = memory + conn.weight * self.activation_of(conn.from);
                    error += self.responsibility_of(conn.to) * influence;
                }
                let gated = node.derivative * error;
                (projected, projected + gated)
            }
        };

        let kind = node.kind;
        let mask = node.mask;
        let incoming = node.incoming.clone();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.error.projected = projected;
            node.error.gated = responsibility - projected;
            node.error.responsibility = responsibility;
        }
        if kind == NodeKind::Constant {
            return;
        }

        // 2. 入边权重
        for conn_id in &incoming {
            let Some(conn) = self.connections.get(conn_id) else {
                continue;
            };
            if !conn.enabled {
                continue;
            }
            let mut gradient = projected * conn.eligibility;
            for &(node, value) in &conn.xtrace {
                gradient += self.responsibility_of(node) * value;
            }
            let Some(conn) = self.connections.get_mut(conn_id) else {
                continue;
            };
            conn.total_delta_weight += rate * gradient * mask;
            if update {
                conn.total_delta_weight += momentum * conn.previous_delta_weight;
                conn.weight += conn.total_delta_weight;
                conn.previous_delta_weight = conn.total_delta_weight;
                conn.total_delta_weight = 0.0;
            }
        }

        // 3. 偏置
        if let Some(node) = self.nodes.get_mut(&id) {
            node.total_delta_bias += rate * responsibility;
            if update {
                node.total_delta_bias += momentum * node.previous_delta_bias;
                node.bias += node.total_delta_bias;
                node.previous_delta_bias = node.total_delta_bias;
                node.total_delta_bias = 0.0;
            }
        }
    }

    fn responsibility_of(&self, id: NodeId) -> f64 {
        self.nodes.get(&id).map_or(0.0, |n| n.error.responsibility)
    }
}
