/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 前向激活
 *
 * 每个非输入节点按序列顺序求值一次：
 *   state      = selfGain * selfWeight * state + bias + Σ from.activation * weight * gain
 *   activation = squash(state) * mask
 * 求值后，本节点门控的连接的 gain 更新为本节点的 activation。
 * 训练模式下还会维护每条入边的资格迹（eligibility）与扩展迹（xtrace），供反向传播使用。
 */

use super::error::NetworkError;
use super::Network;
use crate::nn::connection::ConnectionId;
use crate::nn::node::NodeId;
use rand::Rng;

impl Network {
    /// 前向激活（记录迹，可紧接着调用 `propagate`）
    pub fn activate(&mut self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.check_input(input)?;
        Ok(self.activate_inner(input, true))
    }

    /// 只做推理的前向激活：结果与 `activate` 相同，但不维护训练用的迹
    pub fn no_trace_activate(&mut self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.check_input(input)?;
        Ok(self.activate_inner(input, false))
    }

    /// 训练时的前向激活：隐藏/常量节点以概率 `dropout` 被屏蔽
    pub(in crate::nn) fn activate_with_dropout(&mut self, input: &[f64]) -> Vec<f64> {
        if self.dropout > 0.0 {
            let dropout = self.dropout;
            for id in self.hidden_nodes() {
                let masked = self.with_rng(|rng| rng.r#gen::<f64>() < dropout);
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.mask = if masked { 0.0 } else { 1.0 };
                }
            }
        }
        self.activate_inner(input, true)
    }

    pub(in crate::nn) fn check_input(&self, input: &[f64]) -> Result<(), NetworkError> {
        if input.len() != self.input {
            return Err(NetworkError::shape_mismatch(
                self.input,
                input.len(),
                "输入向量长度与输入节点数不一致",
            ));
        }
        Ok(())
    }

    fn activate_inner(&mut self, input: &[f64], with_traces: bool) -> Vec<f64> {
        for position in 0..self.order.len() {
            let id = self.order[position];
            if position < self.input {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.activation = input[position];
                }
                continue;
            }
            self.activate_node(id, with_traces);
        }

        self.order[self.order.len() - self.output..]
            .iter()
            .map(|id| self.activation_of(*id))
            .collect()
    }

    fn activate_node(&mut self, id: NodeId, with_traces: bool) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        // 1. 汇总入边信号
        let self_factor = self.self_factor(id);
        let mut sum = node.bias;
        for conn_id in &node.incoming {
            if let Some(conn) = self.connections.get(conn_id) {
                if conn.enabled {
                    sum += self.activation_of(conn.from) * conn.weight * conn.gain;
                }
            }
        }
        let incoming = node.incoming.clone();
        let gated = node.gated.clone();

        // 2. 更新节点自身
        let (activation, derivative) = {
            let Some(node) = self.nodes.get_mut(&id) else {
                return;
            };
            node.old = node.state;
            node.state = self_factor * node.state + sum;
            node.activation = node.squash.apply(node.state) * node.mask;
            node.derivative = node.squash.derivative(node.state);
            (node.activation, node.derivative)
        };

        // 3. 门控：先按被影响的节点汇总影响量，再把增益改为本节点的激活值
        let influences = if with_traces {
            self.gate_influences(id, &gated)
        } else {
            Vec::new()
        };
        for conn_id in &gated {
            if let Some(conn) = self.connections.get_mut(conn_id) {
                conn.gain = activation;
            }
        }

        if !with_traces {
            return;
        }
        // 目标节点的自连接系数需在增益更新之后读取
        let influences: Vec<(NodeId, f64, f64)> = influences
            .into_iter()
            .map(|(target, influence)| (target, influence, self.self_factor(target)))
            .collect();

        // 4. 资格迹与扩展迹
        for conn_id in &incoming {
            let Some(conn) = self.connections.get(conn_id) else {
                continue;
            };
            if !conn.enabled {
                continue;
            }
            let from_activation = self.activation_of(conn.from);
            let Some(conn) = self.connections.get_mut(conn_id) else {
                continue;
            };
            conn.eligibility = self_factor * conn.eligibility + from_activation * conn.gain;
            let eligibility = conn.eligibility;
            for &(target, influence, target_self_factor) in &influences {
                let trace = derivative * eligibility * influence;
                match conn.xtrace.iter_mut().find(|(node, _)| *node == target) {
                    Some((_, value)) => *value = target_self_factor * *value + trace,
                    None => conn.xtrace.push((target, trace)),
                }
            }
        }
    }

    /// 本节点对其门控的各目标节点的影响量
    ///
    /// 返回 `(目标节点, 影响量)`；
    /// 若目标节点的自连接也由本节点门控，影响量额外计入目标节点上一步的 state。
    fn gate_influences(&self, gater: NodeId, gated: &[ConnectionId]) -> Vec<(NodeId, f64)> {
        let mut influences: Vec<(NodeId, f64)> = Vec::new();
        for conn_id in gated {
            let Some(conn) = self.connections.get(conn_id) else {
                continue;
            };
            if !conn.enabled {
                continue;
            }
            let contribution = conn.weight * self.activation_of(conn.from);
            match influences.iter_mut().find(|(node, _)| *node == conn.to) {
                Some((_, influence)) => *influence += contribution,
                None => {
                    let memory = if self.self_gated_by(conn.to, gater) {
                        self.nodes.get(&conn.to).map_or(0.0, |n| n.old)
                    } else {
                        0.0
                    };
                    influences.push((conn.to, contribution + memory));
                }
            }
        }
        influences
    }

    pub(in crate::nn) fn activation_of(&self, id: NodeId) -> f64 {
        self.nodes.get(&id).map_or(0.0, |n| n.activation)
    }

    /// 节点自连接的 `gain * weight`，没有自连接时为 0
    pub(in crate::nn) fn self_factor(&self, id: NodeId) -> f64 {
        self.nodes
            .get(&id)
            .and_then(|n| n.self_connection)
            .and_then(|c| self.connections.get(&c))
            .map_or(0.0, |c| c.effective_factor())
    }

    /// 节点 `id` 的自连接是否由 `gater` 门控
    pub(in crate::nn) fn self_gated_by(&self, id: NodeId, gater: NodeId) -> bool {
        self.nodes
            .get(&id)
            .and_then(|n| n.self_connection)
            .and_then(|c| self.connections.get(&c))
            .is_some_and(|c| c.gater == Some(gater))
    }
}
