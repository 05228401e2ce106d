/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network Evolution API（NEAT 拓扑变异）
 *
 * 每个算子先收集满足前置条件的候选，再随机选取一个施加变异；
 * 候选为空时返回 `InvalidMutation`，网络保持不变。
 */

use super::error::NetworkError;
use super::Network;
use crate::nn::activation::Activation;
use crate::nn::connection::ConnectionId;
use crate::nn::methods::{Mutation, SubConnPolicy};
use crate::nn::node::NodeId;

impl Network {
    /// 施加一次变异；前置条件不满足时不做任何修改并返回 `false`
    pub fn mutate(&mut self, method: Mutation) -> bool {
        match self.try_mutate(method) {
            Ok(()) => true,
            Err(e) => {
                if self.config.warnings {
                    log::warn!("变异{method}被忽略：{e}");
                }
                false
            }
        }
    }

    /// 施加一次变异；前置条件不满足时返回 `InvalidMutation`
    pub fn try_mutate(&mut self, method: Mutation) -> Result<(), NetworkError> {
        match method {
            Mutation::AddNode => self.mutate_add_node(),
            Mutation::SubNode => self.mutate_sub_node(),
            Mutation::AddConn => self.mutate_add_conn(),
            Mutation::SubConn => self.mutate_sub_conn(),
            Mutation::ModWeight => self.mutate_mod_weight(),
            Mutation::ModBias => self.mutate_mod_bias(),
            Mutation::ModActivation => self.mutate_mod_activation(),
            Mutation::AddSelfConn => self.mutate_add_self_conn(),
            Mutation::SubSelfConn => self.mutate_sub_self_conn(),
            Mutation::AddGate => self.mutate_add_gate(),
            Mutation::SubGate => self.mutate_sub_gate(),
            Mutation::AddBackConn => self.mutate_add_back_conn(),
            Mutation::SubBackConn => self.mutate_sub_back_conn(),
            Mutation::SwapNodes => self.mutate_swap_nodes(),
        }
    }

    // ========== 拓扑查询 ==========

    /// 可新增的前向连接 (from, to)：from 在 to 之前，from 不是输出节点，to 不是输入节点
    pub fn possible_new_connections(&self) -> Vec<(NodeId, NodeId)> {
        let n = self.order.len();
        let mut pairs = Vec::new();
        for i in 0..n - self.output {
            for j in (i + 1).max(self.input)..n {
                let (from, to) = (self.order[i], self.order[j]);
                if !self.edges.contains_key(&(from, to)) {
                    pairs.push((from, to));
                }
            }
        }
        pairs
    }

    /// 可新增的循环连接 (from, to)：from 在 to 之后，两者都不是输入节点
    pub fn possible_back_connections(&self) -> Vec<(NodeId, NodeId)> {
        let n = self.order.len();
        let mut pairs = Vec::new();
        for i in self.input..n {
            for j in self.input..i {
                let (from, to) = (self.order[i], self.order[j]);
                if !self.edges.contains_key(&(from, to)) {
                    pairs.push((from, to));
                }
            }
        }
        pairs
    }

    /// SUB_CONN 的候选：前向连接（按 `SubConnPolicy` 过滤）
    pub fn removable_connections(&self) -> Vec<ConnectionId> {
        let index = self.index_map();
        let keep_paths = self.config.mutation.sub_conn_policy == SubConnPolicy::KeepPaths;
        self.connections
            .values()
            .filter(|c| match (index.get(&c.from), index.get(&c.to)) {
                (Some(i), Some(j)) => i < j,
                _ => false,
            })
            .filter(|c| !keep_paths || self.keeps_other_links(c.from, c.to))
            .map(|c| c.id)
            .collect()
    }

    /// 删除 from -> to 后，两端是否仍各自保有其它连接
    fn keeps_other_links(&self, from: NodeId, to: NodeId) -> bool {
        let outgoing = self.nodes.get(&from).map_or(0, |n| n.outgoing.len());
        let incoming = self.nodes.get(&to).map_or(0, |n| n.incoming.len());
        outgoing > 1 && incoming > 1
    }

    // ========== 变异算子 ==========

    fn mutate_add_node(&mut self) -> Result<(), NetworkError> {
        let candidates: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| c.enabled && !c.is_self_connection())
            .map(|c| c.id)
            .collect();
        let conn_id = self.pick(&candidates, "没有可拆分的连接")?;
        let conn = self.connection(conn_id)?;
        let (from, to, weight, gater) = (conn.from, conn.to, conn.weight, conn.gater);

        self.remove_connection(conn_id)?;
        let to_index = self
            .index_of(to)
            .ok_or(NetworkError::NodeNotFound(to))?;
        let position = to_index.min(self.order.len() - self.output);
        let node = self.insert_node(position)?;
        let squash = self.random_squash(None);
        if let Some(squash) = squash {
            self.set_squash(node, squash)?;
        }

        let first = self.connect(from, node, Some(1.0))?;
        let second = self.connect(node, to, Some(weight))?;
        if let Some(gater) = gater {
            let target = if self.random_bool() { first } else { second };
            self.gate(gater, target)?;
        }
        Ok(())
    }

    fn mutate_sub_node(&mut self) -> Result<(), NetworkError> {
        let candidates = self.hidden_nodes();
        let node = self.pick(&candidates, "没有可删除的隐藏节点")?;
        self.remove_node_reconnecting(node)
    }

    /// 删除节点；按配置把前驱与后继重新连起来，并把原入/出边上的门控转移到新连接上
    fn remove_node_reconnecting(&mut self, id: NodeId) -> Result<(), NetworkError> {
        let reconnect = self.config.mutation.sub_node_reconnect;
        let keep_gates = self.config.mutation.keep_gates;

        let node = self.node(id)?;
        let mut predecessors = Vec::new();
        let mut successors = Vec::new();
        let mut gaters = Vec::new();
        for conn_id in node.incoming.iter().rev() {
            let conn = self.connection(*conn_id)?;
            predecessors.push(conn.from);
            gaters.extend(conn.gater);
        }
        for conn_id in node.outgoing.iter().rev() {
            let conn = self.connection(*conn_id)?;
            successors.push(conn.to);
            gaters.extend(conn.gater);
        }

        self.remove_node(id)?;
        if !reconnect {
            return Ok(());
        }

        let mut created = Vec::new();
        for &from in &predecessors {
            for &to in &successors {
                if from == to || self.edges.contains_key(&(from, to)) {
                    continue;
                }
                created.push(self.connect(from, to, None)?);
            }
        }

        if keep_gates {
            for gater in gaters {
                if created.is_empty() {
                    break;
                }
                let index = self.random_index(created.len());
                let conn = self.connection(created[index])?;
                if conn.from == gater || conn.to == gater {
                    continue;
                }
                self.gate(gater, created[index])?;
                created.remove(index);
            }
        }
        Ok(())
    }

    fn mutate_add_conn(&mut self) -> Result<(), NetworkError> {
        let candidates = self.possible_new_connections();
        let (from, to) = self.pick(&candidates, "网络已全连接，没有可新增的前向连接")?;
        self.connect(from, to, None)?;
        Ok(())
    }

    fn mutate_sub_conn(&mut self) -> Result<(), NetworkError> {
        let candidates = self.removable_connections();
        let conn_id = self.pick(&candidates, "没有可删除的前向连接")?;
        self.remove_connection(conn_id)
    }

    fn mutate_mod_weight(&mut self) -> Result<(), NetworkError> {
        let candidates: Vec<ConnectionId> = self.connections.keys().copied().collect();
        let conn_id = self.pick(&candidates, "网络中没有连接")?;
        let (min, max) = self.config.mutation.mod_weight_range;
        let delta = self.uniform(min, max);
        self.connection_mut(conn_id)?.weight += delta;
        Ok(())
    }

    fn mutate_mod_bias(&mut self) -> Result<(), NetworkError> {
        let candidates = self.order[self.input..].to_vec();
        let node = self.pick(&candidates, "网络中没有非输入节点")?;
        let (min, max) = self.config.mutation.mod_bias_range;
        let delta = self.uniform(min, max);
        self.node_mut(node)?.bias += delta;
        Ok(())
    }

    fn mutate_mod_activation(&mut self) -> Result<(), NetworkError> {
        let candidates = self.mutable_nodes();
        let node = self.pick(&candidates, "没有可更换激活函数的节点")?;
        let current = self.node(node)?.squash;
        let squash = self
            .random_squash(Some(current))
            .ok_or_else(|| {
                NetworkError::InvalidMutation("没有可切换的其它激活函数".to_string())
            })?;
        self.set_squash(node, squash)
    }

    fn mutate_add_self_conn(&mut self) -> Result<(), NetworkError> {
        let candidates: Vec<NodeId> = self.order[self.input..]
            .iter()
            .copied()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|n| n.self_connection.is_none())
            })
            .collect();
        let node = self.pick(&candidates, "所有非输入节点都已有自连接")?;
        self.connect(node, node, Some(1.0))?;
        Ok(())
    }

    fn mutate_sub_self_conn(&mut self) -> Result<(), NetworkError> {
        let candidates: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| c.is_self_connection())
            .map(|c| c.id)
            .collect();
        let conn_id = self.pick(&candidates, "网络中没有自连接")?;
        self.remove_connection(conn_id)
    }

    fn mutate_add_gate(&mut self) -> Result<(), NetworkError> {
        let ungated: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| c.gater.is_none())
            .map(|c| c.id)
            .collect();
        let conn_id = self.pick(&ungated, "所有连接都已被门控")?;
        let conn = self.connection(conn_id)?;
        let (from, to) = (conn.from, conn.to);
        let gaters: Vec<NodeId> = self.order[self.input..]
            .iter()
            .copied()
            .filter(|&id| id != from && id != to)
            .collect();
        let gater = self.pick(&gaters, "没有可作为门控的节点")?;
        self.gate(gater, conn_id)
    }

    fn mutate_sub_gate(&mut self) -> Result<(), NetworkError> {
        let candidates: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| c.gater.is_some())
            .map(|c| c.id)
            .collect();
        let conn_id = self.pick(&candidates, "网络中没有被门控的连接")?;
        self.ungate(conn_id)
    }

    fn mutate_add_back_conn(&mut self) -> Result<(), NetworkError> {
        let candidates = self.possible_back_connections();
        let (from, to) = self.pick(&candidates, "没有可新增的循环连接")?;
        self.connect(from, to, None)?;
        Ok(())
    }

    fn mutate_sub_back_conn(&mut self) -> Result<(), NetworkError> {
        let index = self.index_map();
        let candidates: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| match (index.get(&c.from), index.get(&c.to)) {
                (Some(i), Some(j)) => i > j,
                _ => false,
            })
            .filter(|c| self.keeps_other_links(c.from, c.to))
            .map(|c| c.id)
            .collect();
        let conn_id = self.pick(&candidates, "没有可删除的循环连接")?;
        self.remove_connection(conn_id)
    }

    fn mutate_swap_nodes(&mut self) -> Result<(), NetworkError> {
        let candidates = self.mutable_nodes();
        if candidates.len() < 2 {
            return Err(NetworkError::InvalidMutation(
                "可交换的节点不足两个".to_string(),
            ));
        }
        let first = self.random_index(candidates.len());
        let mut second = self.random_index(candidates.len() - 1);
        if second >= first {
            second += 1;
        }
        let (a, b) = (candidates[first], candidates[second]);
        let (bias_a, squash_a) = {
            let node = self.node(a)?;
            (node.bias, node.squash)
        };
        let (bias_b, squash_b) = {
            let node = self.node(b)?;
            (node.bias, node.squash)
        };
        let node = self.node_mut(a)?;
        node.bias = bias_b;
        node.squash = squash_b;
        let node = self.node_mut(b)?;
        node.bias = bias_a;
        node.squash = squash_a;
        Ok(())
    }

    // ========== 辅助 ==========

    /// MOD_ACTIVATION / SWAP_NODES 可作用的节点：非输入节点，输出节点视配置而定
    fn mutable_nodes(&self) -> Vec<NodeId> {
        let end = if self.config.mutation.mutate_output {
            self.order.len()
        } else {
            self.order.len() - self.output
        };
        self.order[self.input..end].to_vec()
    }

    /// 从允许的激活函数中随机选一个；给定 `current` 时保证选出的与之不同
    fn random_squash(&mut self, current: Option<Activation>) -> Option<Activation> {
        let allowed = self.config.mutation.allowed_squash.clone();
        let position = current.and_then(|c| allowed.iter().position(|&a| a == c));
        match position {
            Some(index) => {
                if allowed.len() < 2 {
                    return None;
                }
                let offset = 1 + self.random_index(allowed.len() - 1);
                Some(allowed[(index + offset) % allowed.len()])
            }
            None if allowed.is_empty() => None,
            None => {
                let index = self.random_index(allowed.len());
                Some(allowed[index])
            }
        }
    }

    /// 从候选中随机取一个，候选为空时返回 `InvalidMutation`
    fn pick<T: Copy>(&mut self, candidates: &[T], reason: &str) -> Result<T, NetworkError> {
        if candidates.is_empty() {
            return Err(NetworkError::InvalidMutation(reason.to_string()));
        }
        let index = self.random_index(candidates.len());
        Ok(candidates[index])
    }
}
