/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 核心操作：创建、节点/连接增删、门控、访问器
 */

use super::error::NetworkError;
use super::types::NetworkConfig;
use super::Network;
use crate::nn::activation::Activation;
use crate::nn::connection::{Connection, ConnectionId};
use crate::nn::node::{Node, NodeId, NodeKind};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::{BTreeMap, HashMap};

impl Network {
    // ========== 创建 ==========

    /// 创建输入层与输出层全连接的网络
    ///
    /// 初始权重为 `U(0, 1) * input * sqrt(2 / input)`
    pub fn new(input: usize, output: usize) -> Self {
        let mut network = Self::empty(input, output);
        network.connect_inputs_to_outputs();
        network
    }

    /// 创建一个带固定种子的全连接网络（确保可重复性）
    pub fn new_with_seed(input: usize, output: usize, seed: u64) -> Self {
        let mut network = Self::empty_with_seed(input, output, seed);
        network.connect_inputs_to_outputs();
        network
    }

    /// 只有输入/输出节点、没有任何连接的网络（供预设结构逐步搭建）
    pub fn empty(input: usize, output: usize) -> Self {
        Self::build_empty(input, output, None)
    }

    pub fn empty_with_seed(input: usize, output: usize, seed: u64) -> Self {
        Self::build_empty(input, output, Some(StdRng::seed_from_u64(seed)))
    }

    /// 替换网络配置（构造时链式调用）
    pub fn with_config(mut self, config: NetworkConfig) -> Self {
        self.config = config;
        self
    }

    /// 没有任何节点的空壳，节点由调用方按序压入
    pub(in crate::nn) fn blank(input: usize, output: usize, rng: Option<StdRng>) -> Self {
        Self {
            input,
            output,
            order: Vec::new(),
            nodes: HashMap::new(),
            connections: BTreeMap::new(),
            edges: HashMap::new(),
            next_node_id: 0,
            next_connection_id: 0,
            dropout: 0.0,
            score: None,
            config: NetworkConfig::default(),
            rng,
        }
    }

    fn build_empty(input: usize, output: usize, rng: Option<StdRng>) -> Self {
        let mut network = Self::blank(input, output, rng);
        for _ in 0..input {
            let id = network.create_node(NodeKind::Input);
            network.order.push(id);
        }
        for _ in 0..output {
            let id = network.create_node(NodeKind::Output);
            network.order.push(id);
        }
        network
    }

    fn connect_inputs_to_outputs(&mut self) {
        let scale = self.input as f64 * (2.0 / self.input.max(1) as f64).sqrt();
        let inputs = self.input_nodes();
        let outputs = self.output_nodes();
        for &from in &inputs {
            for &to in &outputs {
                let weight = self.with_rng(|rng| rng.r#gen::<f64>()) * scale;
                self.push_connection(from, to, weight);
            }
        }
    }

    // ========== 随机数 ==========

    /// 设置/重置网络的随机种子
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Some(StdRng::seed_from_u64(seed));
    }

    /// 检查网络是否有固定种子
    pub const fn has_seed(&self) -> bool {
        self.rng.is_some()
    }

    /// 使用网络的 rng（无种子时退回 thread_rng）
    pub(in crate::nn) fn with_rng<T>(&mut self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        match self.rng.as_mut() {
            Some(rng) => f(rng),
            None => f(&mut rand::thread_rng()),
        }
    }

    /// `[low, high)` 上的均匀分布；区间为空时直接返回 `low`
    pub(in crate::nn) fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high > low {
            self.with_rng(|rng| rng.gen_range(low..high))
        } else {
            low
        }
    }

    /// `[0, len)` 上的随机下标，`len` 须大于 0
    pub(in crate::nn) fn random_index(&mut self, len: usize) -> usize {
        self.with_rng(|rng| rng.gen_range(0..len))
    }

    pub(in crate::nn) fn random_bool(&mut self) -> bool {
        self.with_rng(|rng| rng.gen_bool(0.5))
    }

    // ========== 基础访问器 ==========

    pub const fn input_count(&self) -> usize {
        self.input
    }

    pub const fn output_count(&self) -> usize {
        self.output
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// 按求值顺序排列的节点 id
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn input_nodes(&self) -> Vec<NodeId> {
        self.order[..self.input].to_vec()
    }

    pub fn output_nodes(&self) -> Vec<NodeId> {
        self.order[self.order.len() - self.output..].to_vec()
    }

    /// 输入与输出之间的节点（隐藏节点与常量节点）
    pub fn hidden_nodes(&self) -> Vec<NodeId> {
        self.order[self.input..self.order.len() - self.output].to_vec()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, NetworkError> {
        self.nodes.get(&id).ok_or(NetworkError::NodeNotFound(id))
    }

    pub(in crate::nn) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, NetworkError> {
        self.nodes.get_mut(&id).ok_or(NetworkError::NodeNotFound(id))
    }

    pub fn connection(&self, id: ConnectionId) -> Result<&Connection, NetworkError> {
        self.connections
            .get(&id)
            .ok_or(NetworkError::ConnectionNotFound(id))
    }

    pub(in crate::nn) fn connection_mut(
        &mut self,
        id: ConnectionId,
    ) -> Result<&mut Connection, NetworkError> {
        self.connections
            .get_mut(&id)
            .ok_or(NetworkError::ConnectionNotFound(id))
    }

    /// 所有连接（含自连接），按连接 id 排列
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// 查找 from -> to 的连接
    pub fn find_connection(&self, from: NodeId, to: NodeId) -> Option<ConnectionId> {
        self.edges.get(&(from, to)).copied()
    }

    /// 节点在序列中的位置
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|&n| n == id)
    }

    /// 节点 id -> 序列位置 的映射（批量查询时使用）
    pub(in crate::nn) fn index_map(&self) -> HashMap<NodeId, usize> {
        self.order
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect()
    }

    pub const fn dropout(&self) -> f64 {
        self.dropout
    }

    pub fn set_dropout(&mut self, dropout: f64) {
        self.dropout = dropout;
    }

    pub const fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn set_score(&mut self, score: Option<f64>) {
        self.score = score;
    }

    pub const fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut NetworkConfig {
        &mut self.config
    }

    // ========== 节点操作 ==========

    /// 分配 id 并创建节点（不放入序列）；非输入节点的偏置取 `U(-0.1, 0.1)`
    pub(in crate::nn) fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        let bias = if kind == NodeKind::Input {
            0.0
        } else {
            self.uniform(-0.1, 0.1)
        };
        self.nodes.insert(id, Node::new(id, kind, bias));
        id
    }

    /// 新增一个隐藏节点，插在输出节点之前
    pub fn add_node(&mut self) -> NodeId {
        let position = self.order.len() - self.output;
        let id = self.create_node(NodeKind::Hidden);
        self.order.insert(position, id);
        id
    }

    /// 在序列的指定位置插入隐藏节点，位置须落在输入节点之后、输出节点之前（含边界）
    pub fn insert_node(&mut self, position: usize) -> Result<NodeId, NetworkError> {
        let upper = self.order.len() - self.output;
        if position < self.input || position > upper {
            return Err(NetworkError::InvalidOperation(format!(
                "隐藏节点的插入位置须在[{}, {}]内，实际为{}",
                self.input, upper, position
            )));
        }
        let id = self.create_node(NodeKind::Hidden);
        self.order.insert(position, id);
        Ok(id)
    }

    /// 删除隐藏/常量节点及其所有连接；它门控的连接全部解除门控
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), NetworkError> {
        let node = self.node(id)?;
        if !matches!(node.kind, NodeKind::Hidden | NodeKind::Constant) {
            return Err(NetworkError::InvalidOperation(format!(
                "只能删除隐藏或常量节点，节点{}的类型为{}",
                id,
                node.kind.name()
            )));
        }
        let mut doomed: Vec<ConnectionId> = node.incoming.clone();
        doomed.extend(node.outgoing.iter().copied());
        doomed.extend(node.self_connection);
        let gated = node.gated.clone();

        for conn_id in gated {
            self.ungate(conn_id)?;
        }
        for conn_id in doomed {
            self.remove_connection(conn_id)?;
        }
        self.order.retain(|&n| n != id);
        self.nodes.remove(&id);
        Ok(())
    }

    pub fn set_bias(&mut self, id: NodeId, bias: f64) -> Result<(), NetworkError> {
        let node = self.node_mut(id)?;
        if node.kind == NodeKind::Input {
            return Err(NetworkError::InvalidOperation(format!(
                "输入节点{id}没有偏置"
            )));
        }
        node.bias = bias;
        Ok(())
    }

    pub fn set_squash(&mut self, id: NodeId, squash: Activation) -> Result<(), NetworkError> {
        self.node_mut(id)?.squash = squash;
        Ok(())
    }

    /// 修改节点类型：只允许在隐藏与常量之间切换
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> Result<(), NetworkError> {
        let node = self.node_mut(id)?;
        let movable = |k| matches!(k, NodeKind::Hidden | NodeKind::Constant);
        if !movable(node.kind) || !movable(kind) {
            return Err(NetworkError::InvalidOperation(format!(
                "节点类型只能在hidden与constant之间切换，节点{}：{} -> {}",
                id,
                node.kind.name(),
                kind.name()
            )));
        }
        node.kind = kind;
        Ok(())
    }

    // ========== 连接操作 ==========

    /// 连接两个节点
    ///
    /// `weight` 缺省时普通连接取 `U(-0.1, 0.1)`，自连接取 1.0。
    /// 目标为输入节点、或 (from, to) 已有连接时报错。
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: Option<f64>,
    ) -> Result<ConnectionId, NetworkError> {
        self.node(from)?;
        let target = self.node(to)?;
        if target.kind == NodeKind::Input {
            return Err(NetworkError::InvalidOperation(format!(
                "不能连接到输入节点{to}"
            )));
        }
        if self.edges.contains_key(&(from, to)) {
            return Err(NetworkError::InvalidOperation(format!(
                "连接{from}->{to}已存在"
            )));
        }
        let weight = match weight {
            Some(w) => w,
            None if from == to => 1.0,
            None => self.uniform(-0.1, 0.1),
        };
        Ok(self.push_connection(from, to, weight))
    }

    /// 不做校验地新增连接并维护反向索引（调用方保证两端存在且未相连）
    pub(in crate::nn) fn push_connection(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: f64,
    ) -> ConnectionId {
        let id = ConnectionId(self.next_connection_id);
        self.next_connection_id += 1;

        let mut connection = Connection::new(id, from, to, weight);
        if let (Some(i), Some(j)) = (self.index_of(from), self.index_of(to)) {
            connection.recurrent = i > j;
        }
        self.connections.insert(id, connection);
        self.edges.insert((from, to), id);

        if from == to {
            if let Some(node) = self.nodes.get_mut(&from) {
                node.self_connection = Some(id);
            }
        } else {
            if let Some(node) = self.nodes.get_mut(&from) {
                node.outgoing.push(id);
            }
            if let Some(node) = self.nodes.get_mut(&to) {
                node.incoming.push(id);
            }
        }
        id
    }

    /// 断开 from -> to 的连接
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> Result<(), NetworkError> {
        let id = self.find_connection(from, to).ok_or_else(|| {
            NetworkError::InvalidOperation(format!("连接{from}->{to}不存在"))
        })?;
        self.remove_connection(id)
    }

    /// 删除连接并清理两端节点与门控节点上的索引
    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<(), NetworkError> {
        let connection = self
            .connections
            .remove(&id)
            .ok_or(NetworkError::ConnectionNotFound(id))?;
        self.edges.remove(&(connection.from, connection.to));

        if connection.from == connection.to {
            if let Some(node) = self.nodes.get_mut(&connection.from) {
                node.self_connection = None;
            }
        } else {
            if let Some(node) = self.nodes.get_mut(&connection.from) {
                node.outgoing.retain(|&c| c != id);
            }
            if let Some(node) = self.nodes.get_mut(&connection.to) {
                node.incoming.retain(|&c| c != id);
            }
        }
        if let Some(gater) = connection.gater {
            if let Some(node) = self.nodes.get_mut(&gater) {
                node.gated.retain(|&c| c != id);
            }
        }
        Ok(())
    }

    pub fn set_weight(&mut self, id: ConnectionId, weight: f64) -> Result<(), NetworkError> {
        self.connection_mut(id)?.weight = weight;
        Ok(())
    }

    /// 启用/禁用连接；禁用的连接不传递信号，也不参与训练
    pub fn set_enabled(&mut self, id: ConnectionId, enabled: bool) -> Result<(), NetworkError> {
        self.connection_mut(id)?.enabled = enabled;
        Ok(())
    }

    // ========== 门控 ==========

    /// 让 `gater` 门控连接 `id`：此后连接的增益等于门控节点的激活值
    ///
    /// 门控节点不能是输入节点，也不能是连接的任一端点；一条连接只能有一个门控节点。
    pub fn gate(&mut self, gater: NodeId, id: ConnectionId) -> Result<(), NetworkError> {
        let gater_node = self.node(gater)?;
        if gater_node.kind == NodeKind::Input {
            return Err(NetworkError::InvalidOperation(format!(
                "输入节点{gater}不能作为门控节点"
            )));
        }
        let gater_activation = gater_node.activation;
        let connection = self.connection(id)?;
        if connection.from == gater || connection.to == gater {
            return Err(NetworkError::InvalidOperation(format!(
                "门控节点{gater}不能是连接{id}的端点"
            )));
        }
        if let Some(existing) = connection.gater {
            return Err(NetworkError::InvalidOperation(format!(
                "连接{id}已被节点{existing}门控"
            )));
        }

        let connection = self.connection_mut(id)?;
        connection.gater = Some(gater);
        connection.gain = gater_activation;
        self.node_mut(gater)?.gated.push(id);
        Ok(())
    }

    /// 解除连接的门控，增益恢复为 1
    pub fn ungate(&mut self, id: ConnectionId) -> Result<(), NetworkError> {
        let connection = self.connection_mut(id)?;
        let gater = connection.gater.take().ok_or_else(|| {
            NetworkError::InvalidOperation(format!("连接{id}没有被门控"))
        })?;
        connection.gain = 1.0;
        if let Some(node) = self.nodes.get_mut(&gater) {
            node.gated.retain(|&c| c != id);
        }
        Ok(())
    }

    // ========== 状态 ==========

    /// 清空所有瞬态量（state、activation、迹、误差）
    pub fn clear(&mut self) {
        for node in self.nodes.values_mut() {
            node.clear();
        }
        for connection in self.connections.values_mut() {
            connection.clear();
        }
    }

    // ========== 结构检查 ==========

    /// 是否满足前馈约束：非自连接、非循环、未被门控的连接都从序列靠前的节点指向靠后的节点
    pub fn is_feed_forward(&self) -> bool {
        let index = self.index_map();
        self.connections
            .values()
            .filter(|c| !c.is_self_connection() && !c.recurrent && c.gater.is_none())
            .all(|c| match (index.get(&c.from), index.get(&c.to)) {
                (Some(i), Some(j)) => i < j,
                _ => false,
            })
    }

    /// 是否不含任何自连接、循环连接或门控（严格的前馈网络）
    pub fn is_strictly_feed_forward(&self) -> bool {
        let index = self.index_map();
        self.connections.values().all(|c| {
            c.gater.is_none()
                && match (index.get(&c.from), index.get(&c.to)) {
                    (Some(i), Some(j)) => i < j,
                    _ => false,
                }
        })
    }

    /// 结构完整性检查：节点布局、连接端点、门控节点与各反向索引互相一致
    pub fn validate(&self) -> Result<(), NetworkError> {
        let invalid = |msg: String| Err(NetworkError::InvalidOperation(msg));
        let n = self.order.len();
        if n != self.nodes.len() || n < self.input + self.output {
            return invalid(format!(
                "节点序列长度{}与节点表大小{}不一致",
                n,
                self.nodes.len()
            ));
        }
        for (i, id) in self.order.iter().enumerate() {
            let node = self.node(*id)?;
            let expected_ok = if i < self.input {
                node.kind == NodeKind::Input
            } else if i >= n - self.output {
                node.kind == NodeKind::Output
            } else {
                matches!(node.kind, NodeKind::Hidden | NodeKind::Constant)
            };
            if !expected_ok {
                return invalid(format!("位置{}的节点{}类型为{}", i, id, node.kind.name()));
            }
        }

        let index = self.index_map();
        for connection in self.connections.values() {
            let (from, to, id) = (connection.from, connection.to, connection.id);
            let (Some(&i), Some(&j)) = (index.get(&from), index.get(&to)) else {
                return invalid(format!("连接{id}的端点不在网络中"));
            };
            if connection.recurrent != (i > j) {
                return invalid(format!("连接{id}的循环标记与节点顺序不符"));
            }
            if self.edges.get(&(from, to)) != Some(&id) {
                return invalid(format!("连接{id}未登记在边索引中"));
            }
            let (source, target) = (self.node(from)?, self.node(to)?);
            let linked = if from == to {
                source.self_connection == Some(id)
            } else {
                source.outgoing.contains(&id) && target.incoming.contains(&id)
            };
            if !linked {
                return invalid(format!("连接{id}未登记在端点节点上"));
            }
            if let Some(gater) = connection.gater {
                if gater == from || gater == to {
                    return invalid(format!("连接{id}的门控节点是其端点"));
                }
                if !self.node(gater)?.gated.contains(&id) {
                    return invalid(format!("连接{id}未登记在门控节点{gater}上"));
                }
            }
        }
        if self.edges.len() != self.connections.len() {
            return invalid("边索引与连接表大小不一致".to_string());
        }
        for node in self.nodes.values() {
            let refs = node
                .incoming
                .iter()
                .chain(node.outgoing.iter())
                .chain(node.gated.iter())
                .chain(node.self_connection.iter());
            for conn_id in refs {
                if !self.connections.contains_key(conn_id) {
                    return invalid(format!("节点{}引用了不存在的连接{}", node.id, conn_id));
                }
            }
        }
        Ok(())
    }
}
