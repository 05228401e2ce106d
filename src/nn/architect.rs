/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 预设网络结构（感知机、LSTM、随机网络）
 *
 * 只使用 Network 的公开构建接口（empty/add_node/connect/gate/mutate）。
 */

use super::methods::Mutation;
use super::network::{Network, NetworkError};
use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// LSTM 的可选连接
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LstmOptions {
    /// 同一块内记忆单元之间互连（受输入门门控）
    pub memory_to_memory: bool,
    /// 输出层回连到记忆单元（受输入门门控）
    pub output_to_memory: bool,
    /// 输出层回连到三个门
    pub output_to_gates: bool,
    /// 输入层直连输出层
    pub input_to_output: bool,
    /// 输入层直连第二块及之后的记忆单元（受输入门门控）
    pub input_to_deep: bool,
}

impl Default for LstmOptions {
    fn default() -> Self {
        Self {
            memory_to_memory: false,
            output_to_memory: false,
            output_to_gates: false,
            input_to_output: true,
            input_to_deep: true,
        }
    }
}

/// 随机网络的结构参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomOptions {
    /// 连接总数，缺省为隐藏节点数的两倍
    pub connections: Option<usize>,
    pub back_connections: usize,
    pub self_connections: usize,
    pub gates: usize,
}

fn base(input: usize, output: usize, seed: Option<u64>) -> Network {
    match seed {
        Some(seed) => Network::empty_with_seed(input, output, seed),
        None => Network::empty(input, output),
    }
}

fn add_group(network: &mut Network, size: usize) -> Vec<NodeId> {
    (0..size).map(|_| network.add_node()).collect()
}

fn connect_all(network: &mut Network, from: &[NodeId], to: &[NodeId]) -> Result<(), NetworkError> {
    for &f in from {
        for &t in to {
            network.connect(f, t, None)?;
        }
    }
    Ok(())
}

fn set_group_bias(network: &mut Network, group: &[NodeId], bias: f64) -> Result<(), NetworkError> {
    for &id in group {
        network.set_bias(id, bias)?;
    }
    Ok(())
}

/// 让 `gaters` 门控 from -> to 的全部连接，按目标节点在 `to` 中的位置轮流分配门控节点
fn gate_by_target(
    network: &mut Network,
    gaters: &[NodeId],
    from: &[NodeId],
    to: &[NodeId],
) -> Result<(), NetworkError> {
    for (i, &t) in to.iter().enumerate() {
        let gater = gaters[i % gaters.len()];
        for &f in from {
            if let Some(conn) = network.find_connection(f, t) {
                network.gate(gater, conn)?;
            }
        }
    }
    Ok(())
}

// ========== 感知机 ==========

/// 多层感知机：相邻层全连接，`layers` 为 `[输入, 隐藏..., 输出]`
pub fn perceptron(layers: &[usize]) -> Result<Network, NetworkError> {
    build_perceptron(layers, None)
}

pub fn perceptron_seeded(layers: &[usize], seed: u64) -> Result<Network, NetworkError> {
    build_perceptron(layers, Some(seed))
}

fn build_perceptron(layers: &[usize], seed: Option<u64>) -> Result<Network, NetworkError> {
    if layers.len() < 2 {
        return Err(NetworkError::InvalidOperation(format!(
            "感知机至少需要2层，实际为{}层",
            layers.len()
        )));
    }
    let input = layers[0];
    let output = layers[layers.len() - 1];
    let mut network = base(input, output, seed);

    let mut previous = network.input_nodes();
    for &size in &layers[1..layers.len() - 1] {
        let layer = add_group(&mut network, size);
        connect_all(&mut network, &previous, &layer)?;
        previous = layer;
    }
    let outputs = network.output_nodes();
    connect_all(&mut network, &previous, &outputs)?;
    Ok(network)
}

// ========== LSTM ==========

/// LSTM 网络，`layers` 为 `[输入, 记忆块..., 输出]`
///
/// 每个记忆块包含输入门、遗忘门、记忆单元、输出门（偏置均为 1）：
/// - 上一层 -> 记忆单元，受输入门门控
/// - 记忆单元自连接（权重 1），受遗忘门门控
/// - 记忆单元 -> 块输出，受输出门门控
pub fn lstm(layers: &[usize], options: LstmOptions) -> Result<Network, NetworkError> {
    build_lstm(layers, options, None)
}

pub fn lstm_seeded(
    layers: &[usize],
    options: LstmOptions,
    seed: u64,
) -> Result<Network, NetworkError> {
    build_lstm(layers, options, Some(seed))
}

fn build_lstm(
    layers: &[usize],
    options: LstmOptions,
    seed: Option<u64>,
) -> Result<Network, NetworkError> {
    if layers.len() < 3 {
        return Err(NetworkError::InvalidOperation(format!(
            "LSTM 至少需要3层（输入、记忆块、输出），实际为{}层",
            layers.len()
        )));
    }
    let input = layers[0];
    let output = layers[layers.len() - 1];
    let blocks = &layers[1..layers.len() - 1];
    if blocks.contains(&0) {
        return Err(NetworkError::InvalidOperation(
            "LSTM 记忆块的大小须大于0".to_string(),
        ));
    }
    let mut network = base(input, output, seed);
    let inputs = network.input_nodes();
    let outputs = network.output_nodes();

    let mut previous = inputs.clone();
    for (i, &size) in blocks.iter().enumerate() {
        let is_last = i == blocks.len() - 1;
        let input_gate = add_group(&mut network, size);
        let forget_gate = add_group(&mut network, size);
        let memory_cell = add_group(&mut network, size);
        let output_gate = add_group(&mut network, size);
        let output_block = if is_last {
            outputs.clone()
        } else {
            add_group(&mut network, size)
        };
        for gate in [&input_gate, &forget_gate, &output_gate] {
            set_group_bias(&mut network, gate, 1.0)?;
        }

        // 块内连接
        connect_all(&mut network, &previous, &memory_cell)?;
        connect_all(&mut network, &previous, &input_gate)?;
        connect_all(&mut network, &previous, &output_gate)?;
        connect_all(&mut network, &previous, &forget_gate)?;
        connect_all(&mut network, &memory_cell, &input_gate)?;
        connect_all(&mut network, &memory_cell, &forget_gate)?;
        connect_all(&mut network, &memory_cell, &output_gate)?;
        for &cell in &memory_cell {
            network.connect(cell, cell, None)?;
        }
        connect_all(&mut network, &memory_cell, &output_block)?;

        // 门控
        gate_by_target(&mut network, &input_gate, &previous, &memory_cell)?;
        for (j, &cell) in memory_cell.iter().enumerate() {
            if let Some(conn) = network.find_connection(cell, cell) {
                network.gate(forget_gate[j % forget_gate.len()], conn)?;
            }
        }
        for (j, &cell) in memory_cell.iter().enumerate() {
            let gater = output_gate[j % output_gate.len()];
            for &target in &output_block {
                if let Some(conn) = network.find_connection(cell, target) {
                    network.gate(gater, conn)?;
                }
            }
        }

        // 可选连接
        if options.input_to_deep && i > 0 {
            connect_all(&mut network, &inputs, &memory_cell)?;
            gate_by_target(&mut network, &input_gate, &inputs, &memory_cell)?;
        }
        if options.memory_to_memory {
            for &from in &memory_cell {
                for &to in &memory_cell {
                    if from != to {
                        network.connect(from, to, None)?;
                    }
                }
            }
            let others: Vec<NodeId> = memory_cell.clone();
            for (j, &to) in memory_cell.iter().enumerate() {
                let gater = input_gate[j % input_gate.len()];
                for &from in others.iter().filter(|&&f| f != to) {
                    if let Some(conn) = network.find_connection(from, to) {
                        network.gate(gater, conn)?;
                    }
                }
            }
        }
        if options.output_to_memory {
            connect_all(&mut network, &outputs, &memory_cell)?;
            gate_by_target(&mut network, &input_gate, &outputs, &memory_cell)?;
        }
        if options.output_to_gates {
            connect_all(&mut network, &outputs, &input_gate)?;
            connect_all(&mut network, &outputs, &forget_gate)?;
            connect_all(&mut network, &outputs, &output_gate)?;
        }

        previous = output_block;
    }

    if options.input_to_output {
        connect_all(&mut network, &inputs, &outputs)?;
    }
    Ok(network)
}

// ========== 随机网络 ==========

/// 从输入输出全连接的网络出发，经由变异随机长出隐藏节点与连接
pub fn random(
    input: usize,
    hidden: usize,
    output: usize,
    options: RandomOptions,
) -> Network {
    build_random(Network::new(input, output), hidden, options)
}

pub fn random_seeded(
    input: usize,
    hidden: usize,
    output: usize,
    options: RandomOptions,
    seed: u64,
) -> Network {
    build_random(Network::new_with_seed(input, output, seed), hidden, options)
}

fn build_random(mut network: Network, hidden: usize, options: RandomOptions) -> Network {
    let connections = options.connections.unwrap_or(hidden * 2);
    for _ in 0..hidden {
        network.mutate(Mutation::AddNode);
    }
    for _ in 0..connections.saturating_sub(hidden) {
        network.mutate(Mutation::AddConn);
    }
    for _ in 0..options.back_connections {
        network.mutate(Mutation::AddBackConn);
    }
    for _ in 0..options.self_connections {
        network.mutate(Mutation::AddSelfConn);
    }
    for _ in 0..options.gates {
        network.mutate(Mutation::AddGate);
    }
    network
}
