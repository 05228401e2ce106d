/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network：可变拓扑神经网络的核心容器
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、节点/连接的增删、门控、访问器
 * - forward.rs: 前向激活（含资格迹）
 * - backward.rs: 反向传播与权重更新
 * - evolution.rs: 结构变异算子
 * - crossover.rs: 两个网络的交叉
 * - train.rs: 训练/测试循环
 * - serialization.rs: to_json/from_json（NetworkDescriptor）
 * - model_io.rs: save_model/load_model 文件读写
 * - describe.rs: summary 摘要
 */

mod backward;
mod core;
mod crossover;
mod describe;
mod error;
mod evolution;
mod forward;
mod model_io;
mod serialization;
mod train;
mod types;

pub use error::NetworkError;
pub use types::{
    CancelToken, CrossValidate, NetworkConfig, Sample, TestResult, TrainOptions, TrainResult,
};

use crate::nn::connection::{Connection, ConnectionId};
use crate::nn::node::{Node, NodeId};
use rand::rngs::StdRng;
use std::collections::{BTreeMap, HashMap};

/// 可变拓扑神经网络
///
/// 节点与连接都存放在以稳定 id 为键的表中，`order` 给出节点序列（同时也是求值顺序）：
/// 前 `input` 个为输入节点，后 `output` 个为输出节点，中间为隐藏/常量节点。
/// 连接表按 id 有序迭代，因此固定种子时变异与训练结果可复现。
#[derive(Debug, Clone)]
pub struct Network {
    pub(in crate::nn) input: usize,
    pub(in crate::nn) output: usize,
    /// 节点序列（求值顺序）
    pub(in crate::nn) order: Vec<NodeId>,
    pub(in crate::nn) nodes: HashMap<NodeId, Node>,
    pub(in crate::nn) connections: BTreeMap<ConnectionId, Connection>,
    /// (from, to) -> 连接 id，用于 O(1) 判断两节点是否已相连
    pub(in crate::nn) edges: HashMap<(NodeId, NodeId), ConnectionId>,
    pub(in crate::nn) next_node_id: u64,
    pub(in crate::nn) next_connection_id: u64,
    pub(in crate::nn) dropout: f64,
    /// 适应度，由外部的种群代码写入，交叉时用于判断哪个父代更优
    pub(in crate::nn) score: Option<f64>,
    pub(in crate::nn) config: NetworkConfig,
    /// 网络级别的随机数生成器（用于权重初始化、变异、打乱样本等）
    /// None 表示使用默认的 thread_rng（非确定性）
    pub(in crate::nn) rng: Option<StdRng>,
}
