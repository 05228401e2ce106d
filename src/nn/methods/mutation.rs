/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 结构变异目录（NEAT 式拓扑变异）及其参数
 *
 * 具体的变异算子实现在 `network/evolution.rs`，这里只定义“有哪些变异”和“变异的参数”。
 */

use crate::nn::activation::Activation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 变异算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutation {
    /// 拆分一条连接，插入新的隐藏节点
    AddNode,
    /// 删除一个隐藏节点
    SubNode,
    /// 新增一条前向连接
    AddConn,
    /// 删除一条前向连接
    SubConn,
    /// 扰动一条连接的权重
    ModWeight,
    /// 扰动一个节点的偏置
    ModBias,
    /// 更换一个节点的激活函数
    ModActivation,
    AddSelfConn,
    SubSelfConn,
    /// 让某个节点门控一条连接
    AddGate,
    SubGate,
    /// 新增一条循环（后向）连接
    AddBackConn,
    SubBackConn,
    /// 交换两个节点的偏置与激活函数
    SwapNodes,
}

impl Mutation {
    /// 全部变异算子
    pub const ALL: [Self; 14] = [
        Self::AddNode,
        Self::SubNode,
        Self::AddConn,
        Self::SubConn,
        Self::ModWeight,
        Self::ModBias,
        Self::ModActivation,
        Self::AddSelfConn,
        Self::SubSelfConn,
        Self::AddGate,
        Self::SubGate,
        Self::AddBackConn,
        Self::SubBackConn,
        Self::SwapNodes,
    ];

    /// 只会产生纯前馈网络的变异算子（不引入自连接、门控与循环连接）
    pub const FFW: [Self; 8] = [
        Self::AddNode,
        Self::SubNode,
        Self::AddConn,
        Self::SubConn,
        Self::ModWeight,
        Self::ModBias,
        Self::ModActivation,
        Self::SwapNodes,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::AddNode => "ADD_NODE",
            Self::SubNode => "SUB_NODE",
            Self::AddConn => "ADD_CONN",
            Self::SubConn => "SUB_CONN",
            Self::ModWeight => "MOD_WEIGHT",
            Self::ModBias => "MOD_BIAS",
            Self::ModActivation => "MOD_ACTIVATION",
            Self::AddSelfConn => "ADD_SELF_CONN",
            Self::SubSelfConn => "SUB_SELF_CONN",
            Self::AddGate => "ADD_GATE",
            Self::SubGate => "SUB_GATE",
            Self::AddBackConn => "ADD_BACK_CONN",
            Self::SubBackConn => "SUB_BACK_CONN",
            Self::SwapNodes => "SWAP_NODES",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// SUB_CONN 删除连接时的策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubConnPolicy {
    /// 任意前向连接都可删除；失去全部入边的节点只剩偏置
    #[default]
    Allow,
    /// 只删除“源节点仍有其它出边、目标节点仍有其它入边”的连接
    KeepPaths,
}

/// 变异参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// MOD_WEIGHT 的扰动区间 `[min, max)`
    pub mod_weight_range: (f64, f64),
    /// MOD_BIAS 的扰动区间 `[min, max)`
    pub mod_bias_range: (f64, f64),
    /// MOD_ACTIVATION / ADD_NODE 可选的激活函数
    pub allowed_squash: Vec<Activation>,
    /// MOD_ACTIVATION / SWAP_NODES 是否允许作用于输出节点
    pub mutate_output: bool,
    /// SUB_NODE 删除节点后是否把前驱与后继重新连起来
    pub sub_node_reconnect: bool,
    /// SUB_NODE 重新连接时是否保留原连接上的门控
    pub keep_gates: bool,
    pub sub_conn_policy: SubConnPolicy,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mod_weight_range: (-1.0, 1.0),
            mod_bias_range: (-1.0, 1.0),
            allowed_squash: Activation::ALL.to_vec(),
            mutate_output: true,
            sub_node_reconnect: true,
            keep_gates: true,
            sub_conn_policy: SubConnPolicy::Allow,
        }
    }
}
