/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 网络节点（Node）：偏置 + 激活函数 + 每步的瞬态量
 *
 * 节点本身不拥有连接，只保存入边/出边/被门控边的 id 列表（非拥有的反向索引），
 * 连接统一由 Network 持有。
 */

use super::activation::Activation;
use super::connection::ConnectionId;
use super::display::format_node_display;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点 id（在所属网络内稳定，不随节点在序列中的位置变化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Input,
    Hidden,
    Output,
    /// 参与计算，但训练时不更新偏置与入边权重
    Constant,
}

impl NodeKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Hidden => "hidden",
            Self::Output => "output",
            Self::Constant => "constant",
        }
    }
}

/// 反向传播时的误差信号
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ErrorSignal {
    /// 总误差责任 = projected + gated
    pub responsibility: f64,
    /// 经由出边传回的误差
    pub projected: f64,
    /// 经由门控关系传回的误差
    pub gated: f64,
}

/// 网络中的单个节点
#[derive(Debug, Clone)]
pub struct Node {
    pub(in crate::nn) id: NodeId,
    pub(in crate::nn) kind: NodeKind,
    pub(in crate::nn) bias: f64,
    pub(in crate::nn) squash: Activation,

    // ========== 瞬态量（每次激活都会重算）==========
    pub(in crate::nn) state: f64,
    /// 上一次激活前的 state
    pub(in crate::nn) old: f64,
    pub(in crate::nn) activation: f64,
    pub(in crate::nn) derivative: f64,
    /// dropout 掩码：训练时为 0 或 1，推理时为 1（或 1 - dropout）
    pub(in crate::nn) mask: f64,
    pub(in crate::nn) error: ErrorSignal,

    // ========== 动量/小批量累积 ==========
    pub(in crate::nn) previous_delta_bias: f64,
    pub(in crate::nn) total_delta_bias: f64,

    // ========== 反向索引 ==========
    pub(in crate::nn) incoming: Vec<ConnectionId>,
    pub(in crate::nn) outgoing: Vec<ConnectionId>,
    /// 本节点作为门控者的连接
    pub(in crate::nn) gated: Vec<ConnectionId>,
    pub(in crate::nn) self_connection: Option<ConnectionId>,
}

impl Node {
    pub(in crate::nn) fn new(id: NodeId, kind: NodeKind, bias: f64) -> Self {
        Self {
            id,
            kind,
            // 输入节点没有偏置语义
            bias: if kind == NodeKind::Input { 0.0 } else { bias },
            squash: Activation::default(),
            state: 0.0,
            old: 0.0,
            activation: 0.0,
            derivative: 0.0,
            mask: 1.0,
            error: ErrorSignal::default(),
            previous_delta_bias: 0.0,
            total_delta_bias: 0.0,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            gated: Vec::new(),
            self_connection: None,
        }
    }

    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    pub const fn bias(&self) -> f64 {
        self.bias
    }

    pub const fn squash(&self) -> Activation {
        self.squash
    }

    pub const fn state(&self) -> f64 {
        self.state
    }

    pub const fn activation(&self) -> f64 {
        self.activation
    }

    pub const fn derivative(&self) -> f64 {
        self.derivative
    }

    pub const fn mask(&self) -> f64 {
        self.mask
    }

    pub const fn error(&self) -> ErrorSignal {
        self.error
    }

    pub fn incoming(&self) -> &[ConnectionId] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[ConnectionId] {
        &self.outgoing
    }

    pub fn gated(&self) -> &[ConnectionId] {
        &self.gated
    }

    pub const fn self_connection(&self) -> Option<ConnectionId> {
        self.self_connection
    }

    pub fn is_input(&self) -> bool {
        self.kind == NodeKind::Input
    }

    pub fn is_output(&self) -> bool {
        self.kind == NodeKind::Output
    }

    /// 清空瞬态量（state/activation/误差），动量累积保留
    pub(in crate::nn) fn clear(&mut self) {
        self.state = 0.0;
        self.old = 0.0;
        self.activation = 0.0;
        self.derivative = 0.0;
        self.error = ErrorSignal::default();
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            format_node_display(self.id, self.kind.name(), self.squash.name())
        )
    }
}
