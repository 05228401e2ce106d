/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 网络连接（Connection）：带权有向边，可被第三个节点门控
 */

use super::node::NodeId;
use std::fmt;

/// 连接 id（在所属网络内稳定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 两个节点之间的带权连接
///
/// - `from == to` 时为自连接（节点的记忆项）
/// - `gater` 存在时，有效权重为 `weight * gain`，`gain` 即门控节点的激活值
/// - `recurrent` 标记从序列中靠后的节点指向靠前节点的连接（读取的是上一步的激活值）
#[derive(Debug, Clone)]
pub struct Connection {
    pub(in crate::nn) id: ConnectionId,
    pub(in crate::nn) from: NodeId,
    pub(in crate::nn) to: NodeId,
    pub(in crate::nn) weight: f64,
    pub(in crate::nn) gain: f64,
    pub(in crate::nn) gater: Option<NodeId>,
    pub(in crate::nn) enabled: bool,
    pub(in crate::nn) recurrent: bool,

    // ========== 训练用的迹与动量 ==========
    pub(in crate::nn) eligibility: f64,
    /// 扩展迹：(被本连接目标节点门控影响的节点, 迹值)
    pub(in crate::nn) xtrace: Vec<(NodeId, f64)>,
    pub(in crate::nn) previous_delta_weight: f64,
    pub(in crate::nn) total_delta_weight: f64,
}

impl Connection {
    pub(in crate::nn) fn new(id: ConnectionId, from: NodeId, to: NodeId, weight: f64) -> Self {
        Self {
            id,
            from,
            to,
            weight,
            gain: 1.0,
            gater: None,
            enabled: true,
            recurrent: false,
            eligibility: 0.0,
            xtrace: Vec::new(),
            previous_delta_weight: 0.0,
            total_delta_weight: 0.0,
        }
    }

    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    pub const fn from(&self) -> NodeId {
        self.from
    }

    pub const fn to(&self) -> NodeId {
        self.to
    }

    pub const fn weight(&self) -> f64 {
        self.weight
    }

    pub const fn gain(&self) -> f64 {
        self.gain
    }

    pub const fn gater(&self) -> Option<NodeId> {
        self.gater
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn is_recurrent(&self) -> bool {
        self.recurrent
    }

    pub fn is_self_connection(&self) -> bool {
        self.from == self.to
    }

    pub fn is_gated(&self) -> bool {
        self.gater.is_some()
    }

    pub const fn eligibility(&self) -> f64 {
        self.eligibility
    }

    /// 参与信号传递的有效系数（禁用的连接为 0）
    pub(in crate::nn) fn effective_factor(&self) -> f64 {
        if self.enabled { self.weight * self.gain } else { 0.0 }
    }

    /// 清空迹；被门控的连接增益归零（等待门控节点下一次激活）
    pub(in crate::nn) fn clear(&mut self) {
        self.eligibility = 0.0;
        self.xtrace.clear();
        if self.gater.is_some() {
            self.gain = 0.0;
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "连接[id={}, {}->{}, weight={:.4}",
            self.id, self.from, self.to, self.weight
        )?;
        if let Some(gater) = self.gater {
            write!(f, ", gater={gater}")?;
        }
        write!(f, "]")
    }
}
