/*
 * @Author       : 老董
 * @Date         : 2025-12-27
 * @LastEditTime : 2026-02-03
 * @Description  : 网络描述符（Network Descriptor）
 *                 网络的可序列化记录，用于 JSON 保存/加载与调试输出
 */

use super::activation::Activation;
use super::node::NodeKind;
use serde::{Deserialize, Serialize};

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

const fn default_mask() -> f64 {
    1.0
}

fn is_default_mask(mask: &f64) -> bool {
    *mask == 1.0
}

const fn default_enabled() -> bool {
    true
}

fn is_enabled(enabled: &bool) -> bool {
    *enabled
}

/// 网络的可序列化描述
///
/// 节点按序列顺序排列，连接通过节点下标引用端点与门控节点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// 格式版本（用于向后兼容）
    #[serde(default = "default_version")]
    pub version: String,
    pub input: usize,
    pub output: usize,
    #[serde(default)]
    pub dropout: f64,
    pub nodes: Vec<NodeDescriptor>,
    pub connections: Vec<ConnectionDescriptor>,
}

/// 节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// 在节点序列中的下标
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub bias: f64,
    pub squash: Activation,
    /// dropout 掩码，为 1 时省略
    #[serde(default = "default_mask", skip_serializing_if = "is_default_mask")]
    pub mask: f64,
}

/// 连接描述（自连接的 `from == to`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
    /// 门控节点的下标
    #[serde(default)]
    pub gater: Option<usize>,
    /// 为 true 时省略
    #[serde(default = "default_enabled", skip_serializing_if = "is_enabled")]
    pub enabled: bool,
}

impl NetworkDescriptor {
    /// 创建新的网络描述符
    pub fn new(input: usize, output: usize, dropout: f64) -> Self {
        Self {
            version: default_version(),
            input,
            output,
            dropout,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// 添加节点描述
    pub fn add_node(&mut self, node: NodeDescriptor) {
        self.nodes.push(node);
    }

    /// 添加连接描述
    pub fn add_connection(&mut self, connection: ConnectionDescriptor) {
        self.connections.push(connection);
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
