/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 与 NetworkDescriptor 之间的互相转换（to_json/from_json）
 *
 * 与 model_io.rs 的区别：
 * - serialization.rs：内存中的记录转换与合法性校验
 * - model_io.rs：记录的文件读写
 */

use super::error::NetworkError;
use super::types::NetworkConfig;
use super::Network;
use crate::nn::descriptor::{ConnectionDescriptor, NetworkDescriptor, NodeDescriptor};
use crate::nn::node::{NodeId, NodeKind};
use std::collections::HashSet;

impl Network {
    /// 导出网络的描述符
    ///
    /// 只记录结构与参数（偏置、权重、激活函数、掩码、门控），不记录瞬态量。
    pub fn to_json(&self) -> NetworkDescriptor {
        let mut descriptor = NetworkDescriptor::new(self.input, self.output, self.dropout);
        let index = self.index_map();

        for (i, id) in self.order.iter().enumerate() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            descriptor.add_node(NodeDescriptor {
                index: i,
                kind: node.kind,
                bias: node.bias,
                squash: node.squash,
                mask: node.mask,
            });
        }

        for connection in self.connections.values() {
            let (Some(&from), Some(&to)) = (index.get(&connection.from), index.get(&connection.to))
            else {
                continue;
            };
            descriptor.add_connection(ConnectionDescriptor {
                from,
                to,
                weight: connection.weight,
                gater: connection.gater.and_then(|g| index.get(&g).copied()),
                enabled: connection.enabled,
            });
        }

        descriptor
    }

    /// 导出为 JSON 字符串
    pub fn to_json_string(&self) -> Result<String, NetworkError> {
        self.to_json()
            .to_json()
            .map_err(|e| NetworkError::MalformedRecord(format!("序列化网络描述失败: {e}")))
    }

    /// 从描述符重建网络（使用默认配置）
    pub fn from_json(descriptor: &NetworkDescriptor) -> Result<Self, NetworkError> {
        Self::from_json_with_config(descriptor, NetworkConfig::default())
    }

    /// 从 JSON 字符串重建网络
    pub fn from_json_str(json: &str) -> Result<Self, NetworkError> {
        let descriptor = NetworkDescriptor::from_json(json)
            .map_err(|e| NetworkError::MalformedRecord(format!("解析网络描述失败: {e}")))?;
        Self::from_json(&descriptor)
    }

    /// 从描述符重建网络，并指定网络配置
    pub fn from_json_with_config(
        descriptor: &NetworkDescriptor,
        config: NetworkConfig,
    ) -> Result<Self, NetworkError> {
        Self::check_descriptor(descriptor)?;

        let mut network = Self::blank(descriptor.input, descriptor.output, None).with_config(config);
        network.dropout = descriptor.dropout;

        let mut ids: Vec<NodeId> = Vec::with_capacity(descriptor.nodes.len());
        for nd in &descriptor.nodes {
            let id = network.create_node(nd.kind);
            network.order.push(id);
            let node = network.node_mut(id)?;
            node.bias = if nd.kind == NodeKind::Input { 0.0 } else { nd.bias };
            node.squash = nd.squash;
            node.mask = nd.mask;
            ids.push(id);
        }

        // 先建立全部连接，再设置门控（门控节点的引用可能指向任意连接）
        let mut gates = Vec::new();
        for cd in &descriptor.connections {
            let conn_id = network
                .connect(ids[cd.from], ids[cd.to], Some(cd.weight))
                .map_err(|e| NetworkError::MalformedRecord(e.to_string()))?;
            network.connection_mut(conn_id)?.enabled = cd.enabled;
            if let Some(gater) = cd.gater {
                gates.push((ids[gater], conn_id));
            }
        }
        for (gater, conn_id) in gates {
            network
                .gate(gater, conn_id)
                .map_err(|e| NetworkError::MalformedRecord(e.to_string()))?;
        }

        Ok(network)
    }

    /// 记录的合法性校验（不依赖网络状态）
    fn check_descriptor(descriptor: &NetworkDescriptor) -> Result<(), NetworkError> {
        let malformed = |msg: String| Err(NetworkError::MalformedRecord(msg));
        let n = descriptor.nodes.len();
        let (input, output) = (descriptor.input, descriptor.output);

        if input.checked_add(output).is_none_or(|sum| sum > n) {
            return malformed(format!(
                "节点数{n}少于输入数{input}与输出数{output}之和"
            ));
        }
        if !descriptor.dropout.is_finite() {
            return malformed("dropout 不是有限数".to_string());
        }

        for (i, nd) in descriptor.nodes.iter().enumerate() {
            if nd.index != i {
                return malformed(format!("第{i}个节点的下标为{}", nd.index));
            }
            let expected = if i < input {
                nd.kind == NodeKind::Input
            } else if i >= n - output {
                nd.kind == NodeKind::Output
            } else {
                matches!(nd.kind, NodeKind::Hidden | NodeKind::Constant)
            };
            if !expected {
                return malformed(format!(
                    "节点{i}的类型{}与输入数{input}、输出数{output}的布局不符",
                    nd.kind.name()
                ));
            }
            if !nd.bias.is_finite() || !nd.mask.is_finite() {
                return malformed(format!("节点{i}的偏置或掩码不是有限数"));
            }
        }

        let mut pairs = HashSet::new();
        for (k, cd) in descriptor.connections.iter().enumerate() {
            if cd.from >= n || cd.to >= n {
                return malformed(format!(
                    "第{k}条连接的端点{}->{}超出节点范围",
                    cd.from, cd.to
                ));
            }
            if !pairs.insert((cd.from, cd.to)) {
                return malformed(format!("连接{}->{}重复", cd.from, cd.to));
            }
            if cd.to < input {
                return malformed(format!("第{k}条连接指向输入节点{}", cd.to));
            }
            if !cd.weight.is_finite() {
                return malformed(format!("第{k}条连接的权重不是有限数"));
            }
            if let Some(gater) = cd.gater {
                if gater >= n {
                    return malformed(format!("第{k}条连接的门控节点{gater}超出节点范围"));
                }
                if gater == cd.from || gater == cd.to {
                    return malformed(format!("第{k}条连接的门控节点{gater}是其端点"));
                }
            }
        }
        Ok(())
    }
}
