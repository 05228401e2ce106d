/*
 * @Author       : 老董
 * @Date         : 2024-02-04 20:37:13
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : 神经网络节点的显示格式化
 */

use super::node::NodeId;

/// 格式化神经网络节点的显示
///
/// # Arguments
/// * `id` - 节点ID
/// * `kind` - 节点类型名称（input/hidden/output/constant）
/// * `squash` - 激活函数名称
///
/// # Returns
/// 返回格式化后的字符串，格式为：`节点[id={}, type={}, squash={}]`
pub(in crate::nn) fn format_node_display(id: NodeId, kind: &str, squash: &str) -> String {
    format!("节点[id={id}, type={kind}, squash={squash}]")
}
