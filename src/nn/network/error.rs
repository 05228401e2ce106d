/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 模块的错误类型
 */

use crate::nn::connection::ConnectionId;
use crate::nn::node::NodeId;
use thiserror::Error;

/// Network 操作错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// 输入/目标向量长度与网络的输入/输出节点数不一致
    #[error("{message}：期望长度为{expected}，实际为{got}")]
    ShapeMismatch {
        expected: usize,
        got: usize,
        message: String,
    },
    /// 变异的前置条件不满足（仅 `try_mutate` 会返回）
    #[error("无效的变异：{0}")]
    InvalidMutation(String),
    /// 反序列化的记录不合法
    #[error("记录格式错误：{0}")]
    MalformedRecord(String),
    #[error("节点{0}不存在")]
    NodeNotFound(NodeId),
    #[error("连接{0}不存在")]
    ConnectionNotFound(ConnectionId),
    #[error("无效操作：{0}")]
    InvalidOperation(String),
    /// 文件读写失败
    #[error("I/O 错误：{0}")]
    Io(String),
}

impl NetworkError {
    pub(in crate::nn) fn shape_mismatch(expected: usize, got: usize, message: &str) -> Self {
        Self::ShapeMismatch {
            expected,
            got,
            message: message.to_string(),
        }
    }
}
