/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 前向激活测试
 */

use crate::assert_err;
use crate::nn::{Activation, NetworkError, Network, NodeId};
use approx::assert_abs_diff_eq;

/// 构建 1 输入 1 输出、节点偏置为 0、激活函数为 identity 的空网络，返回 (网络, 输入, 输出)
fn identity_network() -> (Network, NodeId, NodeId) {
    let mut network = Network::empty_with_seed(1, 1, 0);
    let input = network.input_nodes()[0];
    let output = network.output_nodes()[0];
    network.set_bias(output, 0.0).unwrap();
    network.set_squash(output, Activation::Identity).unwrap();
    (network, input, output)
}

fn add_identity_node(network: &mut Network) -> NodeId {
    let id = network.add_node();
    network.set_bias(id, 0.0).unwrap();
    network.set_squash(id, Activation::Identity).unwrap();
    id
}

/// 测试: 无隐藏节点时输出为 squash(bias + Σ w * x)
#[test]
fn test_activate_single_layer() {
    let mut network = Network::empty(2, 1);
    let inputs = network.input_nodes();
    let output = network.output_nodes()[0];
    network.connect(inputs[0], output, Some(0.5)).unwrap();
    network.connect(inputs[1], output, Some(-1.5)).unwrap();
    network.set_bias(output, 0.2).unwrap();

    let result = network.activate(&[1.0, 0.4]).unwrap();
    let expected = Activation::Logistic.apply(0.2 + 0.5 - 0.6);
    assert_eq!(result.len(), 1);
    assert_abs_diff_eq!(result[0], expected, epsilon = 1e-12);

    let node = network.node(output).unwrap();
    assert_abs_diff_eq!(node.state(), 0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(node.derivative(), expected * (1.0 - expected), epsilon = 1e-12);
}

/// 测试: 信号沿隐藏节点链按序列顺序传递
#[test]
fn test_activate_hidden_chain() {
    let (mut network, input, output) = identity_network();
    let h1 = add_identity_node(&mut network);
    let h2 = add_identity_node(&mut network);
    network.connect(input, h1, Some(2.0)).unwrap();
    network.connect(h1, h2, Some(3.0)).unwrap();
    network.connect(h2, output, Some(0.5)).unwrap();
    network.set_bias(h2, 1.0).unwrap();

    let result = network.activate(&[1.5]).unwrap();
    // h1 = 3, h2 = 10, output = 5
    assert_abs_diff_eq!(result[0], 5.0, epsilon = 1e-12);
}

/// 测试: 自连接把上一步的 state 带入本步
#[test]
fn test_activate_self_connection_memory() {
    let (mut network, input, output) = identity_network();
    let hidden = add_identity_node(&mut network);
    network.connect(input, hidden, Some(1.0)).unwrap();
    network.connect(hidden, hidden, Some(0.5)).unwrap();
    network.connect(hidden, output, Some(1.0)).unwrap();

    let outputs: Vec<f64> = (0..3).map(|_| network.activate(&[1.0]).unwrap()[0]).collect();
    assert_abs_diff_eq!(outputs[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(outputs[1], 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(outputs[2], 1.75, epsilon = 1e-12);

    // clear 之后重新从 0 开始累积
    network.clear();
    assert_abs_diff_eq!(network.activate(&[1.0]).unwrap()[0], 1.0, epsilon = 1e-12);
}

/// 测试: 循环连接读取的是目标节点上一步的激活值
#[test]
fn test_activate_recurrent_connection() {
    let (mut network, input, output) = identity_network();
    let hidden = add_identity_node(&mut network);
    network.connect(input, hidden, Some(1.0)).unwrap();
    network.connect(hidden, output, Some(1.0)).unwrap();
    let back = network.connect(output, hidden, Some(1.0)).unwrap();
    assert!(network.connection(back).unwrap().is_recurrent());

    assert_abs_diff_eq!(network.activate(&[0.5]).unwrap()[0], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(network.activate(&[0.5]).unwrap()[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(network.activate(&[0.5]).unwrap()[0], 1.5, epsilon = 1e-12);
}

/// 测试: 门控连接的增益等于门控节点本步的激活值
#[test]
fn test_activate_gated_connection() {
    let (mut network, input, output) = identity_network();
    let gater = add_identity_node(&mut network);
    network.connect(input, gater, Some(1.0)).unwrap();
    let conn = network.connect(input, output, Some(1.0)).unwrap();
    network.gate(gater, conn).unwrap();

    // output = x * gain = x * x
    assert_abs_diff_eq!(network.activate(&[0.5]).unwrap()[0], 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(network.connection(conn).unwrap().gain(), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(network.activate(&[2.0]).unwrap()[0], 4.0, epsilon = 1e-12);

    // 解除门控后增益恢复为 1
    network.ungate(conn).unwrap();
    assert_abs_diff_eq!(network.activate(&[2.0]).unwrap()[0], 2.0, epsilon = 1e-12);
}

/// 测试: 禁用的连接不传递信号
#[test]
fn test_activate_disabled_connection() {
    let (mut network, input, output) = identity_network();
    let conn = network.connect(input, output, Some(3.0)).unwrap();
    assert_abs_diff_eq!(network.activate(&[1.0]).unwrap()[0], 3.0, epsilon = 1e-12);

    network.set_enabled(conn, false).unwrap();
    assert_abs_diff_eq!(network.activate(&[1.0]).unwrap()[0], 0.0, epsilon = 1e-12);
}

/// 测试: no_trace_activate 与 activate 结果一致，且不维护资格迹
#[test]
fn test_no_trace_activate_matches_activate() {
    let mut network = Network::new_with_seed(3, 2, 21);
    let hidden = network.add_node();
    let inputs = network.input_nodes();
    let outputs = network.output_nodes();
    network.connect(inputs[0], hidden, None).unwrap();
    network.connect(hidden, outputs[1], None).unwrap();
    network.connect(hidden, hidden, Some(0.3)).unwrap();

    let mut traced = network.clone();
    let mut untraced = network.clone();
    for input in [[0.1, 0.2, 0.3], [1.0, -1.0, 0.5], [0.0, 0.0, 0.0]] {
        let a = traced.activate(&input).unwrap();
        let b = untraced.no_trace_activate(&input).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }
    assert!(untraced.connections().all(|c| c.eligibility() == 0.0));
    assert!(traced.connections().any(|c| c.eligibility() != 0.0));
}

/// 测试: 输入长度不符时报错
#[test]
fn test_activate_shape_mismatch() {
    let mut network = Network::new(2, 1);
    assert_err!(
        network.activate(&[1.0]),
        NetworkError::ShapeMismatch(2, 1, "输入向量长度与输入节点数不一致")
    );
    assert_err!(
        network.no_trace_activate(&[1.0, 2.0, 3.0]),
        NetworkError::ShapeMismatch { expected: 2, got: 3, .. }
    );
}
