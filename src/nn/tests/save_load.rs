/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 网络描述符（to_json/from_json）与模型文件保存/加载测试
 */

use crate::assert_err;
use crate::nn::architect::{self, LstmOptions};
use crate::nn::{
    Activation, ConnectionDescriptor, NetworkDescriptor, NetworkError, Network, NodeDescriptor,
    NodeKind,
};
use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;

/// 两个网络在同一输入序列上逐步输出一致
fn assert_same_outputs(a: &mut Network, b: &mut Network, inputs: &[Vec<f64>]) {
    a.clear();
    b.clear();
    for input in inputs {
        let x = a.activate(input).unwrap();
        let y = b.activate(input).unwrap();
        for (p, q) in x.iter().zip(y.iter()) {
            assert_abs_diff_eq!(*p, *q, epsilon = 1e-12);
        }
    }
}

fn simple_descriptor() -> NetworkDescriptor {
    let mut descriptor = NetworkDescriptor::new(1, 1, 0.0);
    for (index, kind) in [(0, NodeKind::Input), (1, NodeKind::Hidden), (2, NodeKind::Output)] {
        descriptor.add_node(NodeDescriptor {
            index,
            kind,
            bias: 0.1 * index as f64,
            squash: Activation::Logistic,
            mask: 1.0,
        });
    }
    for (from, to) in [(0, 1), (1, 2)] {
        descriptor.add_connection(ConnectionDescriptor {
            from,
            to,
            weight: 0.5,
            gater: None,
            enabled: true,
        });
    }
    descriptor
}

/// 测试: 导出的描述符记录了节点与连接
#[test]
fn test_to_json_descriptor() {
    let mut network = Network::new_with_seed(2, 1, 1);
    let hidden = network.add_node();
    let output = network.output_nodes()[0];
    let inputs = network.input_nodes();
    network.connect(inputs[0], hidden, Some(0.25)).unwrap();
    let conn = network.connect(hidden, output, Some(-0.5)).unwrap();
    network.set_enabled(conn, false).unwrap();
    network.set_squash(hidden, Activation::Gaussian).unwrap();

    let descriptor = network.to_json();
    assert_eq!(descriptor.input, 2);
    assert_eq!(descriptor.output, 1);
    assert_eq!(descriptor.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(descriptor.nodes.len(), 4);
    assert_eq!(descriptor.nodes[2].kind, NodeKind::Hidden);
    assert_eq!(descriptor.nodes[2].squash, Activation::Gaussian);
    assert_eq!(descriptor.connections.len(), 4);
    let last = &descriptor.connections[3];
    assert_eq!((last.from, last.to, last.weight, last.enabled), (2, 3, -0.5, false));
}

/// 测试: JSON 中省略默认的 mask 与 enabled，并能解析回来
#[test]
fn test_descriptor_json_format() {
    let json = simple_descriptor().to_json().unwrap();
    assert!(json.contains("\"type\": \"hidden\""));
    assert!(json.contains("\"squash\": \"LOGISTIC\""));
    assert!(!json.contains("mask"));
    assert!(!json.contains("enabled"));

    let parsed = NetworkDescriptor::from_json(&json).unwrap();
    assert_eq!(parsed, simple_descriptor());

    // 旧记录没有 version/dropout 字段
    let minimal = r#"{
        "input": 1, "output": 1,
        "nodes": [
            {"index": 0, "type": "input", "bias": 0, "squash": "LOGISTIC"},
            {"index": 1, "type": "output", "bias": 0.5, "squash": "TANH", "mask": 0.5}
        ],
        "connections": [{"from": 0, "to": 1, "weight": 2.0, "gater": null}]
    }"#;
    let parsed = NetworkDescriptor::from_json(minimal).unwrap();
    assert_eq!(parsed.dropout, 0.0);
    assert_eq!(parsed.nodes[1].mask, 0.5);
    assert!(parsed.connections[0].enabled);
    let network = Network::from_json(&parsed).unwrap();
    assert_eq!(network.node(network.output_nodes()[0]).unwrap().squash(), Activation::Tanh);
}

/// 测试: 门控、循环、自连接、禁用连接的网络经过描述符往返后行为一致
#[test]
fn test_from_json_roundtrip_equivalence() {
    let mut network = architect::lstm_seeded(&[2, 3, 1], LstmOptions::default(), 2).unwrap();
    let hidden = network.hidden_nodes();
    let output = network.output_nodes()[0];
    network.connect(output, hidden[0], Some(0.3)).unwrap();
    let first = network.connections().next().unwrap().id();
    network.set_enabled(first, false).unwrap();

    let mut restored = Network::from_json(&network.to_json()).unwrap();
    restored.validate().unwrap();
    assert_eq!(restored.node_count(), network.node_count());
    assert_eq!(restored.connection_count(), network.connection_count());
    assert_eq!(restored.to_json(), network.to_json());

    let inputs: Vec<Vec<f64>> = (0..50).map(|i| vec![(i as f64 * 0.37).sin(), (i % 3) as f64]).collect();
    assert_same_outputs(&mut network, &mut restored, &inputs);
}

/// 测试: JSON 字符串往返
#[test]
fn test_json_string_roundtrip() {
    let mut network = architect::random_seeded(3, 4, 2, Default::default(), 3);
    let json = network.to_json_string().unwrap();
    let mut restored = Network::from_json_str(&json).unwrap();
    assert_eq!(restored.to_json(), network.to_json());

    let inputs: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64, 0.5, -0.25 * i as f64]).collect();
    assert_same_outputs(&mut network, &mut restored, &inputs);

    assert_err!(Network::from_json_str("{not json"), NetworkError::MalformedRecord(_));
}

/// 测试: 感知机、全连接网络、LSTM、随机网络在 50 个随机输入上往返一致
#[test]
fn test_roundtrip_equivalence_all_presets() {
    let random_options = architect::RandomOptions {
        back_connections: 2,
        self_connections: 2,
        gates: 3,
        ..Default::default()
    };
    let networks = vec![
        architect::perceptron_seeded(&[2, 4, 3], 21).unwrap(),
        Network::new_with_seed(2, 3, 22),
        architect::lstm_seeded(&[2, 4, 4, 3], LstmOptions::default(), 23).unwrap(),
        architect::random_seeded(2, 6, 3, random_options, 24),
    ];

    let mut rng = StdRng::seed_from_u64(25);
    let inputs: Vec<Vec<f64>> = (0..50).map(|_| vec![rng.r#gen(), rng.r#gen()]).collect();
    for mut network in networks {
        let mut restored = Network::from_json(&network.to_json()).unwrap();
        assert_same_outputs(&mut network, &mut restored, &inputs);
    }
}

/// 测试: 不合法的记录被拒绝
#[test]
fn test_from_json_rejects_malformed() {
    // 节点数少于输入 + 输出
    let mut d = simple_descriptor();
    d.input = 2;
    d.output = 2;
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(_));

    // 输入数与输出数之和溢出
    let mut d = simple_descriptor();
    d.input = usize::MAX;
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(_));
    let huge = r#"{"input": 18446744073709551615, "output": 2, "nodes": [], "connections": []}"#;
    assert_err!(Network::from_json_str(huge), NetworkError::MalformedRecord(_));

    // 节点下标不连续
    let mut d = simple_descriptor();
    d.nodes[1].index = 5;
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(_));

    // 节点类型与布局不符
    let mut d = simple_descriptor();
    d.nodes[1].kind = NodeKind::Output;
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(_));

    // 连接端点越界
    let mut d = simple_descriptor();
    d.connections[0].to = 3;
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(msg) if msg.contains("超出节点范围"));

    // 重复连接
    let mut d = simple_descriptor();
    d.connections[1] = d.connections[0].clone();
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(msg) if msg.contains("重复"));

    // 连接指向输入节点
    let mut d = simple_descriptor();
    d.connections[1].to = 0;
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(_));

    // 门控节点是端点
    let mut d = simple_descriptor();
    d.connections[0].gater = Some(1);
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(msg) if msg.contains("端点"));

    // 门控节点是输入节点
    let mut d = simple_descriptor();
    d.connections[1].gater = Some(0);
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(_));

    // 非有限的权重
    let mut d = simple_descriptor();
    d.connections[0].weight = f64::NAN;
    assert_err!(Network::from_json(&d), NetworkError::MalformedRecord(_));
}

/// 测试: 保存为 JSON 文件并加载
#[test]
fn test_save_load_model() {
    let dir = "test_save_load_model_dir";
    let path = format!("{dir}/network");
    let mut network = architect::perceptron_seeded(&[2, 3, 1], 4).unwrap();
    network.set_dropout(0.25);

    network.save_model(&path).unwrap();
    assert!(fs::metadata(format!("{path}.json")).is_ok());

    let mut loaded = Network::load_model(&path).unwrap();
    assert_eq!(loaded.dropout(), 0.25);
    assert_eq!(loaded.to_json(), network.to_json());
    for input in [[0.0, 1.0], [1.0, 1.0]] {
        let a = network.activate(&input).unwrap();
        let b = loaded.activate(&input).unwrap();
        assert_abs_diff_eq!(a[0], b[0], epsilon = 1e-12);
    }

    fs::remove_dir_all(dir).unwrap();
    assert_err!(Network::load_model(&path), NetworkError::Io(_));
}

/// 测试: 摘要文件按扩展名选择格式
#[test]
fn test_save_summary() {
    let network = Network::new_with_seed(2, 1, 5);
    let md = "test_save_summary.md";
    let txt = "test_save_summary.txt";
    network.save_summary(md).unwrap();
    network.save_summary(txt).unwrap();
    assert!(fs::read_to_string(md).unwrap().starts_with("# 网络摘要"));
    assert!(fs::read_to_string(txt).unwrap().starts_with('┌'));
    fs::remove_file(md).unwrap();
    fs::remove_file(txt).unwrap();
}
