/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 网络结构相关的集成测试：变异、交叉、JSON 往返与逐步删除隐藏节点
 */
use only_neat::nn::architect::{self, RandomOptions};
use only_neat::nn::{Mutation, Network, NetworkError};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 在 11×11 的输入网格上依次激活，收集全部输出
fn grid_outputs(network: &mut Network) -> Result<Vec<f64>, NetworkError> {
    let mut outputs = Vec::new();
    for a in 0..=10 {
        for b in 0..=10 {
            let input = [f64::from(a) / 10.0, f64::from(b) / 10.0];
            outputs.extend(network.activate(&input)?);
        }
    }
    Ok(outputs)
}

/// 测试: 每种变异都会改变 2-4-4-4-2 感知机在输入网格上的输出
#[test]
fn test_every_mutation_changes_output() -> Result<(), NetworkError> {
    let mut base = architect::perceptron_seeded(&[2, 4, 4, 4, 2], 7)?;
    assert!(base.mutate(Mutation::AddGate));
    assert!(base.mutate(Mutation::AddBackConn));
    assert!(base.mutate(Mutation::AddSelfConn));
    // 第三隐藏层 -> 第一隐藏层的循环连接，两端都还有其它连接，可被 SUB_BACK_CONN 删除
    let (from, to) = (base.nodes()[10], base.nodes()[2]);
    if base.find_connection(from, to).is_none() {
        base.connect(from, to, None)?;
    }

    for method in Mutation::ALL {
        let mut untouched = base.clone();
        let mut mutated = base.clone();
        assert!(mutated.mutate(method), "变异{method}未能施加");
        mutated.validate()?;

        let before = grid_outputs(&mut untouched)?;
        let after = grid_outputs(&mut mutated)?;
        assert_ne!(before, after, "变异{method}没有改变输出");
    }
    Ok(())
}

/// 测试: 两个只做前馈变异的网络交叉后仍是严格前馈网络
#[test]
fn test_cross_over_feed_forward() -> Result<(), NetworkError> {
    let mut rng = StdRng::seed_from_u64(11);
    let mut a = Network::new_with_seed(2, 2, 1);
    let mut b = Network::new_with_seed(2, 2, 2);
    for i in 0..100 {
        let ffw = Mutation::FFW;
        a.mutate(ffw[i % ffw.len()]);
        b.mutate(ffw[(i * 3 + 1) % ffw.len()]);
    }
    assert!(a.is_strictly_feed_forward());
    assert!(b.is_strictly_feed_forward());

    for _ in 0..10 {
        let mut child = Network::cross_over_with_rng(&a, &b, true, &mut rng)?;
        child.validate()?;
        assert!(child.is_strictly_feed_forward());
        let output = child.activate(&[0.3, 0.7])?;
        assert_eq!(output.len(), 2);
        assert!(output.iter().all(|v| v.is_finite()));
    }
    Ok(())
}

/// 测试: 随机循环网络经 JSON 往返后，清空状态再激活，输出一致
#[test]
fn test_json_round_trip_equivalence() -> Result<(), NetworkError> {
    let options = RandomOptions {
        connections: Some(20),
        back_connections: 3,
        self_connections: 3,
        gates: 4,
    };
    let mut network = architect::random_seeded(3, 6, 2, options, 5);
    let json = network.to_json_string()?;
    let mut restored = Network::from_json_str(&json)?;
    assert_eq!(restored.node_count(), network.node_count());
    assert_eq!(restored.connection_count(), network.connection_count());

    network.clear();
    restored.clear();
    for step in 0..50 {
        let x = f64::from(step) / 50.0;
        let input = [x, 1.0 - x, (x * 7.0).sin()];
        let expected = network.activate(&input)?;
        let got = restored.activate(&input)?;
        for (e, g) in expected.iter().zip(got.iter()) {
            assert!((e - g).abs() < 1e-9, "第{step}步输出不一致: {e} vs {g}");
        }
    }
    Ok(())
}

/// 测试: 反复 SUB_NODE 直到只剩输入与输出节点，过程中网络始终合法
#[test]
fn test_sub_node_until_only_io_left() -> Result<(), NetworkError> {
    let options = RandomOptions {
        gates: 3,
        self_connections: 2,
        ..Default::default()
    };
    let mut network = architect::random_seeded(2, 10, 1, options, 3);
    assert_eq!(network.hidden_nodes().len(), 10);

    while !network.hidden_nodes().is_empty() {
        let hidden = network.hidden_nodes().len();
        assert!(network.mutate(Mutation::SubNode));
        assert_eq!(network.hidden_nodes().len(), hidden - 1);
        network.validate()?;
        network.activate(&[0.5, -0.5])?;
    }
    assert_eq!(network.node_count(), 3);
    assert!(!network.mutate(Mutation::SubNode));
    Ok(())
}
