/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 随机采样数据集上的拟合测试（正弦函数、两数比较）
 *                 网络结构：Input -> Hidden(5, Logistic) -> Output(Logistic)，MSE 代价
 */
use only_neat::nn::architect;
use only_neat::nn::{NetworkError, Sample, TrainOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const TARGET_ERROR: f64 = 0.05;

/// 与逻辑门测试相同的隐藏层，学习率 0.3，每轮打乱样本，不使用动量
fn learn_set(
    name: &str,
    set: &[Sample],
    max_iterations: usize,
    seed: u64,
) -> Result<(), NetworkError> {
    let layers = [set[0].input.len(), 5, set[0].output.len()];
    let mut network = architect::perceptron_seeded(&layers, seed)?;
    let options = TrainOptions {
        iterations: Some(max_iterations),
        error: Some(TARGET_ERROR),
        rate: 0.3,
        shuffle: true,
        ..Default::default()
    };
    let result = network.train(set, &options)?;
    println!(
        "{name}: 第{}轮达到误差{:.6}，耗时{:?}",
        result.iterations, result.error, result.elapsed
    );
    assert!(result.error <= TARGET_ERROR, "{name} 未达到目标误差");
    assert!(result.iterations <= max_iterations);
    Ok(())
}

#[test]
fn test_sin_function() -> Result<(), NetworkError> {
    let mut rng = StdRng::seed_from_u64(42);
    // 正弦值平移缩放到 [0, 1]，与 Logistic 输出范围一致
    let set: Vec<Sample> = (0..100)
        .map(|_| {
            let x = rng.r#gen::<f64>() * PI * 2.0;
            Sample::new(&[x], &[(x.sin() + 1.0) / 2.0])
        })
        .collect();
    learn_set("SIN", &set, 1000, 42)
}

#[test]
fn test_bigger_than() -> Result<(), NetworkError> {
    let mut rng = StdRng::seed_from_u64(42);
    let set: Vec<Sample> = (0..100)
        .map(|_| {
            let (x, y): (f64, f64) = (rng.r#gen(), rng.r#gen());
            let z = if x > y { 1.0 } else { 0.0 };
            Sample::new(&[x, y], &[z])
        })
        .collect();
    learn_set("大于", &set, 500, 42)
}
