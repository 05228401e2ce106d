/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 激活函数测试
 */

use crate::nn::Activation;
use approx::assert_abs_diff_eq;

/// 测试: 常见激活函数在典型点上的取值
#[test]
fn test_activation_values() {
    assert_abs_diff_eq!(Activation::Logistic.apply(0.0), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(Activation::Logistic.derivative(0.0), 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(Activation::Tanh.apply(0.5), 0.5f64.tanh(), epsilon = 1e-12);
    assert_abs_diff_eq!(Activation::Identity.apply(-3.2), -3.2, epsilon = 1e-12);
    assert_eq!(Activation::Step.apply(0.1), 1.0);
    assert_eq!(Activation::Step.apply(0.0), 0.0);
    assert_eq!(Activation::Relu.apply(-2.0), 0.0);
    assert_eq!(Activation::Relu.apply(2.0), 2.0);
    assert_eq!(Activation::Bipolar.apply(-0.5), -1.0);
    assert_eq!(Activation::HardTanh.apply(3.0), 1.0);
    assert_eq!(Activation::HardTanh.apply(-3.0), -1.0);
    assert_eq!(Activation::Absolute.apply(-0.25), 0.25);
    assert_eq!(Activation::Inverse.apply(0.25), 0.75);
    assert_abs_diff_eq!(Activation::Gaussian.apply(0.0), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(Activation::BipolarSigmoid.apply(0.0), 0.0, epsilon = 1e-12);
}

/// 测试: 可导区域内，导数与数值差分一致
#[test]
fn test_activation_derivative_matches_finite_difference() {
    let h = 1e-6;
    for squash in Activation::ALL {
        // 阶跃类函数的导数按约定为 0
        if matches!(squash, Activation::Step | Activation::Bipolar) {
            continue;
        }
        for x in [-0.7, -0.3, 0.4, 0.8] {
            let numeric = (squash.apply(x + h) - squash.apply(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(squash.derivative(x), numeric, epsilon = 1e-5);
        }
    }
}

/// 测试: 名称与枚举互相转换
#[test]
fn test_activation_name_roundtrip() {
    for squash in Activation::ALL {
        assert_eq!(Activation::from_name(squash.name()), Some(squash));
        assert_eq!(squash.to_string(), squash.name());
    }
    assert_eq!(Activation::from_name("bent_identity"), Some(Activation::BentIdentity));
    assert_eq!(Activation::from_name("SWISH"), None);
    assert_eq!(Activation::default(), Activation::Logistic);
}

/// 测试: 序列化使用记录格式中的名称
#[test]
fn test_activation_serde_name() {
    let json = serde_json::to_string(&Activation::BipolarSigmoid).unwrap();
    assert_eq!(json, "\"BIPOLAR_SIGMOID\"");
    let back: Activation = serde_json::from_str("\"HARD_TANH\"").unwrap();
    assert_eq!(back, Activation::HardTanh);
}
