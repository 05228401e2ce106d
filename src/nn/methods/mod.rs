/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 网络的各类“方法目录”：结构变异、代价函数、学习率策略
 *
 * 这些都是封闭枚举 + 纯函数，不持有网络状态，由 `Network` 在变异/训练时查表调用。
 */

mod cost;
mod mutation;
mod rate;

pub use cost::Cost;
pub use mutation::{Mutation, MutationConfig, SubConnPolicy};
pub use rate::RatePolicy;
