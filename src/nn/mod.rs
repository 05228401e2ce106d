/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 负责可变拓扑神经网络（neural network）的构建、训练与进化
 */

pub mod architect;
mod activation;
mod connection;
mod descriptor;
mod display;
mod methods;
mod network;
mod node;

pub use activation::Activation;
pub use architect::{LstmOptions, RandomOptions};
pub use connection::{Connection, ConnectionId};
pub use descriptor::{ConnectionDescriptor, NetworkDescriptor, NodeDescriptor};
pub use methods::{Cost, Mutation, MutationConfig, RatePolicy, SubConnPolicy};
pub use network::{
    CancelToken, CrossValidate, Network, NetworkConfig, NetworkError, Sample, TestResult,
    TrainOptions, TrainResult,
};
pub use node::{ErrorSignal, Node, NodeId, NodeKind};

#[cfg(test)]
mod tests;
