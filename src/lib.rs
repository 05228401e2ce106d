//! # Only Neat
//!
//! `only_neat`用纯rust实现一个可变拓扑的神经网络库：网络由节点与带权连接组成，
//! 既能像[NEAT](https://ieeexplore.ieee.org/document/6790655)那样通过结构变异与交叉进化，
//! 也能借助资格迹（eligibility trace）做基于梯度的训练，包括门控连接与 LSTM 这类循环结构。
//!

pub mod nn;
pub mod utils;
