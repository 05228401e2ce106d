/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 两个网络的交叉（NEAT crossover）
 *
 * 节点按角色对齐：第 i 个输入 ↔ 第 i 个输入，第 k 个输出 ↔ 第 k 个输出，第 j 个隐藏 ↔ 第 j 个隐藏。
 * 连接基因以 (源角色, 目标角色) 为键。
 */

use super::error::NetworkError;
use super::Network;
use crate::nn::activation::Activation;
use crate::nn::node::{NodeId, NodeKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};

/// 节点在网络中的角色（对齐用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Role {
    Input(usize),
    Hidden(usize),
    Output(usize),
}

/// 哪个父代的非共有基因会被继承
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dominant {
    A,
    B,
    Both,
}

#[derive(Debug, Clone, Copy)]
struct NodeGene {
    kind: NodeKind,
    bias: f64,
    squash: Activation,
    mask: f64,
}

#[derive(Debug, Clone, Copy)]
struct ConnectionGene {
    weight: f64,
    gater: Option<Role>,
    enabled: bool,
}

impl Network {
    /// 交叉两个父代，生成一个子代（使用 thread_rng）
    ///
    /// - `equal = true`：两个父代视为同样优秀，非共有基因全部继承
    /// - 否则按 `score`（缺省为 0）决定更优的父代；分数相同时规模更大的父代（节点数、连接数）更优
    pub fn cross_over(a: &Self, b: &Self, equal: bool) -> Result<Self, NetworkError> {
        Self::cross_over_with_rng(a, b, equal, &mut rand::thread_rng())
    }

    /// 交叉两个父代，随机性来自给定的 rng（便于复现）
    ///
    /// 若父代 `a` 带有固定种子，子代的种子也由 `rng` 派生。
    pub fn cross_over_with_rng<R: Rng + ?Sized>(
        a: &Self,
        b: &Self,
        equal: bool,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        if a.input != b.input {
            return Err(NetworkError::shape_mismatch(
                a.input,
                b.input,
                "交叉的两个网络输入节点数不一致",
            ));
        }
        if a.output != b.output {
            return Err(NetworkError::shape_mismatch(
                a.output,
                b.output,
                "交叉的两个网络输出节点数不一致",
            ));
        }

        let score_a = a.score.unwrap_or(0.0);
        let score_b = b.score.unwrap_or(0.0);
        let dominant = if equal {
            Dominant::Both
        } else if score_a > score_b {
            Dominant::A
        } else if score_b > score_a {
            Dominant::B
        } else if (a.order.len(), a.connections.len()) >= (b.order.len(), b.connections.len()) {
            Dominant::A
        } else {
            Dominant::B
        };

        // 1. 子代的隐藏节点数
        let hidden_a = a.order.len() - a.input - a.output;
        let hidden_b = b.order.len() - b.input - b.output;
        let hidden = if equal || score_a == score_b {
            rng.gen_range(hidden_a.min(hidden_b)..=hidden_a.max(hidden_b))
        } else if dominant == Dominant::A {
            hidden_a
        } else {
            hidden_b
        };

        // 2. 节点基因
        let nodes_a = a.node_genes();
        let nodes_b = b.node_genes();
        let roles: Vec<Role> = (0..a.input)
            .map(Role::Input)
            .chain((0..hidden).map(Role::Hidden))
            .chain((0..a.output).map(Role::Output))
            .collect();
        let mut node_genes = Vec::with_capacity(roles.len());
        for role in &roles {
            let gene = match (nodes_a.get(role), nodes_b.get(role)) {
                (Some(x), Some(y)) => {
                    if rng.gen_bool(0.5) {
                        *x
                    } else {
                        *y
                    }
                }
                (Some(x), None) => *x,
                (None, Some(y)) => *y,
                (None, None) => {
                    return Err(NetworkError::InvalidOperation(format!(
                        "两个父代都没有角色为{role:?}的节点"
                    )));
                }
            };
            node_genes.push(gene);
        }

        // 3. 连接基因
        let conns_a = a.connection_genes();
        let conns_b = b.connection_genes();
        let mut genes: BTreeMap<(Role, Role), ConnectionGene> = BTreeMap::new();
        for (key, gene_a) in &conns_a {
            match conns_b.get(key) {
                Some(gene_b) => {
                    let gene = if rng.gen_bool(0.5) { gene_a } else { gene_b };
                    genes.insert(*key, *gene);
                }
                None if dominant != Dominant::B => {
                    genes.insert(*key, *gene_a);
                }
                None => {}
            }
        }
        if dominant != Dominant::A {
            for (key, gene_b) in &conns_b {
                genes.entry(*key).or_insert(*gene_b);
            }
        }

        // 4. 组装子代：输入、隐藏（按隐藏下标）、输出
        let offspring_rng = a.rng.as_ref().map(|_| StdRng::seed_from_u64(rng.r#gen()));
        let mut offspring = Self::blank(a.input, a.output, offspring_rng).with_config(a.config.clone());
        let mut ids: HashMap<Role, NodeId> = HashMap::new();
        for (role, gene) in roles.iter().zip(node_genes.iter()) {
            let id = offspring.create_node(gene.kind);
            offspring.order.push(id);
            let node = offspring.node_mut(id)?;
            node.bias = if gene.kind == NodeKind::Input { 0.0 } else { gene.bias };
            node.squash = gene.squash;
            node.mask = gene.mask;
            ids.insert(*role, id);
        }

        let mut gates = Vec::new();
        for ((from_role, to_role), gene) in &genes {
            let (Some(&from), Some(&to)) = (ids.get(from_role), ids.get(to_role)) else {
                continue;
            };
            let conn_id = offspring.connect(from, to, Some(gene.weight))?;
            offspring.connection_mut(conn_id)?.enabled = gene.enabled;
            if let Some(&gater) = gene.gater.and_then(|g| ids.get(&g)) {
                if gater != from && gater != to {
                    gates.push((gater, conn_id));
                }
            }
        }
        for (gater, conn_id) in gates {
            offspring.gate(gater, conn_id)?;
        }

        Ok(offspring)
    }

    fn role_of(&self, position: usize) -> Role {
        let n = self.order.len();
        if position < self.input {
            Role::Input(position)
        } else if position >= n - self.output {
            Role::Output(position - (n - self.output))
        } else {
            Role::Hidden(position - self.input)
        }
    }

    fn node_genes(&self) -> HashMap<Role, NodeGene> {
        self.order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                self.nodes.get(id).map(|n| {
                    let gene = NodeGene {
                        kind: n.kind,
                        bias: n.bias,
                        squash: n.squash,
                        mask: n.mask,
                    };
                    (self.role_of(i), gene)
                })
            })
            .collect()
    }

    fn connection_genes(&self) -> BTreeMap<(Role, Role), ConnectionGene> {
        let index = self.index_map();
        let role = |id: &NodeId| index.get(id).map(|&i| self.role_of(i));
        self.connections
            .values()
            .filter_map(|c| {
                let key = (role(&c.from)?, role(&c.to)?);
                let gene = ConnectionGene {
                    weight: c.weight,
                    gater: c.gater.and_then(|g| role(&g)),
                    enabled: c.enabled,
                };
                Some((key, gene))
            })
            .collect()
    }
}
