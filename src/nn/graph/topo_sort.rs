/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 拓扑排序（Kahn 算法）
 */

use super::error::GraphError;
use super::Graph;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use std::collections::{HashMap, HashSet, VecDeque};

/// 本轮运行中要喂给各源节点的值
pub type FeedDict = HashMap<NodeId, Tensor>;

/// 单次排序所发现子图中某节点的入边/出边（只含子图内的节点）
#[derive(Default)]
struct EdgeSets {
    inbound: HashSet<NodeId>,
    outbound: HashSet<NodeId>,
}

impl Graph {
    /// 以`feed_dict`中的源节点为起点，对其可达的全部节点做拓扑排序，
    /// 排序成功后把`feed_dict`中的值赋给对应的源节点。
    ///
    /// 1. 从源节点出发沿子节点方向广度优先发现子图，记录子图内每个节点的入边/出边；
    /// 2. 以源节点初始化就绪队列；
    /// 3. 每次取出一个就绪节点追加到结果中，并删去它指向子节点的边，
    ///    子节点入边删空时即进入就绪队列。
    ///
    /// 同时就绪的节点之间的先后是未规定的（当前实现为先进先出，源节点及同一节点的子节点均按`NodeId`升序入队），
    /// 调用方只应依赖“依赖在前、被依赖者在后”这一关系。
    ///
    /// `feed_dict`为空时返回空序列；子图中存在环时返回`CycleDetected`，且不会修改任何节点的值。
    pub fn topological_sort(&mut self, feed_dict: &FeedDict) -> Result<Vec<NodeId>, GraphError> {
        let mut input_nodes = feed_dict.keys().copied().collect::<Vec<_>>();
        input_nodes.sort();
        for &id in &input_nodes {
            let node = self.get_node(id)?;
            if !node.is_source() {
                return Err(GraphError::InvalidOperation(format!(
                    "{node}不是源节点，不能被喂入值"
                )));
            }
        }

        // 1. 发现子图
        let mut edges: HashMap<NodeId, EdgeSets> = HashMap::new();
        let mut expanded = HashSet::new();
        let mut nodes = input_nodes.iter().copied().collect::<VecDeque<_>>();
        while let Some(n) = nodes.pop_front() {
            if !expanded.insert(n) {
                continue;
            }
            edges.entry(n).or_default();
            for &m in self.get_node(n)?.children() {
                edges.entry(n).or_default().outbound.insert(m);
                edges.entry(m).or_default().inbound.insert(n);
                nodes.push_back(m);
            }
        }

        // 2~3. 逐个输出就绪节点。源节点若在子图内仍有入边（即位于环上），则不能作为起点
        let mut sorted = Vec::with_capacity(edges.len());
        let mut emitted = HashSet::new();
        let mut ready = input_nodes
            .iter()
            .copied()
            .filter(|id| edges.get(id).is_some_and(|e| e.inbound.is_empty()))
            .collect::<VecDeque<_>>();
        while let Some(n) = ready.pop_front() {
            if !emitted.insert(n) {
                continue;
            }
            sorted.push(n);
            let mut outbound = edges
                .get_mut(&n)
                .map(|e| std::mem::take(&mut e.outbound))
                .unwrap_or_default()
                .into_iter()
                .collect::<Vec<_>>();
            outbound.sort();
            for m in outbound {
                let m_edges = edges.get_mut(&m).ok_or(GraphError::NodeNotFound(m))?;
                if m_edges.inbound.remove(&n) && m_edges.inbound.is_empty() {
                    ready.push_back(m);
                }
            }
        }

        // 4. 就绪队列耗尽但仍有节点未输出，说明存在环
        if sorted.len() != edges.len() {
            let mut remaining = edges
                .keys()
                .filter(|id| !emitted.contains(id))
                .copied()
                .collect::<Vec<_>>();
            remaining.sort();
            log::debug!("图{}的拓扑排序失败，无法排序的节点：{:?}", self.name, remaining);
            return Err(GraphError::CycleDetected {
                discovered: edges.len(),
                sorted: sorted.len(),
                remaining,
            });
        }

        for &id in &input_nodes {
            self.get_node_mut(id)?.set_value(feed_dict.get(&id))?;
        }
        log::debug!(
            "图{}的拓扑排序完成：{}个源节点，共{}个节点",
            self.name,
            input_nodes.len(),
            sorted.len()
        );
        Ok(sorted)
    }
}
