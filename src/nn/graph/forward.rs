/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 前向传播
 */

use super::error::GraphError;
use super::Graph;
use crate::nn::NodeId;
use crate::tensor::Tensor;

impl Graph {
    /// 按`sorted_nodes`（须已按拓扑序排列）依次前向传播，返回`output_node`的值。
    /// 只做求值，不计算梯度
    pub fn forward_pass(
        &mut self,
        output_node: NodeId,
        sorted_nodes: &[NodeId],
    ) -> Result<Tensor, GraphError> {
        for &node_id in sorted_nodes {
            self.forward_node(node_id)?;
        }
        self.get_node(output_node)?
            .value()
            .cloned()
            .ok_or(GraphError::ValueNotComputed(output_node))
    }

    /// 根据父节点当前的值计算单个节点的值（源节点无操作）。
    /// 任一父节点尚无值时返回`MissingValue`
    pub fn forward_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let parent_values = self.collect_parent_values(node_id)?;
        let parents = parent_values.iter().collect::<Vec<_>>();

        let node = self.get_node_mut(node_id)?;
        log::trace!("前向传播：{node}");
        let result = node.calc_value_by_parents(&parents);
        result.map_err(|e| e.in_node(&*node))
    }

    /// 收集节点各父节点的值（按父节点顺序）
    pub(in crate::nn::graph) fn collect_parent_values(
        &self,
        node_id: NodeId,
    ) -> Result<Vec<Tensor>, GraphError> {
        self.get_node(node_id)?
            .parents()
            .iter()
            .map(|&parent| {
                self.get_node(parent)?
                    .value()
                    .cloned()
                    .ok_or(GraphError::MissingValue {
                        node: node_id,
                        parent,
                    })
            })
            .collect()
    }
}
