/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 创建 + 基础访问器
 */

use super::error::GraphError;
use super::Graph;
use crate::nn::nodes::NodeHandle;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;

impl Graph {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
            rng: None,
        }
    }

    /// 创建一个带固定种子的计算图（确保参数初始化可重复）
    pub fn new_with_seed(seed: u64) -> Self {
        let mut graph = Self::new();
        graph.set_seed(seed);
        graph
    }

    /// 设置/重置图的随机种子
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Some(StdRng::seed_from_u64(seed));
    }

    pub const fn has_seed(&self) -> bool {
        self.rng.is_some()
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().map(NodeHandle::id).collect()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(id.0).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(id.0).ok_or(GraphError::NodeNotFound(id))
    }

    /// 父节点（本节点依赖的节点）
    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.get_node(id)?.parents().to_vec())
    }

    /// 子节点（依赖本节点的节点）
    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.get_node(id)?.children().to_vec())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_type_name(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.get_node(id)?.type_name())
    }

    pub fn has_node_value(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(id)?.has_value())
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    /// 设置源节点的值；传入`None`时保持原值不变
    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)
    }

    /// 获取`holder`节点在最近一次反向传播中累积的、结果节点关于`target`的梯度。
    /// 对源节点而言，`holder == target`即为其自身梯度
    pub fn get_node_grad(&self, holder: NodeId, target: NodeId) -> Result<Tensor, GraphError> {
        self.get_node(holder)?.grad_wrt(target)
    }

    pub fn is_node_trainable(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(id)?.is_trainable())
    }

    /// 把源节点标记为（或取消标记为）可训练
    pub fn set_node_trainable(&mut self, id: NodeId, trainable: bool) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_trainable(trainable)
    }

    /// 获取所有可训练的节点
    pub fn get_trainable_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.is_trainable())
            .map(NodeHandle::id)
            .collect()
    }

    /// 清除所有节点的梯度
    pub fn clear_grad(&mut self) {
        for node in &mut self.nodes {
            node.clear_grad();
        }
    }

    // ========== ID/名称生成 ==========

    pub(in crate::nn::graph) fn generate_valid_node_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    pub(in crate::nn::graph) fn check_duplicate_node_name(&self, name: &str) -> Result<(), GraphError> {
        if self.nodes.iter().any(|node| node.name() == name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    pub(in crate::nn::graph) fn generate_valid_new_node_name(
        &self,
        base_name: &str,
        node_type: &str,
    ) -> Result<String, GraphError> {
        if !base_name.is_empty() {
            self.check_duplicate_node_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let mut counter = 1;
        loop {
            let name = format!("{node_type}_{counter}");
            if self.check_duplicate_node_name(&name).is_ok() {
                return Ok(name);
            }
            counter += 1;
        }
    }

    /// 人为添加一条边（可能制造环），仅供测试使用
    #[cfg(test)]
    pub(in crate::nn) fn add_edge_unchecked(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(to)?.push_parent_unchecked(from);
        self.get_node_mut(from)?.add_child(to);
        Ok(())
    }
}
