use std::fmt;

use super::raw_node::{NodeType, TraitNode};
use super::NodeId;
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 计算图中的一个节点：具体运算（`raw_node`）加上它在图中的连接关系和梯度。
///
/// - `parents`：本节点依赖的节点（按构造时的顺序，之后不再改变）
/// - `children`：依赖本节点的节点（集合语义，同一子节点只记录一次）
/// - `grads`：与`parents`一一对应的梯度槽，存放结果节点对相应父节点的梯度
/// - `self_grad`：仅源节点使用，存放结果节点对自身的梯度
#[derive(Clone)]
pub(crate) struct NodeHandle {
    id: NodeId,
    name: String,
    parents: Vec<NodeId>,
    children: Vec<NodeId>,
    raw_node: NodeType,
    grads: Vec<Option<Tensor>>,
    self_grad: Option<Tensor>,
}

impl NodeHandle {
    pub(crate) fn new<T: Into<NodeType>>(
        id: NodeId,
        name: &str,
        parents: &[NodeId],
        raw_node: T,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            parents: parents.to_vec(),
            children: Vec::new(),
            raw_node: raw_node.into(),
            grads: vec![None; parents.len()],
            self_grad: None,
        }
    }

    pub(crate) const fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.raw_node.type_name()
    }

    pub(crate) fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// 登记一个子节点（已登记过的不重复添加）
    pub(crate) fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn value(&self) -> Option<&Tensor> {
        self.raw_node.value()
    }

    pub(crate) fn has_value(&self) -> bool {
        self.value().is_some()
    }

    pub(crate) fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_value(value)
    }

    pub(crate) fn is_source(&self) -> bool {
        self.raw_node.is_source()
    }

    pub(crate) fn is_loss(&self) -> bool {
        self.raw_node.is_loss()
    }

    pub(crate) fn is_trainable(&self) -> bool {
        self.raw_node.is_trainable()
    }

    pub(crate) fn set_trainable(&mut self, trainable: bool) -> Result<(), GraphError> {
        self.raw_node.set_trainable(trainable)
    }

    pub(crate) fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<(), GraphError> {
        self.raw_node.calc_value_by_parents(parents)
    }

    pub(crate) fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        self.raw_node
            .calc_grad_to_parent(index, parents, upstream_grad)
    }

    /// 返回本节点累积的、结果节点关于`target`的梯度。
    ///
    /// `target`为本节点自身时返回源节点的自身梯度；
    /// 若`target`在父节点中出现多次（如`Add(x, x)`），则返回各梯度槽之和。
    /// 相应梯度尚未被计算时返回`UnassignedGradient`，绝不以0代替。
    pub(crate) fn grad_wrt(&self, target: NodeId) -> Result<Tensor, GraphError> {
        let unassigned = || GraphError::UnassignedGradient {
            holder: self.id,
            target,
        };
        if target == self.id {
            return self.self_grad.clone().ok_or_else(unassigned);
        }

        let mut total: Option<Tensor> = None;
        for (slot, parent) in self.parents.iter().enumerate() {
            if *parent != target {
                continue;
            }
            let grad = self.grads[slot].as_ref().ok_or_else(unassigned)?;
            total = Some(match total {
                Some(sum) => sum + grad,
                None => grad.clone(),
            });
        }
        total.ok_or_else(unassigned)
    }

    pub(crate) fn set_grads(&mut self, grads: Vec<Tensor>) {
        self.grads = grads.into_iter().map(Some).collect();
    }

    pub(crate) fn set_self_grad(&mut self, grad: Tensor) {
        self.self_grad = Some(grad);
    }

    pub(crate) fn clear_grad(&mut self) {
        self.grads.iter_mut().for_each(|grad| *grad = None);
        self.self_grad = None;
    }

    #[cfg(test)]
    pub(crate) fn push_parent_unchecked(&mut self, parent: NodeId) {
        self.parents.push(parent);
        self.grads.push(None);
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id.index(),
            self.name,
            self.type_name()
        )
    }
}
