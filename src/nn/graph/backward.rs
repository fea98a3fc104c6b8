/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 反向传播
 */

use super::error::GraphError;
use super::Graph;
use crate::nn::NodeId;
use crate::tensor::{Tensor, TensorExt};

impl Graph {
    /// 按`sorted_nodes`依次前向传播，再按其逆序依次反向传播。
    ///
    /// 逆拓扑序保证：某节点反向传播时，它在本轮子图中的所有子节点都已完成反向传播。
    /// 反向传播开始前会清空这些节点及其全部子节点上一轮的梯度，
    /// 故即便传入的序列不完整，某子节点未被反向传播时也只会报`UnassignedGradient`，
    /// 而不会悄悄读到过期的梯度
    pub fn forward_and_backward(&mut self, sorted_nodes: &[NodeId]) -> Result<(), GraphError> {
        for &node_id in sorted_nodes {
            self.forward_node(node_id)?;
        }
        let mut stale = Vec::new();
        for &node_id in sorted_nodes {
            stale.push(node_id);
            stale.extend_from_slice(self.get_node(node_id)?.children());
        }
        for node_id in stale {
            self.get_node_mut(node_id)?.clear_grad();
        }
        for &node_id in sorted_nodes.iter().rev() {
            self.backward_node(node_id)?;
        }
        Ok(())
    }

    /// 单个节点的反向传播：
    /// - 源节点：自身梯度 = 0 + Σ(各子节点关于本节点的梯度) × 1；
    /// - 损失节点：以1为上游梯度，直接得到关于各父节点的梯度；
    /// - 其余节点：对每个父节点，梯度 = 0 + Σ(各子节点关于本节点的梯度经本节点局部导数的换算)。
    pub fn backward_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let node = self.get_node(node_id)?;
        log::trace!("反向传播：{node}");
        let value = node.value().ok_or(GraphError::ValueNotComputed(node_id))?;

        if node.is_source() {
            let mut grad = value.zeros_like();
            for &child in node.children() {
                let contribution = self.get_node(child)?.grad_wrt(node_id)?;
                accumulate(&mut grad, &contribution).map_err(|e| e.in_node(node))?;
            }
            self.get_node_mut(node_id)?.set_self_grad(grad);
            return Ok(());
        }

        let parent_values = self.collect_parent_values(node_id)?;
        let parents = parent_values.iter().collect::<Vec<_>>();
        let mut grads = parent_values.iter().map(TensorExt::zeros_like).collect::<Vec<_>>();

        if node.is_loss() {
            if !node.children().is_empty() {
                log::warn!("{node}是损失节点，反向传播时将忽略它的子节点");
            }
            let seed = Tensor::scalar(1.0);
            for (index, grad) in grads.iter_mut().enumerate() {
                let contribution = node.calc_grad_to_parent(index, &parents, &seed)?;
                accumulate(grad, &contribution).map_err(|e| e.in_node(node))?;
            }
        } else {
            for &child in node.children() {
                let upstream_grad = self.get_node(child)?.grad_wrt(node_id)?;
                for (index, grad) in grads.iter_mut().enumerate() {
                    let contribution = node
                        .calc_grad_to_parent(index, &parents, &upstream_grad)
                        .map_err(|e| e.in_node(node))?;
                    accumulate(grad, &contribution).map_err(|e| e.in_node(node))?;
                }
            }
        }

        self.get_node_mut(node_id)?.set_grads(grads);
        Ok(())
    }
}

/// 把一份梯度贡献累加到梯度槽上，两者形状必须完全相同（不做广播）
fn accumulate(grad: &mut Tensor, contribution: &Tensor) -> Result<(), GraphError> {
    if grad.shape() != contribution.shape() {
        return Err(GraphError::ShapeMismatch {
            expected: grad.shape().to_vec(),
            got: contribution.shape().to_vec(),
            message: "梯度贡献与梯度槽的形状不一致".to_string(),
        });
    }
    *grad += contribution;
    Ok(())
}
