use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::{GraphError, NodeId};
use crate::tensor::{Tensor, TensorExt};

/// 加法节点：所有父节点的值之和（按ndarray的规则广播）
///
/// backward: 每个父节点都得到完整的上游梯度（若该父节点在前向时被广播，则沿被拉伸的轴求和）
#[derive(Clone)]
pub(crate) struct Add {
    value: Option<Tensor>,
}

impl Add {
    pub(crate) fn new(parents: &[NodeId]) -> Result<Self, GraphError> {
        if parents.len() < 2 {
            return Err(GraphError::InvalidOperation(format!(
                "Add节点至少需要2个父节点，但收到{}个",
                parents.len()
            )));
        }
        Ok(Self { value: None })
    }
}

impl TraitNode for Add {
    fn type_name(&self) -> &'static str {
        "Add"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<(), GraphError> {
        let (first, rest) = parents.split_first().ok_or_else(|| {
            GraphError::InvalidOperation("Add节点没有父节点".to_string())
        })?;
        let mut sum = (*first).clone();
        for parent in rest {
            sum = sum.checked_add(parent)?;
        }
        self.value = Some(sum);
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream_grad.sum_to_shape(parents[index].shape())?)
    }
}
