use crate::nn::nodes::raw_node::{TraitNode, check_parents_count};
use crate::nn::{GraphError, NodeId};
use crate::tensor::{Tensor, TensorExt};

/// Sigmoid 激活函数节点
///
/// forward: sigmoid(x) = 1 / (1 + e^(-x))
/// backward: d(sigmoid)/dx = sigmoid(x) * (1 - sigmoid(x))
#[derive(Clone)]
pub(crate) struct Sigmoid {
    value: Option<Tensor>,
}

impl Sigmoid {
    pub(crate) fn new(parents: &[NodeId]) -> Result<Self, GraphError> {
        check_parents_count("Sigmoid", parents.len(), 1)?;
        Ok(Self { value: None })
    }
}

impl TraitNode for Sigmoid {
    fn type_name(&self) -> &'static str {
        "Sigmoid"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<(), GraphError> {
        self.value = Some(parents[0].sigmoid());
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        // 直接用缓存的前向结果，不必重新计算sigmoid(x)
        let value = self.value.as_ref().ok_or_else(|| {
            GraphError::InvalidOperation("Sigmoid节点没有值，无法计算梯度".to_string())
        })?;
        let local_grad = value.mapv(|s| s * (1.0 - s));
        Ok(local_grad.checked_mul(upstream_grad)?)
    }
}
