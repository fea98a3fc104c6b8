use crate::nn::nodes::raw_node::{TraitNode, check_parents_count};
use crate::nn::{GraphError, NodeId};
use crate::tensor::{Tensor, TensorExt, broadcast_shape};

/// 线性变换节点
///
/// ## 输入
/// - 父节点 0: x，形状 [k, n]
/// - 父节点 1: w，形状 [m, k]
/// - 父节点 2: b，可广播到 [m, n]
///
/// ## 公式
/// - forward: `w·x + b`
/// - backward: `∂L/∂x = wᵀ·g`，`∂L/∂w = g·xᵀ`，`∂L/∂b` 为 g 沿 b 被广播的轴求和
#[derive(Clone)]
pub(crate) struct Linear {
    value: Option<Tensor>,
}

impl Linear {
    pub(crate) fn new(parents: &[NodeId]) -> Result<Self, GraphError> {
        check_parents_count("Linear", parents.len(), 3)?;
        Ok(Self { value: None })
    }
}

impl TraitNode for Linear {
    fn type_name(&self) -> &'static str {
        "Linear"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<(), GraphError> {
        let (x, w, b) = (parents[0], parents[1], parents[2]);
        let product = w.checked_dot(x)?;
        // 偏置只能被广播到 w·x 的形状，而不能反过来把 w·x 撑大
        if broadcast_shape(product.shape(), b.shape()).as_ref().map(|s| &s[..]) != Some(product.shape()) {
            return Err(GraphError::ShapeMismatch {
                expected: product.shape().to_vec(),
                got: b.shape().to_vec(),
                message: "Linear节点的偏置必须能广播到w·x的形状".to_string(),
            });
        }
        self.value = Some(product.checked_add(b)?);
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
        let (x, w, b) = (parents[0], parents[1], parents[2]);
        let grad = match index {
            0 => w.t().to_owned().checked_dot(upstream_grad)?,
            1 => upstream_grad.checked_dot(&x.t().to_owned())?,
            2 => upstream_grad.sum_to_shape(b.shape())?,
            _ => {
                return Err(GraphError::InvalidOperation(format!(
                    "Linear节点只有3个父节点，不存在第{index}个父节点"
                )));
            }
        };
        Ok(grad)
    }
}
