use crate::nn::nodes::raw_node::{TraitNode, check_parents_count};
use crate::nn::{GraphError, NodeId};
use crate::tensor::{Tensor, TensorExt};

/// MSE（均方误差）损失节点
///
/// ## 输入
/// - 父节点 0: y（目标值）
/// - 父节点 1: a（预测值）
///
/// 两者元素个数必须相同，计算时均按行优先展平为列向量。
///
/// ## 公式
/// `MSE = mean((y - a)^2)`
///
/// ## 梯度
/// - `∂L/∂y = 2 * (y - a) / m`
/// - `∂L/∂a = -2 * (y - a) / m`
///
/// 其中 m 为 y 的元素个数。梯度会被变形回各父节点自身的形状。
///
/// ## 输出
/// - 标量损失值 [1, 1]
#[derive(Clone)]
pub(crate) struct MSELoss {
    value: Option<Tensor>,
    /// 缓存 y - a（列向量），用于反向传播
    diff_cache: Option<Tensor>,
    /// 缓存元素总数
    numel_cache: usize,
}

impl MSELoss {
    pub(crate) fn new(parents: &[NodeId]) -> Result<Self, GraphError> {
        check_parents_count("MSELoss", parents.len(), 2)?;
        Ok(Self {
            value: None,
            diff_cache: None,
            numel_cache: 0,
        })
    }
}

impl TraitNode for MSELoss {
    fn type_name(&self) -> &'static str {
        "MSELoss"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<(), GraphError> {
        let (y, a) = (parents[0], parents[1]);
        if y.len() != a.len() {
            return Err(GraphError::ShapeMismatch {
                expected: y.shape().to_vec(),
                got: a.shape().to_vec(),
                message: "MSELoss节点的两个父节点元素个数必须相同".to_string(),
            });
        }
        let numel = y.len();
        if numel == 0 {
            return Err(GraphError::InvalidOperation(
                "MSELoss节点的父节点不能是空张量".to_string(),
            ));
        }

        let diff = &y.reshaped(&[numel, 1])? - &a.reshaped(&[numel, 1])?;
        let loss = diff.mapv(|d| d * d).sum() / numel as f64;

        self.numel_cache = numel;
        self.diff_cache = Some(diff);
        self.value = Some(Tensor::scalar(loss));
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
        let diff = self.diff_cache.as_ref().ok_or_else(|| {
            GraphError::InvalidOperation("diff 缓存为空，需先执行前向传播".to_string())
        })?;
        let upstream = upstream_grad
            .get_data_number()
            .ok_or_else(|| GraphError::ShapeMismatch {
                expected: vec![1, 1],
                got: upstream_grad.shape().to_vec(),
                message: "MSELoss节点的上游梯度必须是标量".to_string(),
            })?;

        let m = self.numel_cache as f64;
        let factor = match index {
            0 => 2.0 / m,
            1 => -2.0 / m,
            _ => {
                return Err(GraphError::InvalidOperation(format!(
                    "MSELoss节点只有2个父节点，不存在第{index}个父节点"
                )));
            }
        };
        let grad = diff * (factor * upstream);
        Ok(grad.reshaped(parents[index].shape())?)
    }

    fn is_loss(&self) -> bool {
        true
    }
}
