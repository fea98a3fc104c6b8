use crate::nn::GraphError;
use crate::tensor::Tensor;

use super::TraitNode;

/// 输入节点：没有父节点，值由外部提供。
/// 被标记为可训练时即为模型参数，由梯度下降更新其值。
#[derive(Clone)]
pub(crate) struct Input {
    value: Option<Tensor>,
    trainable: bool,
}

impl Input {
    pub(crate) fn new(value: Option<Tensor>, trainable: bool) -> Self {
        Self { value, trainable }
    }
}

impl TraitNode for Input {
    fn type_name(&self) -> &'static str {
        "Input"
    }

    // 值由外部提供，故前向传播什么也不做
    fn calc_value_by_parents(&mut self, _parents: &[&Tensor]) -> Result<(), GraphError> {
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    /// 传入`None`时保留原值（重复调用而不提供新值是无操作的）
    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if let Some(value) = value {
            self.value = Some(value.clone());
        }
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "Input节点没有父节点。不该触及本错误，否则说明crate代码有问题".to_string(),
        ))
    }

    fn is_source(&self) -> bool {
        true
    }

    fn is_trainable(&self) -> bool {
        self.trainable
    }

    fn set_trainable(&mut self, trainable: bool) -> Result<(), GraphError> {
        self.trainable = trainable;
        Ok(())
    }
}
