mod input;
mod loss;
mod ops;

pub(crate) use input::Input;
pub(crate) use loss::*;
pub(crate) use ops::*;

use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Clone)]
pub(crate) enum NodeType {
    Input(Input),
    Add(Add),
    Linear(Linear),
    Sigmoid(Sigmoid),
    MSELoss(MSELoss),
}

use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 各类节点的运算接口。
///
/// 节点的图结构（父/子节点、梯度槽）由`NodeHandle`统一维护，这里只负责具体的数学运算：
/// 所有接口都只接收父节点的值，且调用前由`Graph`保证父节点已有值。
#[enum_dispatch(NodeType)]
pub(crate) trait TraitNode {
    /// 节点类型名，用于生成默认节点名及打印
    fn type_name(&self) -> &'static str;

    /// 根据父节点的值计算本节点的值
    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<(), GraphError>;

    fn value(&self) -> Option<&Tensor>;

    fn set_value(&mut self, _value: Option<&Tensor>) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "{}类型节点的值只能由父节点计算得到，不应该被手动设置",
            self.type_name()
        )))
    }

    /// 把“结果节点对本节点的梯度”`upstream_grad`经本节点的局部导数，
    /// 换算为结果节点对第`index`个父节点的梯度（形状与该父节点的值相同）
    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError>;

    /// 没有父节点、值由外部提供的节点
    fn is_source(&self) -> bool {
        false
    }

    /// 损失（终端）节点：反向传播时不累加子节点的梯度，而是直接以1为上游梯度
    fn is_loss(&self) -> bool {
        false
    }

    /// 返回该节点的值是否应该在训练过程中被更新
    fn is_trainable(&self) -> bool {
        false
    }

    /// 设置该节点的值是否应该在训练过程中被更新
    fn set_trainable(&mut self, _trainable: bool) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "{}类型节点不是源节点，不能被设置为可训练",
            self.type_name()
        )))
    }
}

/// 校验父节点数量，供各节点的构造函数使用
pub(crate) fn check_parents_count(
    type_name: &str,
    got: usize,
    expected: usize,
) -> Result<(), GraphError> {
    if got != expected {
        return Err(GraphError::InvalidOperation(format!(
            "{type_name}节点需要{expected}个父节点，但收到{got}个"
        )));
    }
    Ok(())
}
