/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 模块的错误类型
 */

use thiserror::Error;

use crate::errors::TensorError;
use crate::nn::NodeId;

/// Graph 操作错误类型
///
/// 这些错误都说明图的构建或运行顺序有问题（调用方的缺陷），在图内部不会被恢复或重试，
/// 统一以`Result`的形式交给调用方处理。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("节点{0}不存在")]
    NodeNotFound(NodeId),

    /// 拓扑排序时，就绪集合在所有已发现节点输出之前就被耗尽
    #[error("计算图存在环：共发现{discovered}个节点，但只能排序其中{sorted}个，无法排序的节点为{remaining:?}")]
    CycleDetected {
        discovered: usize,
        sorted: usize,
        remaining: Vec<NodeId>,
    },

    /// 节点前向传播时，某个父节点还没有值（执行顺序有误）
    #[error("节点{node}的父节点{parent}尚未被赋值，执行顺序有误")]
    MissingValue { node: NodeId, parent: NodeId },

    /// 节点自身还没有值（尚未执行前向传播）
    #[error("节点{0}尚未执行前向传播，没有值")]
    ValueNotComputed(NodeId),

    #[error("形状不匹配（期望{expected:?}，实际{got:?}）：{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    #[error("维度不匹配（期望{expected}，实际{got}）：{message}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        message: String,
    },

    /// 反向传播时读取到一个尚未被赋值的梯度项（反向传播顺序有误）
    #[error("节点{holder}关于节点{target}的梯度尚未被计算，反向传播顺序有误")]
    UnassignedGradient { holder: NodeId, target: NodeId },

    #[error("非法操作：{0}")]
    InvalidOperation(String),

    #[error("节点名称重复：{0}")]
    DuplicateNodeName(String),
}

impl GraphError {
    /// 为形状错误补充出错节点的信息，其余错误原样返回
    pub(in crate::nn) fn in_node(self, node: impl std::fmt::Display) -> Self {
        match self {
            Self::ShapeMismatch {
                expected,
                got,
                message,
            } => Self::ShapeMismatch {
                expected,
                got,
                message: format!("{node}：{message}"),
            },
            other => other,
        }
    }
}

impl From<TensorError> for GraphError {
    fn from(err: TensorError) -> Self {
        match err {
            TensorError::OperatorError {
                ref tensor1_shape,
                ref tensor2_shape,
                ..
            } => Self::ShapeMismatch {
                expected: tensor1_shape.clone(),
                got: tensor2_shape.clone(),
                message: err.to_string(),
            },
        }
    }
}
