/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 梯度下降优化器实现
 */

use super::base::{Optimizer, OptimizerState};
use crate::nn::{FeedDict, Graph, GraphError, NodeId};

/// 对`trainables`中的每个节点执行一步梯度下降：θ = θ - α * ∇θ。
///
/// ∇θ 是节点在最近一次反向传播中累积的自身梯度。每个节点都必须是可训练的源节点且已有梯度，
/// 所有节点都校验通过后才会统一写回新值
pub fn sgd_update(
    graph: &mut Graph,
    trainables: &[NodeId],
    learning_rate: f64,
) -> Result<(), GraphError> {
    let mut new_values = Vec::with_capacity(trainables.len());
    for &node_id in trainables {
        let node = graph.get_node(node_id)?;
        if !node.is_trainable() {
            return Err(GraphError::InvalidOperation(format!(
                "{node}不是可训练节点，不能被梯度下降更新"
            )));
        }
        let value = node.value().ok_or(GraphError::ValueNotComputed(node_id))?;
        let gradient = node.grad_wrt(node_id)?;
        if value.shape() != gradient.shape() {
            return Err(GraphError::ShapeMismatch {
                expected: value.shape().to_vec(),
                got: gradient.shape().to_vec(),
                message: format!("{node}的值与梯度形状不一致"),
            });
        }
        new_values.push((node_id, value - &(&gradient * learning_rate)));
    }

    for (node_id, new_value) in new_values {
        graph.set_node_value(node_id, Some(&new_value))?;
    }
    log::debug!(
        "梯度下降更新了{}个参数，学习率为{}",
        trainables.len(),
        learning_rate
    );
    Ok(())
}

/// SGD (随机梯度下降) 优化器
pub struct SGD {
    state: OptimizerState,
}

impl SGD {
    /// 创建新的SGD优化器（优化图中所有可训练节点）
    pub fn new(graph: &Graph, learning_rate: f64) -> Self {
        Self {
            state: OptimizerState::new(graph, learning_rate),
        }
    }

    /// 只优化指定的参数节点
    pub const fn with_params(params: Vec<NodeId>, learning_rate: f64) -> Self {
        Self {
            state: OptimizerState::with_params(params, learning_rate),
        }
    }
}

impl Optimizer for SGD {
    fn one_step(
        &mut self,
        graph: &mut Graph,
        feed_dict: &FeedDict,
        loss: NodeId,
    ) -> Result<f64, GraphError> {
        self.state.forward_backward(graph, feed_dict, loss)
    }

    fn update(&mut self, graph: &mut Graph) -> Result<(), GraphError> {
        sgd_update(
            graph,
            self.state.trainable_nodes(),
            self.state.learning_rate(),
        )
    }

    fn learning_rate(&self) -> f64 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.state.set_learning_rate(lr);
    }
}
