/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 优化器基础trait和辅助结构
 */

use crate::nn::{FeedDict, Graph, GraphError, NodeId};
use crate::tensor::TensorExt;

/// 优化器核心 trait
///
/// 训练循环：
/// ```ignore
/// let mut optimizer = SGD::new(&graph, 0.1);
/// for _ in 0..epochs {
///     let loss = optimizer.one_step(&mut graph, &feed_dict, loss_id)?; // 排序 + 前向 + 反向
///     optimizer.update(&mut graph)?;                                  // 只更新参数
/// }
/// ```
pub trait Optimizer {
    /// 执行一步训练：拓扑排序 + 前向传播 + 反向传播，返回损失值
    fn one_step(
        &mut self,
        graph: &mut Graph,
        feed_dict: &FeedDict,
        loss: NodeId,
    ) -> Result<f64, GraphError>;

    /// 参数更新（使用最近一次反向传播得到的梯度）
    fn update(&mut self, graph: &mut Graph) -> Result<(), GraphError>;

    /// 获取学习率
    fn learning_rate(&self) -> f64;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f64);
}

/// 优化器状态管理（内部实现，不对外暴露）
pub(crate) struct OptimizerState {
    /// 可训练参数的节点 ID 列表
    trainable_nodes: Vec<NodeId>,
    /// 学习率
    learning_rate: f64,
}

impl OptimizerState {
    /// 创建新的优化器状态（自动获取图中所有可训练节点）
    pub(crate) fn new(graph: &Graph, learning_rate: f64) -> Self {
        Self::with_params(graph.get_trainable_nodes(), learning_rate)
    }

    /// 使用指定参数创建优化器状态（如只训练部分参数）
    pub(crate) const fn with_params(params: Vec<NodeId>, learning_rate: f64) -> Self {
        Self {
            trainable_nodes: params,
            learning_rate,
        }
    }

    pub(crate) fn trainable_nodes(&self) -> &[NodeId] {
        &self.trainable_nodes
    }

    pub(crate) const fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub(crate) const fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }

    /// 排序 + 前向 + 反向，返回损失值。
    ///
    /// 参数节点的值保存在图中，不必每轮都放进`feed_dict`：
    /// 未被喂入的可训练节点会以其当前值一并作为排序起点，从而也能得到梯度
    pub(crate) fn forward_backward(
        &self,
        graph: &mut Graph,
        feed_dict: &FeedDict,
        loss: NodeId,
    ) -> Result<f64, GraphError> {
        let mut feed_dict = feed_dict.clone();
        for &node_id in &self.trainable_nodes {
            if feed_dict.contains_key(&node_id) {
                continue;
            }
            let value = graph
                .get_node_value(node_id)?
                .cloned()
                .ok_or(GraphError::ValueNotComputed(node_id))?;
            feed_dict.insert(node_id, value);
        }

        let sorted_nodes = graph.topological_sort(&feed_dict)?;
        graph.forward_and_backward(&sorted_nodes)?;

        let loss_value = graph
            .get_node_value(loss)?
            .ok_or(GraphError::ValueNotComputed(loss))?;
        loss_value.get_data_number().ok_or_else(|| {
            GraphError::InvalidOperation(format!(
                "损失节点的值必须是标量，但其形状为{:?}",
                loss_value.shape()
            ))
        })
    }
}
