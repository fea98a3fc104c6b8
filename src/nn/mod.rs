/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 负责计算图（computational graph）的构建、排序、前向/反向传播和参数更新
 */

mod graph;
mod nodes;
pub mod optimizer;

pub use graph::{FeedDict, Graph, GraphError};
pub use nodes::NodeId;
pub use optimizer::{Optimizer, SGD, sgd_update};

#[cfg(test)]
mod tests;
