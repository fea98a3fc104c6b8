//! # Mini Flow
//!
//! `mini_flow`是一个极简的计算图引擎：用户以显式的父节点构建一张由算子节点组成的有向无环图，
//! 引擎用Kahn算法对其拓扑排序，按拓扑序前向求值、按逆拓扑序反向累积梯度，再以梯度下降更新参数。
//!
//! ```ignore
//! use mini_flow::nn::{FeedDict, Graph};
//! use mini_flow::tensor::{Tensor, TensorExt};
//!
//! let mut graph = Graph::new();
//! let x1 = graph.new_input_node(Some("x1"))?;
//! let x2 = graph.new_input_node(Some("x2"))?;
//! let total = graph.new_add_node(&[x1, x2], Some("total"))?;
//!
//! let feed_dict = FeedDict::from([(x1, Tensor::scalar(10.)), (x2, Tensor::scalar(5.))]);
//! let sorted_nodes = graph.topological_sort(&feed_dict)?;
//! let output = graph.forward_pass(total, &sorted_nodes)?; // [[15.0]]
//! ```

pub mod errors;
pub mod nn;
pub mod tensor;
