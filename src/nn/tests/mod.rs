mod grad_check;

use crate::nn::{FeedDict, Graph, NodeId};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

/// 逐元素比较两个张量（形状须完全相同）
pub(super) fn assert_tensor_abs_diff_eq(actual: &Tensor, expected: &Tensor, epsilon: f64) {
    assert_eq!(actual.shape(), expected.shape(), "张量形状不同");
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*a, *e, epsilon = epsilon);
    }
}

/// 排序 + 前向 + 反向，返回排序结果
pub(super) fn run_forward_and_backward(graph: &mut Graph, feed_dict: &FeedDict) -> Vec<NodeId> {
    let sorted_nodes = graph.topological_sort(feed_dict).unwrap();
    graph.forward_and_backward(&sorted_nodes).unwrap();
    sorted_nodes
}
