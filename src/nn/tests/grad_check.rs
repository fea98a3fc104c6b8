/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 用中心差分检验各节点的解析梯度
 */

use super::{assert_tensor_abs_diff_eq, run_forward_and_backward};
use crate::nn::{FeedDict, Graph, NodeId};
use crate::tensor::{Tensor, TensorExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f64 = 1e-6;
const TOLERANCE: f64 = 1e-4;
const SEEDS: [u64; 4] = [0, 7, 42, 2026];

fn random_tensor(rng: &mut StdRng, shape: (usize, usize)) -> Tensor {
    Tensor::from_shape_fn(shape, |_| rng.gen_range(-1.0..1.0))
}

fn loss_at(graph: &mut Graph, feed_dict: &FeedDict, loss: NodeId) -> f64 {
    let sorted_nodes = graph.topological_sort(feed_dict).unwrap();
    graph
        .forward_pass(loss, &sorted_nodes)
        .unwrap()
        .get_data_number()
        .unwrap()
}

/// 逐元素扰动`target`的值，以 (L(θ+ε) - L(θ-ε)) / 2ε 近似梯度
fn numeric_grad(graph: &mut Graph, feed_dict: &FeedDict, loss: NodeId, target: NodeId) -> Tensor {
    let base = feed_dict[&target].clone();
    let mut grad = base.zeros_like();
    for (index, _) in base.indexed_iter() {
        let mut plus = feed_dict.clone();
        plus.get_mut(&target).unwrap()[index] += EPS;
        let mut minus = feed_dict.clone();
        minus.get_mut(&target).unwrap()[index] -= EPS;
        grad[index] =
            (loss_at(graph, &plus, loss) - loss_at(graph, &minus, loss)) / (2.0 * EPS);
    }
    grad
}

fn check_grads(graph: &mut Graph, feed_dict: &FeedDict, loss: NodeId, targets: &[NodeId]) {
    run_forward_and_backward(graph, feed_dict);
    let analytic = targets
        .iter()
        .map(|&t| graph.get_node_grad(t, t).unwrap())
        .collect::<Vec<_>>();
    for (&target, analytic) in targets.iter().zip(&analytic) {
        let numeric = numeric_grad(graph, feed_dict, loss, target);
        assert_tensor_abs_diff_eq(analytic, &numeric, TOLERANCE);
    }
}

#[test]
fn test_grad_check_linear() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();
        let x = graph.new_input_node(Some("x")).unwrap();
        let w = graph.new_input_node(Some("w")).unwrap();
        let b = graph.new_input_node(Some("b")).unwrap();
        let y = graph.new_input_node(Some("y")).unwrap();
        let linear = graph.new_linear_node(x, w, b, None).unwrap();
        let loss = graph.new_mse_loss_node(y, linear, None).unwrap();

        let feed_dict = FeedDict::from([
            (x, random_tensor(&mut rng, (3, 2))),
            (w, random_tensor(&mut rng, (4, 3))),
            (b, random_tensor(&mut rng, (4, 1))),
            (y, random_tensor(&mut rng, (4, 2))),
        ]);
        check_grads(&mut graph, &feed_dict, loss, &[x, w, b, y]);
    }
}

#[test]
fn test_grad_check_sigmoid() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();
        let x = graph.new_input_node(None).unwrap();
        let y = graph.new_input_node(None).unwrap();
        let sigmoid = graph.new_sigmoid_node(x, None).unwrap();
        let loss = graph.new_mse_loss_node(y, sigmoid, None).unwrap();

        let feed_dict = FeedDict::from([
            (x, random_tensor(&mut rng, (2, 3)) * 3.0),
            (y, random_tensor(&mut rng, (2, 3))),
        ]);
        check_grads(&mut graph, &feed_dict, loss, &[x, y]);
    }
}

#[test]
fn test_grad_check_mse_loss_both_operands() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();
        let y = graph.new_input_node(None).unwrap();
        let a = graph.new_input_node(None).unwrap();
        let loss = graph.new_mse_loss_node(y, a, None).unwrap();

        // 元素个数相同、形状不同的两个操作数
        let feed_dict = FeedDict::from([
            (y, random_tensor(&mut rng, (3, 2))),
            (a, random_tensor(&mut rng, (6, 1))),
        ]);
        check_grads(&mut graph, &feed_dict, loss, &[y, a]);
    }
}

/// x -> Linear -> Sigmoid -> Linear -> Add(·, c) -> MSE
#[test]
fn test_grad_check_composite_network() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();
        let x = graph.new_input_node(Some("x")).unwrap();
        let w1 = graph.new_input_node(Some("w1")).unwrap();
        let b1 = graph.new_input_node(Some("b1")).unwrap();
        let w2 = graph.new_input_node(Some("w2")).unwrap();
        let b2 = graph.new_input_node(Some("b2")).unwrap();
        let c = graph.new_input_node(Some("c")).unwrap();
        let y = graph.new_input_node(Some("y")).unwrap();
        let hidden = graph.new_linear_node(x, w1, b1, None).unwrap();
        let activated = graph.new_sigmoid_node(hidden, None).unwrap();
        let output = graph.new_linear_node(activated, w2, b2, None).unwrap();
        let shifted = graph.new_add_node(&[output, c], None).unwrap();
        let loss = graph.new_mse_loss_node(y, shifted, None).unwrap();

        let feed_dict = FeedDict::from([
            (x, random_tensor(&mut rng, (3, 5))),
            (w1, random_tensor(&mut rng, (4, 3))),
            (b1, random_tensor(&mut rng, (4, 1))),
            (w2, random_tensor(&mut rng, (2, 4))),
            (b2, random_tensor(&mut rng, (1, 1))),
            (c, random_tensor(&mut rng, (1, 5))),
            (y, random_tensor(&mut rng, (2, 5))),
        ]);
        check_grads(&mut graph, &feed_dict, loss, &[x, w1, b1, w2, b2, c, y]);
    }
}
