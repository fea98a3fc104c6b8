/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 用两层网络拟合带噪声的线性数据
 *
 * 运行：RUST_LOG=debug cargo run --example fit_linear
 */

use mini_flow::nn::optimizer::{Optimizer, SGD};
use mini_flow::nn::{FeedDict, Graph, GraphError};
use mini_flow::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLES: usize = 32;
const HIDDEN: usize = 4;
const EPOCHS: usize = 500;

fn main() -> Result<(), GraphError> {
    env_logger::init();

    // y = 3x₁ - 2x₂ + 1 + 噪声，每列一个样本
    let mut rng = StdRng::seed_from_u64(0);
    let x = Tensor::from_shape_fn((2, SAMPLES), |_| rng.gen_range(-1.0..1.0));
    let noise = Tensor::from_shape_fn((1, SAMPLES), |_| rng.gen_range(-0.05..0.05));
    let y = x.row(0).to_owned() * 3.0 - x.row(1).to_owned() * 2.0 + 1.0;
    let y = y.insert_axis(ndarray::Axis(0)) + noise;

    let mut graph = Graph::new_with_seed(42);
    let x_id = graph.new_input_node(Some("x"))?;
    let y_id = graph.new_input_node(Some("y"))?;
    let w1 = graph.new_parameter_node(&[HIDDEN, 2], Some("w1"))?;
    let b1 = graph.new_parameter_node(&[HIDDEN, 1], Some("b1"))?;
    let w2 = graph.new_parameter_node(&[1, HIDDEN], Some("w2"))?;
    let b2 = graph.new_parameter_node(&[1, 1], Some("b2"))?;
    let hidden = graph.new_linear_node(x_id, w1, b1, Some("hidden"))?;
    let activated = graph.new_sigmoid_node(hidden, Some("activated"))?;
    let output = graph.new_linear_node(activated, w2, b2, Some("output"))?;
    let loss = graph.new_mse_loss_node(y_id, output, Some("loss"))?;

    let feed_dict = FeedDict::from([(x_id, x), (y_id, y)]);
    let mut optimizer = SGD::new(&graph, 0.1);
    for epoch in 0..EPOCHS {
        let loss_value = optimizer.one_step(&mut graph, &feed_dict, loss)?;
        optimizer.update(&mut graph)?;
        if epoch % 50 == 0 || epoch + 1 == EPOCHS {
            println!("epoch {epoch:>4}: loss = {loss_value:.6}");
        }
    }
    Ok(())
}
