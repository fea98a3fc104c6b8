/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 节点构建方法（new_*_node）
 */

use super::error::GraphError;
use super::Graph;
use crate::nn::nodes::raw_node::{Add, Input, Linear, MSELoss, Sigmoid};
use crate::nn::nodes::{NodeHandle, NodeType};
use crate::nn::NodeId;
use crate::tensor::Tensor;
use rand::Rng;

impl Graph {
    /// 添加节点到列表，并把新节点登记为各父节点的子节点。
    ///
    /// 所有父节点都先校验存在后才做任何修改，故失败时图保持原样
    pub(in crate::nn::graph) fn add_node_to_list(
        &mut self,
        raw_node: NodeType,
        name: Option<&str>,
        node_type: &str,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        for &parent_id in parents {
            self.get_node(parent_id)?;
        }
        let node_id = self.generate_valid_node_id();
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), node_type)?;

        for &parent_id in parents {
            self.get_node_mut(parent_id)?.add_child(node_id);
        }
        self.nodes
            .push(NodeHandle::new(node_id, &node_name, parents, raw_node));
        log::trace!("图{}新增节点{}", self.name, self.get_node(node_id)?);
        Ok(node_id)
    }

    /// 创建输入节点（不可训练，值在拓扑排序时由外部喂入）
    pub fn new_input_node(&mut self, name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = Input::new(None, false);
        self.add_node_to_list(node.into(), name, "input", &[])
    }

    /// 创建参数节点：可训练的源节点，其值按图的随机数生成器在[-0.1, 0.1)内均匀初始化
    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if shape.len() != 2 {
            return Err(GraphError::DimensionMismatch {
                expected: 2,
                got: shape.len(),
                message: format!("参数节点必须是2维张量，但收到的形状为{shape:?}"),
            });
        }
        let dim = (shape[0], shape[1]);
        let value = match self.rng {
            Some(ref mut rng) => Tensor::from_shape_fn(dim, |_| rng.gen_range(-0.1..0.1)),
            None => {
                let mut rng = rand::thread_rng();
                Tensor::from_shape_fn(dim, |_| rng.gen_range(-0.1..0.1))
            }
        };
        self.new_parameter_node_with_value(&value, name)
    }

    /// 创建以`value`为初值的参数节点
    pub fn new_parameter_node_with_value(
        &mut self,
        value: &Tensor,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Input::new(Some(value.clone()), true);
        self.add_node_to_list(node.into(), name, "parameter", &[])
    }

    pub fn new_add_node(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Add::new(parents)?;
        self.add_node_to_list(node.into(), name, "add", parents)
    }

    /// 创建线性变换节点`w·x + b`
    pub fn new_linear_node(
        &mut self,
        x: NodeId,
        w: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [x, w, b];
        let node = Linear::new(&parents)?;
        self.add_node_to_list(node.into(), name, "linear", &parents)
    }

    pub fn new_sigmoid_node(&mut self, x: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        let parents = [x];
        let node = Sigmoid::new(&parents)?;
        self.add_node_to_list(node.into(), name, "sigmoid", &parents)
    }

    /// 创建均方误差损失节点，`y`为目标值，`a`为预测值
    pub fn new_mse_loss_node(
        &mut self,
        y: NodeId,
        a: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [y, a];
        let node = MSELoss::new(&parents)?;
        self.add_node_to_list(node.into(), name, "mse_loss", &parents)
    }
}
