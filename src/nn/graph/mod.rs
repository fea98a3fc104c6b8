/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 模块：计算图的核心实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建 + 基础访问器
 * - node_builders.rs: new_*_node
 * - topo_sort.rs: Kahn 拓扑排序（同时把外部值喂给源节点）
 * - forward.rs: 按拓扑序前向传播
 * - backward.rs: 按逆拓扑序反向传播
 */

mod backward;
mod core;
mod error;
mod forward;
mod node_builders;
mod topo_sort;

pub use error::GraphError;
pub use topo_sort::FeedDict;

use crate::nn::nodes::NodeHandle;
use rand::rngs::StdRng;

/// 计算图：以数组存放全部节点，节点间通过`NodeId`（数组下标）相互引用。
///
/// 图的拓扑在构建完成后不再改变；每轮训练只会改写各节点的值和梯度。
/// 所有状态都归本结构所有，不存在任何全局的图。
pub struct Graph {
    name: String,
    nodes: Vec<NodeHandle>,
    /// 图级别的随机数生成器（用于参数初始化）
    /// None 表示使用默认的 thread_rng（非确定性）
    rng: Option<StdRng>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
