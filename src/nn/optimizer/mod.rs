/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 优化器模块：梯度下降更新参数
 */

mod base;
mod sgd;

pub use base::Optimizer;
pub use sgd::{SGD, sgd_update};
