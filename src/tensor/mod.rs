/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 计算图使用的张量类型（直接复用ndarray的二维数组），
 *                 以及节点前向/反向传播所需的、带形状检查的数值运算
 */

use ndarray::{Array2, Axis};

use crate::errors::{Operator, TensorError};

#[cfg(test)]
mod tests;

/// 计算图中所有节点值（及梯度）的类型。
/// 注：标量也是张量，其形状为`[1, 1]`。
pub type Tensor = Array2<f64>;

/// 计算两个二维形状按ndarray广播规则（长度为1的维度可被拉伸）得到的形状，不兼容则返回`None`
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<[usize; 2]> {
    if a.len() != 2 || b.len() != 2 {
        return None;
    }
    let mut out = [0; 2];
    for i in 0..2 {
        out[i] = match (a[i], b[i]) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(out)
}

fn operator_error(operator: Operator, a: &[usize], b: &[usize]) -> TensorError {
    TensorError::OperatorError {
        operator,
        tensor1_shape: a.to_vec(),
        tensor2_shape: b.to_vec(),
    }
}

/// 张量的扩展方法：所有可能因形状不兼容而失败的运算都返回`Result`，而不是让ndarray直接panic
pub trait TensorExt: Sized {
    /// 按行优先顺序由`data`创建形状为`shape`（必须是二维）的张量
    fn from_data(data: &[f64], shape: &[usize]) -> Result<Self, TensorError>;
    /// 创建形状为`[1, 1]`的标量张量
    fn scalar(value: f64) -> Self;
    /// 创建与本张量形状相同的全0张量
    fn zeros_like(&self) -> Self;
    /// 若张量只含1个元素，则返回该元素
    fn get_data_number(&self) -> Option<f64>;
    fn checked_add(&self, other: &Self) -> Result<Self, TensorError>;
    fn checked_mul(&self, other: &Self) -> Result<Self, TensorError>;
    /// 矩阵乘法`self·other`
    fn checked_dot(&self, other: &Self) -> Result<Self, TensorError>;
    /// 把经过广播的梯度沿被拉伸的轴求和，还原为`shape`
    fn sum_to_shape(&self, shape: &[usize]) -> Result<Self, TensorError>;
    /// 按行优先顺序变形为`shape`，元素总数必须不变
    fn reshaped(&self, shape: &[usize]) -> Result<Self, TensorError>;
    /// 逐元素计算`1/(1+e^-x)`
    fn sigmoid(&self) -> Self;
}

impl TensorExt for Tensor {
    fn from_data(data: &[f64], shape: &[usize]) -> Result<Self, TensorError> {
        if shape.len() != 2 || shape.iter().product::<usize>() != data.len() {
            return Err(operator_error(Operator::Reshape, &[data.len()], shape));
        }
        Array2::from_shape_vec((shape[0], shape[1]), data.to_vec())
            .map_err(|_| operator_error(Operator::Reshape, &[data.len()], shape))
    }

    fn scalar(value: f64) -> Self {
        Array2::from_elem((1, 1), value)
    }

    fn zeros_like(&self) -> Self {
        Array2::zeros(self.raw_dim())
    }

    fn get_data_number(&self) -> Option<f64> {
        if self.len() == 1 {
            self.iter().next().copied()
        } else {
            None
        }
    }

    fn checked_add(&self, other: &Self) -> Result<Self, TensorError> {
        if broadcast_shape(self.shape(), other.shape()).is_none() {
            return Err(operator_error(Operator::Add, self.shape(), other.shape()));
        }
        Ok(self + other)
    }

    fn checked_mul(&self, other: &Self) -> Result<Self, TensorError> {
        if broadcast_shape(self.shape(), other.shape()).is_none() {
            return Err(operator_error(Operator::Mul, self.shape(), other.shape()));
        }
        Ok(self * other)
    }

    fn checked_dot(&self, other: &Self) -> Result<Self, TensorError> {
        if self.ncols() != other.nrows() {
            return Err(operator_error(Operator::Dot, self.shape(), other.shape()));
        }
        Ok(self.dot(other))
    }

    fn sum_to_shape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        if self.shape() == shape {
            return Ok(self.clone());
        }
        // 目标形状必须能广播回本张量的形状
        if broadcast_shape(self.shape(), shape).as_ref().map(|s| &s[..]) != Some(self.shape()) {
            return Err(operator_error(Operator::SumTo, self.shape(), shape));
        }
        let mut out = self.clone();
        if shape[0] == 1 && self.nrows() != 1 {
            out = out.sum_axis(Axis(0)).insert_axis(Axis(0));
        }
        if shape[1] == 1 && self.ncols() != 1 {
            out = out.sum_axis(Axis(1)).insert_axis(Axis(1));
        }
        Ok(out)
    }

    fn reshaped(&self, shape: &[usize]) -> Result<Self, TensorError> {
        let data = self.iter().copied().collect::<Vec<_>>();
        Self::from_data(&data, shape)
            .map_err(|_| operator_error(Operator::Reshape, self.shape(), shape))
    }

    fn sigmoid(&self) -> Self {
        self.mapv(|x| 1.0 / (1.0 + (-x).exp()))
    }
}
