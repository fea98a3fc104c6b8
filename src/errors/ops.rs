use std::fmt::{self, Display};

/// 张量的二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Mul,
    Dot,
    SumTo,
    Reshape,
}
impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation_name = match self {
            Operator::Add => "相加",
            Operator::Mul => "逐元素相乘",
            Operator::Dot => "矩阵相乘",
            Operator::SumTo => "按形状求和",
            Operator::Reshape => "变形",
        };
        write!(f, "{}", operation_name)
    }
}
