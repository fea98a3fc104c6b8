mod add;
mod linear;
mod sigmoid;

pub(crate) use add::Add;
pub(crate) use linear::Linear;
pub(crate) use sigmoid::Sigmoid;
