mod mse_loss;

pub(crate) use mse_loss::MSELoss;
