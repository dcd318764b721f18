use super::{Context, NNError, NeuralNetwork, Tensor, linear_args, macros::*};
use crate::op::OpError;

/// Channel attention: global-average-pool to a per-channel descriptor,
/// bottleneck it by `ratio`, sigmoid-gate, and rescale the input.
pub struct SqueezeExcite {
    pub ratio: usize,
}

impl NeuralNetwork for SqueezeExcite {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        mut ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError> {
        let Self { ratio } = self;

        destruct!([x] = inputs);
        dims!([_n, _h, _w, c] = x);

        // the reduce layer must be an integer number of channels
        if ratio == 0 || c % ratio != 0 {
            return Err(NNError {
                name: format!("{}:squeeze-excite", ctx.path()),
                err: OpError::ShapeError,
            });
        }

        destruct!([y] = ctx.call("", "global-avg-pool", None, [x.clone()])?);
        destruct!([y] = ctx.call("reduce", "linear", Some(linear_args(c / ratio, "relu")), [y])?);
        destruct!([y] = ctx.call("restore", "linear", Some(linear_args(c, "sigmoid")), [y])?);
        destruct!([y] = ctx.call("", "mul", None, [x, y])?);

        Ok((ctx, vec![y]))
    }
}
