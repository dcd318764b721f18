use super::{Context, NNError, NeuralNetwork, Tensor, conv_args, macros::destruct};
use crate::Arg;

/// Channel-preserving-or-expanding convolution stage:
/// conv(same) → batch-norm → relu.
pub struct ConvBlock {
    pub model_width: usize,
    pub kernel: usize,
    pub multiplier: usize,
}

impl NeuralNetwork for ConvBlock {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        mut ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError> {
        let Self {
            model_width,
            kernel,
            multiplier,
        } = self;

        destruct!([x] = inputs);
        destruct!(
            [x] = ctx.call(
                "",
                "conv",
                Some(conv_args(model_width * multiplier, [kernel, kernel], [1, 1])),
                [x],
            )?
        );
        destruct!([x] = ctx.call("", "batch-norm", None, [x])?);
        destruct!([x] = ctx.call("", "activation", Some(Arg::Str("relu")), [x])?);

        Ok((ctx, vec![x]))
    }
}
