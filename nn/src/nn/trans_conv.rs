use super::{Context, NNError, NeuralNetwork, Tensor, conv_args, macros::destruct};
use crate::Arg;

/// Learned 2x upsampler: conv-transpose(k2, s2) → batch-norm → relu.
pub struct TransConvBlock {
    pub model_width: usize,
    pub multiplier: usize,
}

impl NeuralNetwork for TransConvBlock {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        mut ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError> {
        let Self {
            model_width,
            multiplier,
        } = self;

        destruct!([x] = inputs);
        destruct!(
            [x] = ctx.call(
                "",
                "conv-transpose",
                Some(conv_args(model_width * multiplier, [2, 2], [2, 2])),
                [x],
            )?
        );
        destruct!([x] = ctx.call("", "batch-norm", None, [x])?);
        destruct!([x] = ctx.call("", "activation", Some(Arg::Str("relu")), [x])?);

        Ok((ctx, vec![x]))
    }
}
