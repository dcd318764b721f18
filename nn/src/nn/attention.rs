use super::{
    Context, NNError, NeuralNetwork, Tensor, TransConvBlock, conv_args, macros::destruct, size2,
};
use crate::Arg;

/// Attention gate over a skip connection. Projects the skip (stride 2)
/// and the coarser gating signal to a common width, derives a
/// single-channel sigmoid mask, upsamples it back to the skip's
/// resolution by the sum of a nearest and a learned 2x resampler, and
/// scales the skip by the broadcast mask. Output shape == skip shape.
pub struct AttentionGate {
    pub model_width: usize,
    pub multiplier: usize,
}

impl NeuralNetwork for AttentionGate {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        mut ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError> {
        let Self {
            model_width,
            multiplier,
        } = self;
        let filters = model_width * multiplier;

        destruct!([skip, gate] = inputs);

        destruct!(
            [theta] = ctx.call(
                "skip-proj",
                "conv",
                Some(conv_args(filters, [1, 1], [2, 2])),
                [skip.clone()],
            )?
        );
        destruct!([theta] = ctx.call("", "batch-norm", None, [theta])?);

        destruct!(
            [phi] = ctx.call(
                "gate-proj",
                "conv",
                Some(conv_args(filters, [1, 1], [1, 1])),
                [gate],
            )?
        );
        destruct!([phi] = ctx.call("", "batch-norm", None, [phi])?);

        destruct!([act] = ctx.call("", "add", None, [theta, phi])?);
        destruct!([act] = ctx.call("", "activation", Some(Arg::Str("relu")), [act])?);

        destruct!([mask] = ctx.call("mask", "conv", Some(conv_args(1, [1, 1], [1, 1])), [act])?);
        destruct!([mask] = ctx.call("", "batch-norm", None, [mask])?);
        destruct!([mask] = ctx.call("", "activation", Some(Arg::Str("sigmoid")), [mask])?);

        // back to the skip's resolution: non-learned + learned resampler
        destruct!([up] = ctx.call("", "upsample-nearest", Some(size2()), [mask.clone()])?);
        destruct!(
            [learned] = ctx.trap(
                "resample",
                TransConvBlock {
                    model_width: 1,
                    multiplier: 1,
                },
                [mask],
            )?
        );
        destruct!([mask] = ctx.call("", "add", None, [up, learned])?);

        destruct!([gated] = ctx.call("", "mul", None, [skip, mask])?);

        Ok((ctx, vec![gated]))
    }
}
