use super::{Context, NNError, NeuralNetwork, Tensor, linear_args, macros::*};
use crate::Arg;

/// Autoencoder latent bottleneck: flatten → dense(`feature_number`) →
/// dense(width·h·w) → reshape(h, w, width). Deliberately lossy; spatial
/// dims survive, channels become `model_width`.
pub struct FeatureExtract {
    pub model_width: usize,
    pub feature_number: usize,
}

impl NeuralNetwork for FeatureExtract {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        mut ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError> {
        let Self {
            model_width,
            feature_number,
        } = self;

        destruct!([x] = inputs);
        dims!([_n, h, w, _c] = x);

        destruct!([latent] = ctx.call("", "flatten", None, [x])?);
        // the latent embedding itself
        destruct!(
            [latent] = ctx.call(
                "features",
                "linear",
                Some(linear_args(feature_number, "linear")),
                [latent],
            )?
        );
        destruct!(
            [latent] = ctx.call(
                "",
                "linear",
                Some(linear_args(model_width * h * w, "linear")),
                [latent],
            )?
        );
        destruct!(
            [latent] = ctx.call(
                "",
                "reshape",
                Some(Arg::dict([(
                    "shape",
                    Arg::arr([h, w, model_width].map(Arg::int)),
                )])),
                [latent],
            )?
        );

        Ok((ctx, vec![latent]))
    }
}
