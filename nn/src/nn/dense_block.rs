use super::{
    Context, ConvBlock, NNError, NeuralNetwork, Tensor, concat_channels, macros::destruct,
};

/// Densely connected stage: each repeat runs two conv blocks and
/// concatenates their result onto the running tensor, growing channels by
/// `model_width * multiplier` per repeat.
pub struct DenseBlock {
    pub model_width: usize,
    pub kernel: usize,
    pub multiplier: usize,
    pub repeats: usize,
}

impl NeuralNetwork for DenseBlock {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        mut ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError> {
        let Self {
            model_width,
            kernel,
            multiplier,
            repeats,
        } = self;

        destruct!([x] = inputs);
        let mut x = x;
        for _ in 0..repeats {
            destruct!(
                [cb] = ctx.trap(
                    "conv",
                    ConvBlock {
                        model_width,
                        kernel,
                        multiplier,
                    },
                    [x.clone()],
                )?
            );
            destruct!(
                [cb] = ctx.trap(
                    "conv",
                    ConvBlock {
                        model_width,
                        kernel,
                        multiplier,
                    },
                    [cb],
                )?
            );
            destruct!([cat] = ctx.call("", "concat", Some(concat_channels()), [x, cb])?);
            x = cat;
        }

        Ok((ctx, vec![x]))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{GraphBuilder, TensorMeta};
    use digit_layout::types;

    fn output_channels(repeats: usize) -> usize {
        let model = GraphBuilder::default()
            .build(
                DenseBlock {
                    model_width: 4,
                    kernel: 3,
                    multiplier: 2,
                    repeats,
                },
                [TensorMeta::new(types::F32, [1, 8, 8, 16])],
            )
            .unwrap();
        model.output_metas()[0].shape()[3]
    }

    #[test]
    fn zero_repeats_is_identity() {
        assert_eq!(output_channels(0), 16);
    }

    #[test]
    fn channel_growth_law() {
        // C + n * width * multiplier
        assert_eq!(output_channels(1), 16 + 4 * 2);
        assert_eq!(output_channels(3), 16 + 3 * 4 * 2);
    }
}
