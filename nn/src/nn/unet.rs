use super::{
    AttentionGate, Context, ConvBlock, DenseBlock, FeatureExtract, NNError, NeuralNetwork,
    SqueezeExcite, Tensor, TransConvBlock, concat_channels, conv_args, macros::destruct, size2,
};
use crate::{Arg, BuildError, Config, GraphBuilder, Model, ProblemType, TensorMeta};
use digit_layout::types;
use log::debug;

/// Builds the fully wired model for one validated-or-not configuration.
/// All-or-nothing: any failure aborts the whole build.
pub fn build_model(config: &Config) -> Result<Model, BuildError> {
    config.validate()?;
    let input = TensorMeta::new(
        types::F32,
        [1, config.length, config.width, config.num_channel],
    );
    let model = GraphBuilder::default().build(
        SedUnet {
            config: config.clone(),
        },
        [input],
    )?;
    Ok(model)
}

/// Topology assembler for the squeeze-excite dense U-Net family: encoder →
/// dense bottleneck → gated decoder → output head, wired per [`Config`].
pub struct SedUnet {
    pub config: Config,
}

impl NeuralNetwork for SedUnet {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        mut ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError> {
        let Self { config: cfg } = self;
        let depth = cfg.model_depth;

        destruct!([x] = inputs);

        // encode: two conv stages per level, record the skip, pool
        let mut skips = Vec::with_capacity(depth);
        let mut pool = x;
        for i in 1..=depth {
            let multiplier = 1 << (i - 1);
            debug!("encoder level {i} at multiplier {multiplier}");
            destruct!(
                [conv] = ctx.trap(
                    format!("encoder{i}-conv1"),
                    ConvBlock {
                        model_width: cfg.model_width,
                        kernel: cfg.kernel_size,
                        multiplier,
                    },
                    [pool],
                )?
            );
            destruct!(
                [conv] = ctx.trap(
                    format!("encoder{i}-conv2"),
                    ConvBlock {
                        model_width: cfg.model_width,
                        kernel: cfg.kernel_size,
                        multiplier,
                    },
                    [conv],
                )?
            );
            skips.push(conv.clone());
            destruct!(
                [p] = ctx.call(format!("encoder{i}-pool"), "max-pool", Some(size2()), [conv])?
            );
            pool = p;
        }
        debug_assert_eq!(skips.len(), depth);

        // bottleneck: dense growth, optional latent, two conv stages
        debug!("bottleneck at multiplier {}", 1 << depth);
        destruct!(
            [dense] = ctx.trap(
                "bottleneck",
                DenseBlock {
                    model_width: cfg.model_width,
                    kernel: cfg.kernel_size,
                    multiplier: 1 << depth,
                    repeats: cfg.dense_loop.saturating_sub(1),
                },
                [pool],
            )?
        );
        let mut conv = dense;
        if cfg.autoencoder {
            destruct!(
                [latent] = ctx.trap(
                    "latent",
                    FeatureExtract {
                        model_width: cfg.model_width,
                        feature_number: cfg.feature_number,
                    },
                    [conv],
                )?
            );
            conv = latent;
        }
        for name in ["bottleneck-conv1", "bottleneck-conv2"] {
            destruct!(
                [c] = ctx.trap(
                    name,
                    ConvBlock {
                        model_width: cfg.model_width,
                        kernel: cfg.kernel_size,
                        multiplier: 1 << depth,
                    },
                    [conv],
                )?
            );
            conv = c;
        }

        // decode: deepest level first
        let mut levels = Vec::new();
        let mut deconv = conv;
        for level in (1..=depth).rev() {
            let multiplier = 1 << (level - 1);
            debug!("decoder level {level} at multiplier {multiplier}");
            let mut skip = skips[level - 1].clone();

            if cfg.attention_gate {
                destruct!(
                    [gated] = ctx.trap(
                        format!("decoder{level}-attention"),
                        AttentionGate {
                            model_width: cfg.model_width,
                            multiplier,
                        },
                        [skip, deconv.clone()],
                    )?
                );
                skip = gated;
            }

            if cfg.deep_supervision {
                // auxiliary head from the pre-upsampling tensor
                destruct!(
                    [aux] = ctx.call(
                        format!("level{level}"),
                        "conv",
                        Some(conv_args(1, [1, 1], [1, 1])),
                        [deconv.clone()],
                    )?
                );
                levels.push(aux);
            }

            deconv = if cfg.transposed_conv {
                destruct!(
                    [up] = ctx.trap(
                        format!("decoder{level}-up"),
                        TransConvBlock {
                            model_width: cfg.model_width,
                            multiplier,
                        },
                        [deconv],
                    )?
                );
                up
            } else {
                destruct!(
                    [up] = ctx.call(
                        format!("decoder{level}-up"),
                        "upsample-nearest",
                        Some(size2()),
                        [deconv],
                    )?
                );
                up
            };
            destruct!(
                [se] = ctx.trap(
                    format!("decoder{level}-se1"),
                    SqueezeExcite { ratio: cfg.se_ratio },
                    [deconv],
                )?
            );
            deconv = se;

            deconv = if cfg.recurrent_merge {
                recurrent_merge(&mut ctx, level, &cfg, skip, deconv)?
            } else {
                destruct!(
                    [cat] = ctx.call(
                        format!("decoder{level}-merge"),
                        "concat",
                        Some(concat_channels()),
                        [deconv, skip],
                    )?
                );
                cat
            };

            destruct!(
                [c] = ctx.trap(
                    format!("decoder{level}-conv1"),
                    ConvBlock {
                        model_width: cfg.model_width,
                        kernel: cfg.kernel_size,
                        multiplier,
                    },
                    [deconv],
                )?
            );
            destruct!(
                [c] = ctx.trap(
                    format!("decoder{level}-se2"),
                    SqueezeExcite { ratio: cfg.se_ratio },
                    [c],
                )?
            );
            destruct!(
                [c] = ctx.trap(
                    format!("decoder{level}-conv2"),
                    ConvBlock {
                        model_width: cfg.model_width,
                        kernel: cfg.kernel_size,
                        multiplier,
                    },
                    [c],
                )?
            );
            deconv = c;
        }

        // output head
        let activation = match cfg.problem_type {
            ProblemType::Classification => "softmax",
            ProblemType::Regression => "linear",
        };
        let mut arg = conv_args(cfg.output_nums, [1, 1], [1, 1]);
        if let Arg::Dict(map) = &mut arg {
            map.insert("activation".into(), Arg::Str(activation));
        }
        destruct!([out] = ctx.call("out", "conv", Some(arg), [deconv])?);

        // deep supervision emits aux outputs deepest-first; append the
        // final output and reverse so it comes first, then level 1 … depth
        let outputs = if cfg.deep_supervision {
            levels.push(out);
            levels.reverse();
            levels
        } else {
            vec![out]
        };

        Ok((ctx, outputs))
    }
}

/// Merges skip and decoder tensors through a single-step backward
/// ConvLSTM over a synthetic unit-length time axis. Filter count follows
/// the reference's truncating arithmetic: `model_width * 2^(level-1) / 2`.
fn recurrent_merge(
    ctx: &mut Context,
    level: usize,
    cfg: &Config,
    skip: Tensor,
    deconv: Tensor,
) -> Result<Tensor, NNError> {
    let multiplier = 1 << (level - 1);
    let h = cfg.length / multiplier;
    let w = cfg.width / multiplier;
    let c = cfg.model_width * multiplier;
    let seq = Arg::dict([("shape", Arg::arr([1, h, w, c].map(Arg::int)))]);

    destruct!(
        [x1] = ctx.call(
            format!("decoder{level}-seq-skip"),
            "reshape",
            Some(seq.clone()),
            [skip],
        )?
    );
    destruct!(
        [x2] = ctx.call(
            format!("decoder{level}-seq-up"),
            "reshape",
            Some(seq),
            [deconv],
        )?
    );
    destruct!(
        [merge] = ctx.call(
            format!("decoder{level}-seq-merge"),
            "concat",
            Some(Arg::dict([("axis", Arg::int(4))])),
            [x1, x2],
        )?
    );
    destruct!(
        [collapsed] = ctx.call(
            format!("decoder{level}-lstm"),
            "conv-lstm",
            Some(Arg::dict([
                ("filters", Arg::int(cfg.model_width * multiplier / 2)),
                ("kernel", Arg::arr([Arg::int(3), Arg::int(3)])),
                ("go_backwards", Arg::bool(true)),
            ])),
            [merge],
        )?
    );
    Ok(collapsed)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ConfigError;

    fn reference() -> Config {
        let mut config = Config::new(16, 16, 2, 8, 3, 1);
        config.se_ratio = 4;
        config
    }

    #[test]
    fn zero_depth_fails_before_construction() {
        let mut config = reference();
        config.model_depth = 0;
        assert!(matches!(
            build_model(&config),
            Err(BuildError::Config(ConfigError::ZeroDimension("model_depth")))
        ));
    }

    #[test]
    fn skip_channel_widths() {
        // encoder records skips at 8 and 16 channels before decode
        let model = build_model(&reference()).unwrap();
        let pool1 = model.nodes_with_prefix("Ω:encoder1-pool").count();
        let pool2 = model.nodes_with_prefix("Ω:encoder2-pool").count();
        assert_eq!((pool1, pool2), (1, 1));

        let index = model.node_index();
        let skip_channels = |prefix: &str| {
            let (_, &i) = index
                .iter_prefix(prefix.as_bytes())
                .next()
                .unwrap();
            let inputs = model
                .0
                .topo
                .iter()
                .nth(i)
                .unwrap()
                .inputs
                .to_vec();
            model.0.edges[inputs[0]].meta.shape()[3]
        };
        assert_eq!(skip_channels("Ω:encoder1-pool"), 8);
        assert_eq!(skip_channels("Ω:encoder2-pool"), 16);
    }

    #[test]
    fn recurrent_merge_filter_law() {
        let mut config = reference();
        config.recurrent_merge = true;
        let model = build_model(&config).unwrap();
        let index = model.node_index();
        for (level, filters) in [(2usize, 8usize), (1, 4)] {
            let key = format!("Ω:decoder{level}-lstm");
            let (_, &i) = index.iter_prefix(key.as_bytes()).next().unwrap();
            let node = &model.0.nodes[i];
            assert_eq!(node.op, "conv-lstm");
            assert_eq!(
                node.arg.as_ref().unwrap().get("filters").unwrap().as_int(),
                Some(filters)
            );
        }
    }
}
