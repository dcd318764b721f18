use digit_layout::types;
use nn::{
    BuildError, Config, ConfigError, Context, GraphBuilder, NNError, NeuralNetwork, OpError,
    ProblemType, Tensor, TensorMeta, build_model,
};

fn reference() -> Config {
    let mut config = Config::new(16, 16, 2, 8, 3, 1);
    config.se_ratio = 4;
    config
}

#[test]
fn single_output_by_default() {
    let model = build_model(&reference()).unwrap();
    assert_eq!(
        model.output_metas(),
        vec![TensorMeta::new(types::F32, [1, 16, 16, 1])]
    );
}

#[test]
fn deep_supervision_output_ladder() {
    // final full-resolution output first, then auxiliaries from
    // shallowest decoder level to deepest
    let mut config = reference();
    config.deep_supervision = true;
    let model = build_model(&config).unwrap();
    assert_eq!(
        model.output_metas(),
        vec![
            TensorMeta::new(types::F32, [1, 16, 16, 1]),
            TensorMeta::new(types::F32, [1, 8, 8, 1]),
            TensorMeta::new(types::F32, [1, 4, 4, 1]),
        ]
    );
}

#[test]
fn classification_head_uses_softmax() {
    let mut config = reference();
    config.problem_type = ProblemType::Classification;
    config.output_nums = 3;
    let model = build_model(&config).unwrap();

    let (_, out) = model
        .nodes_with_prefix("Ω:out")
        .next()
        .unwrap();
    assert_eq!(out.op, "conv");
    let arg = out.arg.as_ref().unwrap();
    assert_eq!(arg.get("activation").and_then(|a| a.as_str()), Some("softmax"));
    assert_eq!(
        model.output_metas(),
        vec![TensorMeta::new(types::F32, [1, 16, 16, 3])]
    );
}

#[test]
fn regression_head_is_linear() {
    let model = build_model(&reference()).unwrap();
    let (_, out) = model.nodes_with_prefix("Ω:out").next().unwrap();
    let arg = out.arg.as_ref().unwrap();
    assert_eq!(arg.get("activation").and_then(|a| a.as_str()), Some("linear"));
}

#[test]
fn builds_are_reproducible() {
    let mut config = reference();
    config.deep_supervision = true;
    config.attention_gate = true;
    let a = build_model(&config).unwrap();
    let b = build_model(&config).unwrap();

    assert_eq!(a.n_nodes(), b.n_nodes());
    assert_eq!(a.n_edges(), b.n_edges());
    assert_eq!(a.output_metas(), b.output_metas());
    let names = |m: &nn::Model| {
        m.0.nodes.iter().map(|n| n.name.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&a), names(&b));
}

#[test]
fn attention_gates_every_decoder_level() {
    let mut config = reference();
    config.attention_gate = true;
    let model = build_model(&config).unwrap();
    for level in 1..=2 {
        let prefix = format!("Ω.decoder{level}-attention");
        assert!(model.nodes_with_prefix(&prefix).next().is_some());
    }
    assert_eq!(
        model.output_metas(),
        vec![TensorMeta::new(types::F32, [1, 16, 16, 1])]
    );
}

#[test]
fn autoencoder_threads_a_latent() {
    let mut config = reference();
    config.autoencoder = true;
    config.feature_number = 32;
    let model = build_model(&config).unwrap();
    assert!(model.nodes_with_prefix("Ω.latent").next().is_some());
    assert_eq!(
        model.output_metas(),
        vec![TensorMeta::new(types::F32, [1, 16, 16, 1])]
    );
}

#[test]
fn recurrent_merge_preserves_output_shape() {
    let mut config = reference();
    config.recurrent_merge = true;
    let model = build_model(&config).unwrap();
    assert!(model.nodes_with_prefix("Ω:decoder2-lstm").next().is_some());
    assert_eq!(
        model.output_metas(),
        vec![TensorMeta::new(types::F32, [1, 16, 16, 1])]
    );
}

#[test]
fn rejects_unpoolable_input() {
    let mut config = reference();
    config.length = 10;
    assert!(matches!(
        build_model(&config),
        Err(BuildError::Config(ConfigError::NotPoolable { .. }))
    ));
}

#[test]
fn rejects_indivisible_se_ratio() {
    let mut config = reference();
    config.se_ratio = 16;
    assert!(matches!(
        build_model(&config),
        Err(BuildError::Config(ConfigError::SeRatioIndivisible { .. }))
    ));
}

#[test]
fn rejects_zero_channels() {
    let mut config = reference();
    config.num_channel = 0;
    assert!(matches!(
        build_model(&config),
        Err(BuildError::Config(ConfigError::ZeroDimension("num_channel")))
    ));
}

#[test]
fn summary_lists_every_node_with_shapes() {
    let model = build_model(&reference()).unwrap();
    let summary = model.summary();

    // one line per node, plus input, output and tally lines
    assert_eq!(summary.lines().count(), model.n_nodes() + 3);
    assert!(summary.starts_with("input  Ω.0 [1, 16, 16, 1]"));
    for node in model.0.nodes.iter() {
        assert!(summary.contains(&node.name));
    }
    assert!(summary.contains("[1, 16, 16, 1]"));
}

#[test]
fn model_debug_formats() {
    let model = build_model(&reference()).unwrap();
    assert!(format!("{model:?}").contains("Ω:out"));
}

struct CallsUnknownOp;

impl NeuralNetwork for CallsUnknownOp {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        mut ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError> {
        let outputs = ctx.call("", "gelu", None, inputs)?;
        Ok((ctx, outputs))
    }
}

#[test]
fn unknown_op_is_rejected_with_its_path() {
    let err = GraphBuilder::default()
        .build(CallsUnknownOp, [TensorMeta::new(types::F32, [1, 4])])
        .unwrap_err();
    assert!(matches!(err.err, OpError::NotExist));
    assert_eq!(err.name, "Ω:gelu");
}
