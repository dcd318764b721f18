mod attention;
mod conv_block;
mod dense_block;
mod feature_extract;
mod squeeze_excite;
mod trans_conv;
mod unet;

use crate::{
    ctx::{Context, Tensor},
    op::OpError,
};

pub use attention::AttentionGate;
pub use conv_block::ConvBlock;
pub use dense_block::DenseBlock;
pub use feature_extract::FeatureExtract;
pub use squeeze_excite::SqueezeExcite;
pub use trans_conv::TransConvBlock;
pub use unet::{SedUnet, build_model};

/// A sub-network: appends its nodes to the graph under construction and
/// hands back its output tensors.
pub trait NeuralNetwork: Sized {
    fn launch(
        self,
        inputs: impl IntoIterator<Item = Tensor>,
        ctx: Context,
    ) -> Result<(Context, Vec<Tensor>), NNError>;
}

/// A graph-construction failure, tagged with the path of the node that
/// rejected its operands.
#[derive(Debug, thiserror::Error)]
#[error("{name}: {err}")]
pub struct NNError {
    pub name: String,
    pub err: OpError,
}

use crate::Arg;

/// Args for a `conv`/`conv-transpose` call.
pub(crate) fn conv_args(filters: usize, kernel: [usize; 2], strides: [usize; 2]) -> Arg {
    Arg::dict([
        ("filters", Arg::int(filters)),
        ("kernel", Arg::arr(kernel.map(Arg::int))),
        ("strides", Arg::arr(strides.map(Arg::int))),
    ])
}

/// Args for a `linear` call with a fused activation.
pub(crate) fn linear_args(features: usize, activation: &'static str) -> Arg {
    Arg::dict([
        ("features", Arg::int(features)),
        ("activation", Arg::Str(activation)),
    ])
}

/// Args for a 2x `max-pool`/`upsample-nearest` call.
pub(crate) fn size2() -> Arg {
    Arg::dict([("size", Arg::arr([Arg::int(2), Arg::int(2)]))])
}

/// Args for a channel-axis `concat` call (NHWC).
pub(crate) fn concat_channels() -> Arg {
    Arg::dict([("axis", Arg::int(3))])
}

pub(crate) mod macros {
    macro_rules! destruct {
        ([$( $name:ident ),+] = $iter:expr) => {
            let mut iter = $iter.into_iter();
            $( let $name = iter.next().unwrap(); )+
            assert!(iter.next().is_none());
        };
    }

    macro_rules! dims {
        ($pat:pat = $tensor:expr) => {
            let shape = $tensor.shape();
            let &$pat = &*shape else {
                panic!("Ndim mismatch ( = {})", shape.len())
            };
        };
    }

    pub(crate) use {destruct, dims};
}
