mod activation;
mod concat;
mod conv;
mod conv_lstm;
mod conv_transpose;
mod element;
mod linear;
mod normalization;
mod pool;
mod reshape;
mod upsample;

use crate::{Arg, TensorMeta};

pub use activation::Activation;
pub use concat::Concat;
pub use conv::Conv;
pub use conv_lstm::ConvLstm;
pub use conv_transpose::ConvTranspose;
pub use element::{Add, Mul};
pub use linear::Linear;
pub use normalization::BatchNorm;
pub use pool::{GlobalAvgPool, MaxPool};
pub use reshape::{Flatten, Reshape};
pub use upsample::UpsampleNearest;

/// Graph-level operator: shape inference only. Execution is the external
/// tensor engine's concern.
pub trait Operator {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OpError {
    #[error("operator is not registered")]
    NotExist,
    #[error("operand data types disagree")]
    DataTypeMismatch,
    #[error("operand arity or rank is wrong")]
    ShapeError,
    #[error("operand shapes are inconsistent")]
    ShapeMismatch,
    #[error("operator argument is missing or malformed")]
    ArgError,
}

pub(crate) mod macros {
    macro_rules! destruct {
        ([$( $name:ident ),+] = $iter:expr) => {
            let mut iter = $iter.into_iter();
            $( let $name = iter.next().ok_or(OpError::ShapeError)?; )+
            if iter.next().is_some() {
                return Err(OpError::ShapeError);
            }
        };
    }

    macro_rules! dims {
        ($pat:pat = $tensor:expr) => {
            let &$pat = $tensor.shape() else {
                return Err(OpError::ShapeError);
            };
        };
    }

    pub(crate) use {destruct, dims};
}

/// Parses a `[h, w]` pair argument, e.g. kernel, strides or pool size.
pub(crate) fn pair(arg: Option<&Arg>) -> Result<[usize; 2], OpError> {
    let dims = arg
        .and_then(Arg::as_dims)
        .filter(|dims| dims.len() == 2 && dims.iter().all(|&d| d > 0))
        .ok_or(OpError::ArgError)?;
    Ok([dims[0], dims[1]])
}

/// Fused activation names the external engine accepts.
pub(crate) fn check_activation(arg: &Arg) -> Result<(), OpError> {
    match arg.as_str() {
        Some("relu" | "sigmoid" | "softmax" | "linear") => Ok(()),
        _ => Err(OpError::ArgError),
    }
}
