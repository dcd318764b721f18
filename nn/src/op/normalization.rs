use super::{OpError, Operator, macros::*};
use crate::{Arg, TensorMeta};

/// Batch normalization over the channel axis; shape-preserving.
pub struct BatchNorm;

impl Operator for BatchNorm {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        if arg.is_some() {
            return Err(OpError::ArgError);
        }

        destruct!([x] = inputs);
        if x.shape().len() < 2 {
            return Err(OpError::ShapeError);
        }

        Ok(vec![x.clone()])
    }
}
