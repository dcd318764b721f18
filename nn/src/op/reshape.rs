use super::{OpError, Operator, macros::*};
use crate::{Arg, TensorMeta};

/// Collapses everything behind the batch dim into one axis.
pub struct Flatten;

impl Operator for Flatten {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        if arg.is_some() {
            return Err(OpError::ArgError);
        }

        destruct!([x] = inputs);
        let [n, rest @ ..] = x.shape() else {
            return Err(OpError::ShapeError);
        };
        if rest.is_empty() {
            return Err(OpError::ShapeError);
        }

        Ok(vec![TensorMeta::new(
            x.dt,
            [*n, rest.iter().product::<usize>()],
        )])
    }
}

/// Reinterprets the per-sample layout; element count must be preserved.
///
/// args: `{ shape: [d0, ..] }` (batch dim excluded)
pub struct Reshape;

impl Operator for Reshape {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        let target = arg
            .and_then(|arg| arg.get("shape"))
            .and_then(Arg::as_dims)
            .filter(|dims| !dims.is_empty() && dims.iter().all(|&d| d > 0))
            .ok_or(OpError::ArgError)?;

        destruct!([x] = inputs);
        let [n, rest @ ..] = x.shape() else {
            return Err(OpError::ShapeError);
        };
        if rest.iter().product::<usize>() != target.iter().product::<usize>() {
            return Err(OpError::ShapeError);
        }

        let shape = std::iter::once(*n).chain(target).collect::<Vec<_>>();
        Ok(vec![TensorMeta::new(x.dt, shape)])
    }
}
