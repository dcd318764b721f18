use super::{OpError, Operator};
use crate::{Arg, TensorMeta};

/// Channel-wise (or any-axis) concatenation of two or more tensors.
///
/// args: `{ axis }`
pub struct Concat;

impl Operator for Concat {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        let axis = arg
            .and_then(|arg| arg.get("axis"))
            .and_then(Arg::as_int)
            .ok_or(OpError::ArgError)?;

        let [first, rest @ ..] = inputs else {
            return Err(OpError::ShapeError);
        };
        if rest.is_empty() {
            return Err(OpError::ShapeError);
        }

        let rank = first.shape().len();
        if axis >= rank {
            return Err(OpError::ArgError);
        }
        if rest.iter().any(|t| t.shape().len() != rank) {
            return Err(OpError::ShapeError);
        }
        if rest.iter().any(|t| t.dt != first.dt) {
            return Err(OpError::DataTypeMismatch);
        }

        let mut shape = first.shape().to_vec();
        for (i, dim) in shape.iter_mut().enumerate() {
            if i == axis {
                *dim = inputs.iter().map(|t| t.shape()[i]).sum();
            } else if rest.iter().any(|t| t.shape()[i] != *dim) {
                return Err(OpError::ShapeMismatch);
            }
        }

        Ok(vec![TensorMeta::new(first.dt, shape)])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use digit_layout::types;

    fn axis(axis: usize) -> Arg {
        Arg::dict([("axis", Arg::int(axis))])
    }

    #[test]
    fn sums_channel_axis() {
        let a = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        let b = TensorMeta::new(types::F32, [1, 16, 16, 24]);
        let out = Concat.infer(&[a, b], Some(&axis(3))).unwrap();
        assert_eq!(out[0].shape(), &[1, 16, 16, 32]);
    }

    #[test]
    fn three_way() {
        let a = TensorMeta::new(types::F32, [1, 4, 4, 8]);
        let out = Concat
            .infer(&[a.clone(), a.clone(), a], Some(&axis(3)))
            .unwrap();
        assert_eq!(out[0].shape(), &[1, 4, 4, 24]);
    }

    #[test]
    fn spatial_mismatch_rejected() {
        let a = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        let b = TensorMeta::new(types::F32, [1, 8, 8, 8]);
        assert_eq!(
            Concat.infer(&[a, b], Some(&axis(3))),
            Err(OpError::ShapeMismatch)
        );
    }

    #[test]
    fn single_input_rejected() {
        let a = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        assert_eq!(Concat.infer(&[a], Some(&axis(3))), Err(OpError::ShapeError));
    }
}
