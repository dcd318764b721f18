use super::{OpError, Operator};
use crate::{Arg, TensorMeta};

/// Elementwise sum of two or more tensors of identical shape.
pub struct Add;

impl Operator for Add {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        if arg.is_some() {
            return Err(OpError::ArgError);
        }

        let [first, rest @ ..] = inputs else {
            return Err(OpError::ShapeError);
        };
        if rest.is_empty() {
            return Err(OpError::ShapeError);
        }
        if rest.iter().any(|t| t.dt != first.dt) {
            return Err(OpError::DataTypeMismatch);
        }
        if rest.iter().any(|t| t.shape() != first.shape()) {
            return Err(OpError::ShapeMismatch);
        }

        Ok(vec![first.clone()])
    }
}

/// Elementwise product with numpy-style broadcasting: shapes align from
/// the trailing dim, each pair equal or 1. A rank-2 `(n, c)` gate scales
/// a rank-4 `(n, h, w, c)` map channel-wise.
pub struct Mul;

impl Operator for Mul {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        if arg.is_some() {
            return Err(OpError::ArgError);
        }

        let [a, b] = inputs else {
            return Err(OpError::ShapeError);
        };
        if a.dt != b.dt {
            return Err(OpError::DataTypeMismatch);
        }

        let mut shape = vec![1; a.shape().len().max(b.shape().len())];
        for (i, dim) in shape.iter_mut().rev().enumerate() {
            let da = a.shape().iter().rev().nth(i).copied().unwrap_or(1);
            let db = b.shape().iter().rev().nth(i).copied().unwrap_or(1);
            *dim = match (da, db) {
                (da, db) if da == db => da,
                (1, d) | (d, 1) => d,
                _ => return Err(OpError::ShapeMismatch),
            };
        }

        Ok(vec![TensorMeta::new(a.dt, shape)])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use digit_layout::types;

    #[test]
    fn add_same_shape() {
        let a = TensorMeta::new(types::F32, [1, 8, 8, 16]);
        let out = Add.infer(&[a.clone(), a.clone()], None).unwrap();
        assert_eq!(out, vec![a]);
    }

    #[test]
    fn add_shape_mismatch() {
        let a = TensorMeta::new(types::F32, [1, 8, 8, 16]);
        let b = TensorMeta::new(types::F32, [1, 8, 8, 1]);
        assert_eq!(Add.infer(&[a, b], None), Err(OpError::ShapeMismatch));
    }

    #[test]
    fn mul_broadcasts_channel_gate() {
        // squeeze-excite: (n, h, w, c) * (n, c)
        let x = TensorMeta::new(types::F32, [1, 8, 8, 16]);
        let gate = TensorMeta::new(types::F32, [1, 16]);
        let out = Mul.infer(&[x, gate], None).unwrap();
        assert_eq!(out[0].shape(), &[1, 8, 8, 16]);
    }

    #[test]
    fn mul_broadcasts_spatial_mask() {
        // attention: (n, h, w, c) * (n, h, w, 1)
        let x = TensorMeta::new(types::F32, [1, 8, 8, 16]);
        let mask = TensorMeta::new(types::F32, [1, 8, 8, 1]);
        let out = Mul.infer(&[x, mask], None).unwrap();
        assert_eq!(out[0].shape(), &[1, 8, 8, 16]);
    }

    #[test]
    fn mul_incompatible_dims() {
        let a = TensorMeta::new(types::F32, [1, 8, 8, 16]);
        let b = TensorMeta::new(types::F32, [1, 8, 8, 4]);
        assert_eq!(Mul.infer(&[a, b], None), Err(OpError::ShapeMismatch));
    }
}
