use super::{OpError, Operator, macros::*, pair};
use crate::{Arg, TensorMeta};

/// 2D max pooling; args: `{ size: [ph, pw] }`. The window must tile the
/// spatial dims exactly.
pub struct MaxPool;

impl Operator for MaxPool {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        let arg = arg.ok_or(OpError::ArgError)?;
        let [ph, pw] = pair(arg.get("size"))?;

        destruct!([x] = inputs);
        dims!([n, h, w, c] = x);

        if h % ph != 0 || w % pw != 0 {
            return Err(OpError::ShapeError);
        }

        Ok(vec![TensorMeta::new(x.dt, [n, h / ph, w / pw, c])])
    }
}

/// Global average pooling: collapses spatial dims to a per-channel
/// descriptor.
pub struct GlobalAvgPool;

impl Operator for GlobalAvgPool {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        if arg.is_some() {
            return Err(OpError::ArgError);
        }

        destruct!([x] = inputs);
        dims!([n, _h, _w, c] = x);

        Ok(vec![TensorMeta::new(x.dt, [n, c])])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use digit_layout::types;

    fn size2() -> Arg {
        Arg::dict([("size", Arg::arr([Arg::int(2), Arg::int(2)]))])
    }

    #[test]
    fn max_pool_halves() {
        let x = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        let out = MaxPool.infer(&[x], Some(&size2())).unwrap();
        assert_eq!(out[0].shape(), &[1, 8, 8, 8]);
    }

    #[test]
    fn max_pool_rejects_odd_dims() {
        let x = TensorMeta::new(types::F32, [1, 9, 16, 8]);
        assert_eq!(
            MaxPool.infer(&[x], Some(&size2())),
            Err(OpError::ShapeError)
        );
    }

    #[test]
    fn global_avg_pool_keeps_channels() {
        let x = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        let out = GlobalAvgPool.infer(&[x], None).unwrap();
        assert_eq!(out[0].shape(), &[1, 8]);
    }
}
