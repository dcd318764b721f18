use super::{OpError, Operator, check_activation, macros::*, pair};
use crate::{Arg, TensorMeta};

/// 2D convolution with `same` padding; optional fused activation.
///
/// args: `{ filters, kernel: [kh, kw], strides: [sh, sw], activation? }`
pub struct Conv;

impl Operator for Conv {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        let arg = arg.ok_or(OpError::ArgError)?;
        let filters = arg
            .get("filters")
            .and_then(Arg::as_int)
            .filter(|&f| f > 0)
            .ok_or(OpError::ArgError)?;
        let _kernel = pair(arg.get("kernel"))?;
        let [sh, sw] = pair(arg.get("strides"))?;
        if let Some(act) = arg.get("activation") {
            check_activation(act)?;
        }

        destruct!([x] = inputs);
        dims!([n, h, w, _c] = x);

        // same padding: only the stride moves the spatial dims
        if h % sh != 0 || w % sw != 0 {
            return Err(OpError::ShapeError);
        }

        Ok(vec![TensorMeta::new(x.dt, [n, h / sh, w / sw, filters])])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use digit_layout::types;

    fn args(filters: usize, kernel: usize, strides: usize) -> Arg {
        Arg::dict([
            ("filters", Arg::int(filters)),
            ("kernel", Arg::arr([Arg::int(kernel), Arg::int(kernel)])),
            ("strides", Arg::arr([Arg::int(strides), Arg::int(strides)])),
        ])
    }

    #[test]
    fn same_padding_keeps_spatial_dims() {
        let x = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        let out = Conv.infer(&[x], Some(&args(32, 3, 1))).unwrap();
        assert_eq!(out[0].shape(), &[1, 16, 16, 32]);
    }

    #[test]
    fn stride_two_halves_spatial_dims() {
        let x = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        let out = Conv.infer(&[x], Some(&args(8, 1, 2))).unwrap();
        assert_eq!(out[0].shape(), &[1, 8, 8, 8]);
    }

    #[test]
    fn stride_must_divide() {
        let x = TensorMeta::new(types::F32, [1, 15, 16, 8]);
        assert_eq!(
            Conv.infer(&[x], Some(&args(8, 1, 2))),
            Err(OpError::ShapeError)
        );
    }

    #[test]
    fn missing_args_rejected() {
        let x = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        assert_eq!(Conv.infer(&[x], None), Err(OpError::ArgError));
    }
}
