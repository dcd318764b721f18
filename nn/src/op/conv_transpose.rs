use super::{OpError, Operator, macros::*, pair};
use crate::{Arg, TensorMeta};

/// 2D transposed convolution, the learned upsampler.
///
/// args: `{ filters, kernel: [kh, kw], strides: [sh, sw] }`
pub struct ConvTranspose;

impl Operator for ConvTranspose {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        let arg = arg.ok_or(OpError::ArgError)?;
        let filters = arg
            .get("filters")
            .and_then(Arg::as_int)
            .filter(|&f| f > 0)
            .ok_or(OpError::ArgError)?;
        let _kernel = pair(arg.get("kernel"))?;
        let [sh, sw] = pair(arg.get("strides"))?;

        destruct!([x] = inputs);
        dims!([n, h, w, _c] = x);

        Ok(vec![TensorMeta::new(x.dt, [n, h * sh, w * sw, filters])])
    }
}
