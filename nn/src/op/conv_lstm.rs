use super::{OpError, Operator, macros::*, pair};
use crate::{Arg, TensorMeta};

/// Single-step convolutional LSTM over a `(n, t, h, w, c)` sequence,
/// collapsing the time axis to one `(n, h, w, filters)` output.
///
/// args: `{ filters, kernel: [kh, kw], go_backwards }`
pub struct ConvLstm;

impl Operator for ConvLstm {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        let arg = arg.ok_or(OpError::ArgError)?;
        let filters = arg
            .get("filters")
            .and_then(Arg::as_int)
            .filter(|&f| f > 0)
            .ok_or(OpError::ArgError)?;
        let _kernel = pair(arg.get("kernel"))?;
        let _backwards = arg
            .get("go_backwards")
            .and_then(Arg::as_bool)
            .ok_or(OpError::ArgError)?;

        destruct!([x] = inputs);
        dims!([n, _t, h, w, _c] = x);

        Ok(vec![TensorMeta::new(x.dt, [n, h, w, filters])])
    }
}
