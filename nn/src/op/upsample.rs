use super::{OpError, Operator, macros::*, pair};
use crate::{Arg, TensorMeta};

/// Non-learned 2D upsampling by nearest-neighbor repetition.
///
/// args: `{ size: [ph, pw] }`
pub struct UpsampleNearest;

impl Operator for UpsampleNearest {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        let arg = arg.ok_or(OpError::ArgError)?;
        let [ph, pw] = pair(arg.get("size"))?;

        destruct!([x] = inputs);
        dims!([n, h, w, c] = x);

        Ok(vec![TensorMeta::new(x.dt, [n, h * ph, w * pw, c])])
    }
}
