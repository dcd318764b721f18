use super::{OpError, Operator, check_activation, macros::*};
use crate::{Arg, TensorMeta};

/// Dense projection `(n, d) -> (n, features)`; optional fused activation.
///
/// args: `{ features, activation? }`
pub struct Linear;

impl Operator for Linear {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        let arg = arg.ok_or(OpError::ArgError)?;
        let features = arg
            .get("features")
            .and_then(Arg::as_int)
            .filter(|&f| f > 0)
            .ok_or(OpError::ArgError)?;
        if let Some(act) = arg.get("activation") {
            check_activation(act)?;
        }

        destruct!([x] = inputs);
        dims!([n, _d] = x);

        Ok(vec![TensorMeta::new(x.dt, [n, features])])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use digit_layout::types;

    #[test]
    fn projects_features() {
        let x = TensorMeta::new(types::F32, [1, 2048]);
        let arg = Arg::dict([("features", Arg::int(1024))]);
        let out = Linear.infer(&[x], Some(&arg)).unwrap();
        assert_eq!(out[0].shape(), &[1, 1024]);
    }

    #[test]
    fn zero_features_rejected() {
        let x = TensorMeta::new(types::F32, [1, 2048]);
        let arg = Arg::dict([("features", Arg::int(0))]);
        assert_eq!(Linear.infer(&[x], Some(&arg)), Err(OpError::ArgError));
    }

    #[test]
    fn rank_4_rejected() {
        let x = TensorMeta::new(types::F32, [1, 4, 4, 8]);
        let arg = Arg::dict([("features", Arg::int(16))]);
        assert_eq!(Linear.infer(&[x], Some(&arg)), Err(OpError::ShapeError));
    }
}
