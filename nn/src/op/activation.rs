use super::{OpError, Operator, check_activation, macros::*};
use crate::{Arg, TensorMeta};

/// Elementwise activation; arg names the nonlinearity.
pub struct Activation;

impl Operator for Activation {
    fn infer(&self, inputs: &[TensorMeta], arg: Option<&Arg>) -> Result<Vec<TensorMeta>, OpError> {
        check_activation(arg.ok_or(OpError::ArgError)?)?;

        destruct!([x] = inputs);
        Ok(vec![x.clone()])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use digit_layout::types;

    #[test]
    fn known_nonlinearities() {
        let x = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        for act in ["relu", "sigmoid", "softmax", "linear"] {
            let out = Activation
                .infer(std::slice::from_ref(&x), Some(&Arg::Str(act)))
                .unwrap();
            assert_eq!(out, vec![x.clone()]);
        }
    }

    #[test]
    fn unknown_name_rejected() {
        let x = TensorMeta::new(types::F32, [1, 16, 16, 8]);
        assert_eq!(
            Activation.infer(&[x], Some(&Arg::Str("swish"))),
            Err(OpError::ArgError)
        );
    }
}
