use super::Context;
use digit_layout::DigitLayout;

/// Handle to one tensor of the graph under construction. The context owns
/// every tensor record; handles only reference into it.
pub struct Tensor {
    pub(super) idx: usize,
    pub(super) ctx: Context,
}

impl Clone for Tensor {
    fn clone(&self) -> Self {
        Self {
            idx: self.idx,
            ctx: self.ctx.clone(),
        }
    }
}

impl Tensor {
    #[inline]
    pub fn dt(&self) -> DigitLayout {
        self.meta().dt
    }

    #[inline]
    pub fn shape(&self) -> Box<[usize]> {
        self.meta().shape.clone()
    }

    pub(crate) fn meta(&self) -> TensorMeta {
        self.ctx.get_meta(self.idx)
    }
}

/// Static dtype + shape of a graph edge. Spatial tensors are NHWC.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TensorMeta {
    pub dt: DigitLayout,
    pub shape: Box<[usize]>,
}

impl TensorMeta {
    pub fn new(dt: DigitLayout, shape: impl IntoIterator<Item = usize>) -> Self {
        let shape = shape.into_iter().collect::<Box<_>>();
        Self { dt, shape }
    }

    #[inline]
    pub const fn dt(&self) -> DigitLayout {
        self.dt
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Element count including the batch dim.
    #[inline]
    pub fn n_elements(&self) -> usize {
        self.shape.iter().product()
    }
}
