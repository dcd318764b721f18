mod graph;
mod name;
mod tensor;

pub use graph::Context;
pub use tensor::{Tensor, TensorMeta};

use crate::op::{self, Operator};
use std::collections::HashMap;

pub(crate) type OpLib = HashMap<String, Box<dyn Operator>>;

/// Entry point for one build: an operator library plus [`GraphBuilder::build`].
pub struct GraphBuilder {
    op_lib: OpLib,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self { op_lib: OpLib::new() }
            .register_op("conv", op::Conv)
            .register_op("conv-transpose", op::ConvTranspose)
            .register_op("batch-norm", op::BatchNorm)
            .register_op("activation", op::Activation)
            .register_op("max-pool", op::MaxPool)
            .register_op("global-avg-pool", op::GlobalAvgPool)
            .register_op("upsample-nearest", op::UpsampleNearest)
            .register_op("concat", op::Concat)
            .register_op("add", op::Add)
            .register_op("mul", op::Mul)
            .register_op("linear", op::Linear)
            .register_op("flatten", op::Flatten)
            .register_op("reshape", op::Reshape)
            .register_op("conv-lstm", op::ConvLstm)
    }
}

impl GraphBuilder {
    pub fn register_op(mut self, name: impl ToString, op: impl Operator + 'static) -> Self {
        self.op_lib.insert(name.to_string(), Box::new(op));
        self
    }
}
