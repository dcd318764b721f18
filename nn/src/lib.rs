//! Parametric builder for 2D convolutional encoder-decoder graphs.
//!
//! The crate assembles a shape-checked DAG of operator nodes from a compact
//! [`Config`]: an encoder of pooled conv stages, a dense bottleneck with an
//! optional autoencoder latent, and a squeeze-excite decoder with optional
//! attention gating, recurrent merge, and deep supervision. Operators carry
//! shape inference only; kernel execution, autodiff, and training belong to
//! the external tensor engine the finished [`Model`] is handed to.

mod arg;
mod config;
mod ctx;
mod model;
mod nn;

pub mod op;

pub use ::graph::{Graph, GraphTopo, NodeRef, TopoNode};
pub use arg::Arg;
pub use config::{Config, ConfigError, ProblemType};
pub use ctx::{Context, GraphBuilder, Tensor, TensorMeta};
pub use model::{Edge, Model, Node};
pub use nn::*;
pub use op::{OpError, Operator};

/// Errors that abort a whole build. Construction is all-or-nothing: a
/// rejected configuration fails before any node exists, a graph error
/// discards everything built so far.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Graph(#[from] NNError),
}
