mod topo;

pub use topo::{GraphTopo, NodeRef, TopoNode};

/// A connected DAG: topology plus per-node and per-edge payloads.
#[derive(Clone, Debug)]
pub struct Graph<N, E> {
    pub topo: GraphTopo,
    pub nodes: Box<[N]>,
    pub edges: Box<[E]>,
}
