use crate::{Arg, TensorMeta};
use graph::Graph;
use itertools::Itertools;
use patricia_tree::PatriciaMap;
use std::fmt::Write as _;

/// The terminal build artifact: a sealed graph binding one input edge to
/// one or more ordered output edges. Immutable; ready for hand-off to the
/// external engine's compile/train entry point.
#[derive(Clone, Debug)]
pub struct Model(pub Graph<Node, Edge>);

/// One operator node: hierarchical path, op name and scalar args.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub op: String,
    pub arg: Option<Arg>,
}

/// One tensor edge.
#[derive(Clone, Debug)]
pub struct Edge {
    pub name: String,
    pub meta: TensorMeta,
}

impl Model {
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.0.nodes.len()
    }

    #[inline]
    pub fn n_edges(&self) -> usize {
        self.0.edges.len()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Edge> {
        self.0.topo.global_inputs().map(|i| &self.0.edges[i])
    }

    /// Output edges in emission order (for deep supervision: final
    /// full-resolution output first, then shallowest to deepest
    /// auxiliary).
    pub fn outputs(&self) -> impl Iterator<Item = &Edge> {
        self.0.topo.global_outputs().iter().map(|&i| &self.0.edges[i])
    }

    pub fn output_metas(&self) -> Vec<TensorMeta> {
        self.outputs().map(|e| e.meta.clone()).collect()
    }

    /// Node paths are unique; a patricia trie over them answers prefix
    /// queries.
    pub fn node_index(&self) -> PatriciaMap<usize> {
        let mut map = PatriciaMap::new();
        for (i, node) in self.0.nodes.iter().enumerate() {
            assert!(map.insert(node.name.as_str(), i).is_none());
        }
        map
    }

    /// Nodes whose hierarchical path starts with `prefix`, in path order.
    pub fn nodes_with_prefix<'a>(
        &'a self,
        prefix: &str,
    ) -> impl Iterator<Item = (String, &'a Node)> + use<'a> {
        self.node_index()
            .iter_prefix(prefix.as_bytes())
            .map(|(path, &i)| (String::from_utf8_lossy(&path).into_owned(), &self.0.nodes[i]))
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Human-readable per-node listing with output shapes.
    pub fn summary(&self) -> String {
        let mut ans = String::new();
        for edge in self.inputs() {
            let _ = writeln!(
                ans,
                "input  {} {:?}",
                edge.name,
                edge.meta.shape(),
            );
        }
        for (topo, node) in self.0.topo.iter().zip(&self.0.nodes) {
            let shapes = topo
                .outputs
                .clone()
                .map(|i| format!("{:?}", self.0.edges[i].meta.shape()))
                .join(" ");
            let _ = writeln!(ans, "{:<16} {} {shapes}", node.op, node.name);
        }
        let _ = writeln!(
            ans,
            "output {}",
            self.outputs().map(|e| &e.name).join(" "),
        );
        let _ = writeln!(
            ans,
            "{} nodes, {} edges",
            self.n_nodes(),
            self.n_edges(),
        );
        ans
    }
}
