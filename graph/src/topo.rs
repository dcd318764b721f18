use std::ops::Range;

/// Compact topology of a connected DAG.
///
/// Edge indices follow construction order: the global inputs occupy
/// `0..n_inputs`, then every node's outputs in topological order.
/// `connections` stores the global output edges first, followed by each
/// node's input edges.
#[derive(Clone, Debug)]
pub struct GraphTopo {
    n_inputs: usize,
    n_outputs: usize,
    connections: Box<[usize]>,
    nodes: Box<[TopoNode]>,
}

#[derive(Clone, Copy, Debug)]
pub struct TopoNode {
    pub n_inputs: usize,
    pub n_outputs: usize,
}

/// One node during topology traversal.
pub struct NodeRef<'a> {
    pub idx: usize,
    pub inputs: &'a [usize],
    pub outputs: Range<usize>,
}

impl GraphTopo {
    pub fn from_raw_parts(
        n_inputs: usize,
        n_outputs: usize,
        connections: Box<[usize]>,
        nodes: Box<[TopoNode]>,
    ) -> Self {
        let n_connections = n_outputs + nodes.iter().map(|n| n.n_inputs).sum::<usize>();
        assert_eq!(connections.len(), n_connections);
        let ans = Self {
            n_inputs,
            n_outputs,
            connections,
            nodes,
        };
        let n_edges = ans.n_edges();
        assert!(ans.connections.iter().all(|&e| e < n_edges));
        ans
    }

    #[inline]
    pub const fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    #[inline]
    pub const fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    #[inline]
    pub const fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn n_edges(&self) -> usize {
        self.n_inputs + self.nodes.iter().map(|n| n.n_outputs).sum::<usize>()
    }

    #[inline]
    pub fn global_inputs(&self) -> Range<usize> {
        0..self.n_inputs
    }

    #[inline]
    pub fn global_outputs(&self) -> &[usize] {
        &self.connections[..self.n_outputs]
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            topo: self,
            node: 0,
            cursor: self.n_outputs,
            edge: self.n_inputs,
        }
    }
}

impl<'a> IntoIterator for &'a GraphTopo {
    type Item = NodeRef<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    topo: &'a GraphTopo,
    /// next node index
    node: usize,
    /// position in `connections`
    cursor: usize,
    /// next unassigned edge index
    edge: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let &TopoNode {
            n_inputs,
            n_outputs,
        } = self.topo.nodes.get(self.node)?;
        let idx = self.node;
        let inputs = &self.topo.connections[self.cursor..][..n_inputs];
        let outputs = self.edge..self.edge + n_outputs;
        self.node += 1;
        self.cursor += n_inputs;
        self.edge += n_outputs;
        Some(NodeRef {
            idx,
            inputs,
            outputs,
        })
    }
}
