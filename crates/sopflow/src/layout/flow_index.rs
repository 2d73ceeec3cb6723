//! Adjacency index over a process graph.
//!
//! [`FlowIndex`] maps node ids to dense indices and records, per node, the
//! incoming and outgoing flows in the order they appear in the graph's edge
//! sequence. Traversals driven by this index are therefore fully determined
//! by graph order.

use indexmap::IndexSet;

use sopflow_core::{graph::Graph, identifier::Id};

use super::LayoutError;

/// Dense, order-preserving adjacency of a [`Graph`].
#[derive(Debug)]
pub(super) struct FlowIndex<'a> {
    nodes: IndexSet<&'a str>,
    endpoints: Vec<(usize, usize)>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
}

impl<'a> FlowIndex<'a> {
    /// Indexes every node and flow of `graph`.
    ///
    /// # Errors
    ///
    /// Fails on a repeated node id or a flow whose source or target is not
    /// a node of the graph.
    pub(super) fn new(graph: &'a Graph) -> Result<Self, LayoutError> {
        let mut nodes = IndexSet::with_capacity(graph.nodes().len());
        for node in graph.nodes() {
            if !nodes.insert(node.id().as_str()) {
                return Err(LayoutError::DuplicateNode(node.id().clone()));
            }
        }

        let mut incoming = vec![Vec::new(); nodes.len()];
        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut endpoints = Vec::with_capacity(graph.edges().len());

        for (edge_idx, edge) in graph.edges().iter().enumerate() {
            let lookup = |id: &Id| {
                nodes
                    .get_index_of(id.as_str())
                    .ok_or_else(|| LayoutError::DanglingEdge {
                        edge: edge.id().clone(),
                        node: id.clone(),
                    })
            };
            let source = lookup(edge.source())?;
            let target = lookup(edge.target())?;

            outgoing[source].push(edge_idx);
            incoming[target].push(edge_idx);
            endpoints.push((source, target));
        }

        Ok(Self {
            nodes,
            endpoints,
            incoming,
            outgoing,
        })
    }

    /// Dense index of the node with `id`.
    pub(super) fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Source and target node indices of every flow, in flow order.
    pub(super) fn into_endpoints(self) -> Vec<(usize, usize)> {
        self.endpoints
    }

    pub(super) fn incoming_count(&self, node_idx: usize) -> usize {
        self.incoming[node_idx].len()
    }

    /// Target node indices of `node_idx`'s outgoing flows, in flow order.
    pub(super) fn successors(&self, node_idx: usize) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.outgoing[node_idx]
            .iter()
            .map(|&edge_idx| self.endpoints[edge_idx].1)
    }
}
