//! The process graph: typed nodes joined by labeled sequence flows.
//!
//! A [`Graph`] is created in one pass by the graph compiler, enriched in
//! place with geometry by the layout engine, and finally read by the diagram
//! serializer. Nodes and edges are kept in creation order; that order is
//! observable in the serialized output.
//!
//! # Invariants
//!
//! A well-formed graph satisfies the following, checked by [`Graph::validate`]:
//! - node ids and edge ids are unique
//! - every edge references existing source and target nodes
//! - exactly one [`NodeKind::Start`] and one [`NodeKind::End`] node
//! - every non-start node has an incoming edge, every non-end node an outgoing edge

use std::collections::HashSet;

use log::trace;
use thiserror::Error;

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

/// The kind of a process graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Start,
    End,
    Task,
    /// Control flow splits into mutually exclusive branches.
    DivergingGateway,
    /// Previously split branches rejoin.
    ConvergingGateway,
}

impl NodeKind {
    /// Prefix used when minting ids for nodes of this kind.
    ///
    /// Both gateway kinds share the `Gateway` prefix; their counters keep
    /// the ids distinct.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Start => "StartEvent",
            Self::End => "EndEvent",
            Self::Task => "Task",
            Self::DivergingGateway | Self::ConvergingGateway => "Gateway",
        }
    }
}

/// A node of the process graph.
///
/// Geometry is zero until the layout engine runs. The stored position is the
/// top-left corner of the node's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    kind: NodeKind,
    label: String,
    position: Point,
    size: Size,
}

impl Node {
    /// Creates an unplaced node.
    pub fn new(id: Id, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            position: Point::default(),
            size: Size::default(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Label of the node; may be empty.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Top-left corner of the node's bounding box.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Bounding box of the node.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }

    /// Center of the node's bounding box.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Positions the node so that its bounding box is centered on `center`.
    ///
    /// The size must be assigned first.
    pub fn place_centered(&mut self, center: Point) {
        self.position = Bounds::new_from_center(center, self.size).min_point();
    }
}

/// A directed sequence flow between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: Id,
    source: Id,
    target: Id,
    label: String,
    waypoints: Vec<Point>,
}

impl Edge {
    /// Creates an unrouted edge.
    pub fn new(id: Id, source: Id, target: Id, label: impl Into<String>) -> Self {
        Self {
            id,
            source,
            target,
            label: label.into(),
            waypoints: Vec::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn source(&self) -> &Id {
        &self.source
    }

    pub fn target(&self) -> &Id {
        &self.target
    }

    /// Condition label of the flow; empty for unconditional flows.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Routing polyline; empty until layout.
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn set_waypoints(&mut self, waypoints: Vec<Point>) {
        self.waypoints = waypoints;
    }
}

/// Violations of the structural invariants of a [`Graph`].
///
/// These are only reachable through a defect in the code that built the
/// graph, never through user input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("duplicate node id `{0}`")]
    DuplicateNode(Id),

    #[error("duplicate flow id `{0}`")]
    DuplicateEdge(Id),

    #[error("flow `{edge}` references unknown node `{node}`")]
    DanglingEdge { edge: Id, node: Id },

    #[error("expected exactly one {kind:?} node, found {count}")]
    EventCount { kind: NodeKind, count: usize },

    #[error("node `{0}` has no incoming flow")]
    NoIncoming(Id),

    #[error("node `{0}` has no outgoing flow")]
    NoOutgoing(Id),
}

/// A process graph with insertion-ordered nodes and edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    id: Id,
    name: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    /// The start event, if the graph has one.
    pub fn start_node(&self) -> Option<&Node> {
        self.first_of_kind(NodeKind::Start)
    }

    /// Returns the first node of the given kind.
    pub fn first_of_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.nodes.iter().find(|node| node.kind == kind)
    }

    /// Returns an iterator over the nodes of the given kind, in creation order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    /// Edges whose target is `id`, in edge order.
    pub fn incoming_edges<'a>(&'a self, id: &'a Id) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |edge| edge.target == *id)
    }

    /// Edges whose source is `id`, in edge order.
    pub fn outgoing_edges<'a>(&'a self, id: &'a Id) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |edge| edge.source == *id)
    }

    /// Checks the structural invariants listed in the [module documentation](self).
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`GraphError`].
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        let mut has_incoming = HashSet::new();
        let mut has_outgoing = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(GraphError::DuplicateEdge(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            has_outgoing.insert(&edge.source);
            has_incoming.insert(&edge.target);
        }

        for kind in [NodeKind::Start, NodeKind::End] {
            let count = self.nodes_of_kind(kind).count();
            if count != 1 {
                return Err(GraphError::EventCount { kind, count });
            }
        }

        for node in &self.nodes {
            if node.kind != NodeKind::Start && !has_incoming.contains(&node.id) {
                return Err(GraphError::NoIncoming(node.id.clone()));
            }
            if node.kind != NodeKind::End && !has_outgoing.contains(&node.id) {
                return Err(GraphError::NoOutgoing(node.id.clone()));
            }
        }

        trace!(
            nodes = self.nodes.len(),
            edges = self.edges.len();
            "Graph invariants hold"
        );
        Ok(())
    }
}
