//! Breadth-first node placement with converging-gateway rendezvous.
//!
//! Every node owns a [`Slot`] describing how far its placement has
//! progressed. Ordinary nodes go straight from `Open` to `Placed` the first
//! time they are reached. Converging gateways start `Pending` with the
//! number of incoming flows they must wait for; each arrival is recorded,
//! and only the final one moves the gateway to `Ready` at its joined
//! position, after which it is placed and traversal continues from it.

use std::collections::VecDeque;

use log::trace;

use sopflow_core::{
    geometry::Point,
    graph::{Graph, NodeKind},
};

use super::{Engine, LayoutError, flow_index::FlowIndex};

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Open,
    Pending { arrivals: Vec<Point>, expected: usize },
    Ready(Point),
    Placed(Point),
}

impl Slot {
    fn new(kind: NodeKind, incoming: usize) -> Self {
        if kind == NodeKind::ConvergingGateway {
            Self::Pending {
                arrivals: Vec::with_capacity(incoming),
                expected: incoming,
            }
        } else {
            Self::Open
        }
    }

    /// Records a traversal reaching this node at `target`.
    ///
    /// Returns the center to place the node at once it is ready, or `None`
    /// while a converging gateway is still waiting or the node is already
    /// placed.
    fn arrive(&mut self, target: Point, horizontal_spacing: f32) -> Option<Point> {
        match self {
            Self::Placed(_) => None,
            Self::Open => {
                *self = Self::Ready(target);
                Some(target)
            }
            Self::Pending { arrivals, expected } => {
                arrivals.push(target);
                if arrivals.len() < *expected {
                    return None;
                }
                let center = join(arrivals, horizontal_spacing);
                *self = Self::Ready(center);
                Some(center)
            }
            Self::Ready(center) => Some(*center),
        }
    }
}

/// Join position of a converging gateway: one column right of the rightmost
/// arrival, vertically centered on the arrivals.
fn join(arrivals: &[Point], horizontal_spacing: f32) -> Point {
    let max_x = arrivals
        .iter()
        .map(|point| point.x())
        .fold(f32::NEG_INFINITY, f32::max);
    let mean_y = arrivals.iter().map(|point| point.y()).sum::<f32>() / arrivals.len() as f32;
    Point::new(max_x + horizontal_spacing, mean_y)
}

/// Computes the center of every node of `graph`, in node order.
pub(super) fn place(
    graph: &Graph,
    index: &FlowIndex<'_>,
    engine: &Engine,
) -> Result<Vec<Point>, LayoutError> {
    let start = graph
        .start_node()
        .and_then(|node| index.node_index(node.id().as_str()))
        .ok_or(LayoutError::MissingStart)?;

    let nodes = graph.nodes();
    let mut slots: Vec<Slot> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| Slot::new(node.kind(), index.incoming_count(idx)))
        .collect();

    let step_x = engine.horizontal_spacing();
    let step_y = engine.vertical_spacing();

    let mut queue = VecDeque::from([(start, engine.origin())]);
    while let Some((node_idx, target)) = queue.pop_front() {
        let Some(center) = slots[node_idx].arrive(target, step_x) else {
            trace!(node:% = nodes[node_idx].id(); "Arrival recorded, not placed");
            continue;
        };
        slots[node_idx] = Slot::Placed(center);
        trace!(
            node:% = nodes[node_idx].id(),
            x = center.x(),
            y = center.y();
            "Node placed"
        );

        let successors = index.successors(node_idx);
        let fan_out = successors.len();
        if nodes[node_idx].kind() == NodeKind::DivergingGateway && fan_out > 1 {
            let middle = (fan_out - 1) as f32 / 2.0;
            for (lane, successor) in successors.enumerate() {
                let dy = (lane as f32 - middle) * step_y;
                queue.push_back((successor, center.offset(step_x, dy)));
            }
        } else {
            for successor in successors {
                queue.push_back((successor, center.offset(step_x, 0.0)));
            }
        }
    }

    settle(graph, slots)
}

/// Unwraps the final slots into centers, failing on any unplaced node.
fn settle(graph: &Graph, slots: Vec<Slot>) -> Result<Vec<Point>, LayoutError> {
    // Starved gateways are reported before unreachable nodes.
    for (node, slot) in graph.nodes().iter().zip(&slots) {
        if let Slot::Pending { arrivals, expected } = slot {
            return Err(LayoutError::Unconverged {
                node: node.id().clone(),
                arrived: arrivals.len(),
                expected: *expected,
            });
        }
    }

    graph
        .nodes()
        .iter()
        .zip(slots)
        .map(|(node, slot)| match slot {
            Slot::Placed(center) => Ok(center),
            _ => Err(LayoutError::Unreachable(node.id().clone())),
        })
        .collect()
}
