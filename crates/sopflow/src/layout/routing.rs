//! Orthogonal flow routing between placed nodes.

use sopflow_core::{geometry::Point, graph::Node};

/// Routes every flow from its source's right-center to its target's
/// left-center.
///
/// `endpoints` holds the source and target node indices of each flow, in
/// flow order; the result has one polyline per flow in the same order.
pub(super) fn route(nodes: &[Node], endpoints: &[(usize, usize)], epsilon: f32) -> Vec<Vec<Point>> {
    endpoints
        .iter()
        .map(|&(source, target)| {
            let exit = nodes[source].bounds().right_center();
            let entry = nodes[target].bounds().left_center();
            polyline(exit, entry, epsilon)
        })
        .collect()
}

/// Straight segment when `exit` and `entry` share a lane, otherwise a Z
/// with a single vertical jog at the horizontal midpoint.
fn polyline(exit: Point, entry: Point, epsilon: f32) -> Vec<Point> {
    if (exit.y() - entry.y()).abs() < epsilon {
        return vec![exit, entry];
    }

    let mid_x = exit.midpoint(entry).x();
    vec![exit, exit.with_x(mid_x), entry.with_x(mid_x), entry]
}
