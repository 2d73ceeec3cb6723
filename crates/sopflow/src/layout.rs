//! Geometric layout of compiled process graphs.
//!
//! The layout stage assigns every node a size and a position and every flow
//! a routed polyline. Positions come from a breadth-first sweep that starts
//! at the start event and advances left to right; converging gateways are
//! held back until every incoming branch has reached them.
//!
//! [`Engine::apply`] mutates the graph in place and must run once per graph.

mod flow_index;
mod placement;
mod routing;

use log::{debug, info};
use thiserror::Error;

use sopflow_core::{
    geometry::{Point, Size},
    graph::{Graph, NodeKind},
    identifier::Id,
};

use crate::config::LayoutConfig;

use flow_index::FlowIndex;

/// Failures of the layout stage.
///
/// None of these are reachable from a graph produced by
/// [`compile`](crate::structure::compile); they indicate a structural defect
/// in a hand-built graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("graph has no start event to lay out from")]
    MissingStart,

    #[error("node `{0}` appears more than once")]
    DuplicateNode(Id),

    #[error("flow `{edge}` references unknown node `{node}`")]
    DanglingEdge { edge: Id, node: Id },

    #[error("converging gateway `{node}` received {arrived} of {expected} incoming branches")]
    Unconverged {
        node: Id,
        arrived: usize,
        expected: usize,
    },

    #[error("node `{0}` is not reachable from the start event")]
    Unreachable(Id),
}

/// Left-to-right layout engine for process graphs.
#[derive(Debug, Clone)]
pub struct Engine {
    horizontal_spacing: f32,
    vertical_spacing: f32,
    origin: Point,
    event_size: Size,
    gateway_size: Size,
    task_size: Size,
    alignment_epsilon: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl Engine {
    /// Create an engine with the default spacing and node sizes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine from a layout configuration section.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            horizontal_spacing: config.horizontal_spacing(),
            vertical_spacing: config.vertical_spacing(),
            origin: config.origin(),
            event_size: config.event_size(),
            gateway_size: config.gateway_size(),
            task_size: config.task_size(),
            alignment_epsilon: config.alignment_epsilon(),
        }
    }

    /// Set the distance between the centers of consecutive columns
    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the distance between the centers of sibling branch lanes
    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Set the center of the start event
    pub fn set_origin(&mut self, origin: Point) -> &mut Self {
        self.origin = origin;
        self
    }

    /// Size assigned to nodes of `kind`.
    pub fn node_size(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Start | NodeKind::End => self.event_size,
            NodeKind::DivergingGateway | NodeKind::ConvergingGateway => self.gateway_size,
            NodeKind::Task => self.task_size,
        }
    }

    /// Lay out `graph` in place.
    ///
    /// Sizes every node by kind, places node centers with the rendezvous
    /// sweep, stores top-left positions, then routes every flow.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the graph has no start event, contains
    /// duplicate or dangling ids, or if any node cannot be placed.
    pub fn apply(&self, graph: &mut Graph) -> Result<(), LayoutError> {
        debug!(
            nodes = graph.nodes().len(),
            edges = graph.edges().len();
            "Laying out process graph"
        );

        let (centers, endpoints) = {
            let index = FlowIndex::new(graph)?;
            let centers = placement::place(graph, &index, self)?;
            (centers, index.into_endpoints())
        };

        for (node, center) in graph.nodes_mut().iter_mut().zip(centers) {
            node.set_size(self.node_size(node.kind()));
            node.place_centered(center);
        }

        let routes = routing::route(graph.nodes(), &endpoints, self.alignment_epsilon);
        for (edge, waypoints) in graph.edges_mut().iter_mut().zip(routes) {
            edge.set_waypoints(waypoints);
        }

        info!(nodes = graph.nodes().len(); "Layout complete");
        Ok(())
    }

    fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    fn origin(&self) -> Point {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use sopflow_core::{
        graph::{Edge, Node},
        procedure::{Branch, Decision, Element, Procedure},
    };

    use super::*;
    use crate::structure::compile;

    fn node<'a>(graph: &'a Graph, id: &str) -> &'a Node {
        graph.node(id).expect("node exists")
    }

    fn triage() -> Procedure {
        Procedure::new("Triage")
            .with_element(Element::step("Receive email"))
            .with_element(Element::decision(
                Decision::new("Billing?")
                    .with_branch(Branch::new("Yes", vec![Element::step("Billing queue")]))
                    .with_branch(Branch::new("No", vec![Element::step("General queue")])),
            ))
            .with_element(Element::step("Acknowledge"))
    }

    #[test]
    fn test_linear_chain_advances_rightward() {
        let mut graph = compile(
            &Procedure::new("Linear")
                .with_element(Element::step("Step A"))
                .with_element(Element::step("Step B")),
        );

        Engine::new().apply(&mut graph).unwrap();

        let start = node(&graph, "StartEvent_1");
        assert_approx_eq!(f32, start.center().x(), 150.0);
        assert_approx_eq!(f32, start.center().y(), 250.0);
        assert_approx_eq!(f32, start.position().x(), 132.0);
        assert_approx_eq!(f32, start.position().y(), 232.0);
        assert_approx_eq!(f32, start.size().width(), 36.0);

        let task = node(&graph, "Task_2");
        assert_approx_eq!(f32, task.center().x(), 330.0);
        assert_approx_eq!(f32, task.position().x(), 280.0);
        assert_approx_eq!(f32, task.position().y(), 210.0);

        let end = node(&graph, "EndEvent_4");
        assert_approx_eq!(f32, end.center().x(), 690.0);
        assert_approx_eq!(f32, end.center().y(), 250.0);
    }

    #[test]
    fn test_decision_fans_out_and_rejoins() {
        let mut graph = compile(&triage());

        Engine::new().apply(&mut graph).unwrap();

        let diverging = node(&graph, "Gateway_3");
        assert_approx_eq!(f32, diverging.center().x(), 510.0);
        assert_approx_eq!(f32, diverging.size().width(), 50.0);

        let yes = node(&graph, "Task_5");
        let no = node(&graph, "Task_6");
        assert_approx_eq!(f32, yes.center().x(), 690.0);
        assert_approx_eq!(f32, yes.center().y(), 190.0);
        assert_approx_eq!(f32, no.center().y(), 310.0);

        // Arrivals land at 870; the join sits one more column right
        let converging = node(&graph, "Gateway_4");
        assert_approx_eq!(f32, converging.center().x(), 1050.0);
        assert_approx_eq!(f32, converging.center().y(), 250.0);

        assert_approx_eq!(f32, node(&graph, "Task_7").center().x(), 1230.0);
    }

    #[test]
    fn test_three_branches_are_symmetric() {
        let decision = Decision::new("Which?")
            .with_branch(Branch::new("A", vec![Element::step("a")]))
            .with_branch(Branch::new("B", vec![Element::step("b")]))
            .with_branch(Branch::new("C", vec![Element::step("c")]));
        let mut graph =
            compile(&Procedure::new("Three").with_element(Element::decision(decision)));

        Engine::new().apply(&mut graph).unwrap();

        let lanes: Vec<f32> = graph
            .nodes_of_kind(NodeKind::Task)
            .map(|task| task.center().y())
            .collect();
        assert_eq!(lanes.len(), 3);
        assert_approx_eq!(f32, lanes[0], 130.0);
        assert_approx_eq!(f32, lanes[1], 250.0);
        assert_approx_eq!(f32, lanes[2], 370.0);
    }

    #[test]
    fn test_nested_decision_joins_after_inner_gateway() {
        let urgent = Decision::new("Urgent?")
            .with_branch(Branch::new("Yes", vec![Element::step("Page on-call")]))
            .with_branch(Branch::new("No", vec![Element::step("Queue")]));
        let outage = Decision::new("Outage?")
            .with_branch(Branch::new("Confirmed", vec![Element::decision(urgent)]))
            .with_branch(Branch::new("Unconfirmed", vec![Element::step("Close")]));
        let mut graph = compile(&Procedure::new("Nested").with_element(Element::decision(outage)));

        Engine::new().apply(&mut graph).unwrap();

        let expected = [
            ("StartEvent_1", 150.0, 250.0),
            ("Gateway_2", 330.0, 250.0),
            ("Gateway_4", 510.0, 190.0),
            ("Task_8", 510.0, 310.0),
            ("Task_6", 690.0, 130.0),
            ("Task_7", 690.0, 250.0),
            // Inner join: arrivals at (870, 130) and (870, 250)
            ("Gateway_5", 1050.0, 190.0),
            // Outer join: arrivals at (690, 310) from Close and (1230, 190)
            // from the inner join, which is placed first
            ("Gateway_3", 1410.0, 250.0),
            ("EndEvent_9", 1590.0, 250.0),
        ];
        for (id, x, y) in expected {
            let center = node(&graph, id).center();
            assert_approx_eq!(f32, center.x(), x);
            assert_approx_eq!(f32, center.y(), y);
        }
    }

    #[test]
    fn test_single_branch_decision_stays_in_lane() {
        let decision = Decision::new("Escalate?")
            .with_branch(Branch::new("Yes", vec![Element::step("Escalate")]));
        let mut graph = compile(&Procedure::new("Solo").with_element(Element::decision(decision)));

        Engine::new().apply(&mut graph).unwrap();

        let expected = [
            ("StartEvent_1", 150.0),
            ("Gateway_2", 330.0),
            ("Task_4", 510.0),
            ("Gateway_3", 870.0),
            ("EndEvent_5", 1050.0),
        ];
        for (id, x) in expected {
            let center = node(&graph, id).center();
            assert_approx_eq!(f32, center.x(), x);
            assert_approx_eq!(f32, center.y(), 250.0);
        }
        assert!(graph.edges().iter().all(|edge| edge.waypoints().len() == 2));
    }

    #[test]
    fn test_custom_spacing() {
        let mut graph = compile(&Procedure::new("Short").with_element(Element::step("Only")));

        let mut engine = Engine::new();
        engine
            .set_horizontal_spacing(100.0)
            .set_origin(Point::new(50.0, 60.0));
        engine.apply(&mut graph).unwrap();

        assert_approx_eq!(f32, node(&graph, "Task_2").center().x(), 150.0);
        assert_approx_eq!(f32, node(&graph, "Task_2").center().y(), 60.0);
    }

    #[test]
    fn test_missing_start_is_error() {
        let mut graph = Graph::new(Id::new("Process_1"), "Broken");
        graph.add_node(Node::new(Id::new("Task_1"), NodeKind::Task, "Orphan"));

        assert_eq!(
            Engine::new().apply(&mut graph),
            Err(LayoutError::MissingStart)
        );
    }

    #[test]
    fn test_dangling_edge_is_error() {
        let mut graph = Graph::new(Id::new("Process_1"), "Broken");
        graph.add_node(Node::new(Id::new("StartEvent_1"), NodeKind::Start, ""));
        graph.add_edge(Edge::new(
            Id::new("Flow_1"),
            Id::new("StartEvent_1"),
            Id::new("Task_9"),
            "",
        ));

        assert_eq!(
            Engine::new().apply(&mut graph),
            Err(LayoutError::DanglingEdge {
                edge: Id::new("Flow_1"),
                node: Id::new("Task_9"),
            })
        );
    }

    #[test]
    fn test_starved_converging_gateway_is_error() {
        let mut graph = Graph::new(Id::new("Process_1"), "Broken");
        for (id, kind) in [
            ("StartEvent_1", NodeKind::Start),
            ("Task_2", NodeKind::Task),
            ("Gateway_3", NodeKind::ConvergingGateway),
        ] {
            graph.add_node(Node::new(Id::new(id), kind, ""));
        }
        // Task_2 is never reached, so its branch never arrives
        graph.add_edge(Edge::new(
            Id::new("Flow_1"),
            Id::new("StartEvent_1"),
            Id::new("Gateway_3"),
            "",
        ));
        graph.add_edge(Edge::new(
            Id::new("Flow_2"),
            Id::new("Task_2"),
            Id::new("Gateway_3"),
            "",
        ));

        assert_eq!(
            Engine::new().apply(&mut graph),
            Err(LayoutError::Unconverged {
                node: Id::new("Gateway_3"),
                arrived: 1,
                expected: 2,
            })
        );
    }
}
