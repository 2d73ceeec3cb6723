//! BPMN 2.0 XML exporter.
//!
//! The document has two sections. The semantic section holds one
//! `bpmn:process` with an element per node and a `bpmn:sequenceFlow` per
//! flow; the diagram section holds one `bpmndi:BPMNShape` per node and one
//! `bpmndi:BPMNEdge` per flow. Both follow graph order, and every coordinate
//! is written as an integer truncated toward zero.

use std::io::Write;

use indexmap::IndexMap;
use log::{debug, trace};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use sopflow_core::{
    geometry::Point,
    graph::{Edge, Graph, Node, NodeKind},
    identifier::Id,
};

use super::{Error, Exporter};

pub const MODEL_NAMESPACE: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
pub const BPMNDI_NAMESPACE: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
pub const DC_NAMESPACE: &str = "http://www.omg.org/spec/DD/20100524/DC";
pub const DI_NAMESPACE: &str = "http://www.omg.org/spec/DD/20100524/DI";

const DEFINITIONS_ID: &str = "Definitions_1";
const TARGET_NAMESPACE: &str = "http://bpmn.io/schema/bpmn";
const EXPORTER_NAME: &str = "SOP to BPMN Converter";
const EXPORTER_VERSION: &str = "1.0.0";
const DIAGRAM_ID: &str = "BPMNDiagram_1";
const PLANE_ID: &str = "BPMNPlane_1";

/// Serializes a laid-out graph into an in-memory BPMN document.
///
/// # Errors
///
/// Returns [`Error::DanglingEdge`] if a flow references a node that is not
/// part of the graph.
pub fn serialize(graph: &Graph) -> Result<Vec<u8>, Error> {
    let mut exporter = BpmnExporter::new(Vec::new());
    exporter.export_graph(graph)?;
    Ok(exporter.into_inner())
}

/// Writes BPMN 2.0 XML into any [`Write`] sink, indented by two spaces.
pub struct BpmnExporter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> BpmnExporter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
        }
    }

    /// Consumes the exporter, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.writer
            .write_event(event)
            .map_err(|err| Error::Write(err.to_string()))
    }

    fn open(&mut self, element: BytesStart<'_>) -> Result<(), Error> {
        self.emit(Event::Start(element))
    }

    fn close(&mut self, name: &str) -> Result<(), Error> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), Error> {
        self.open(BytesStart::new(name))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn write_node(&mut self, node: &Node, refs: &FlowRefs<'_>) -> Result<(), Error> {
        let tag = semantic_tag(node.kind());
        let mut element = BytesStart::new(tag);
        element.push_attribute(("id", node.id().as_str()));
        if !node.label().is_empty() {
            element.push_attribute(("name", node.label()));
        }
        self.open(element)?;
        for flow in &refs.incoming {
            self.text_element("bpmn:incoming", flow)?;
        }
        for flow in &refs.outgoing {
            self.text_element("bpmn:outgoing", flow)?;
        }
        self.close(tag)
    }

    fn write_sequence_flow(&mut self, edge: &Edge) -> Result<(), Error> {
        let mut element = BytesStart::new("bpmn:sequenceFlow").with_attributes([
            ("id", edge.id().as_str()),
            ("sourceRef", edge.source().as_str()),
            ("targetRef", edge.target().as_str()),
        ]);
        if !edge.label().is_empty() {
            element.push_attribute(("name", edge.label()));
        }
        self.emit(Event::Empty(element))
    }

    fn write_shape(&mut self, node: &Node) -> Result<(), Error> {
        let shape_id = node.id().with_suffix("di");
        self.open(BytesStart::new("bpmndi:BPMNShape").with_attributes([
            ("id", shape_id.as_str()),
            ("bpmnElement", node.id().as_str()),
        ]))?;

        let bounds = node.bounds();
        let (x, y) = (coordinate(bounds.min_x()), coordinate(bounds.min_y()));
        let (width, height) = (coordinate(bounds.width()), coordinate(bounds.height()));
        self.emit(Event::Empty(BytesStart::new("dc:Bounds").with_attributes([
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
        ])))?;

        self.close("bpmndi:BPMNShape")
    }

    fn write_edge(&mut self, edge: &Edge) -> Result<(), Error> {
        let edge_id = edge.id().with_suffix("di");
        self.open(BytesStart::new("bpmndi:BPMNEdge").with_attributes([
            ("id", edge_id.as_str()),
            ("bpmnElement", edge.id().as_str()),
        ]))?;
        for &waypoint in edge.waypoints() {
            self.write_waypoint(waypoint)?;
        }
        self.close("bpmndi:BPMNEdge")
    }

    fn write_waypoint(&mut self, point: Point) -> Result<(), Error> {
        let (x, y) = (coordinate(point.x()), coordinate(point.y()));
        self.emit(Event::Empty(
            BytesStart::new("di:waypoint").with_attributes([("x", x.as_str()), ("y", y.as_str())]),
        ))
    }
}

impl<W: Write> Exporter for BpmnExporter<W> {
    fn export_graph(&mut self, graph: &Graph) -> Result<(), Error> {
        debug!(process:% = graph.id(), nodes = graph.nodes().len(); "Exporting BPMN");
        let refs = collect_flow_refs(graph)?;

        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.open(BytesStart::new("bpmn:definitions").with_attributes([
            ("xmlns:bpmn", MODEL_NAMESPACE),
            ("xmlns:bpmndi", BPMNDI_NAMESPACE),
            ("xmlns:dc", DC_NAMESPACE),
            ("xmlns:di", DI_NAMESPACE),
            ("id", DEFINITIONS_ID),
            ("targetNamespace", TARGET_NAMESPACE),
            ("exporter", EXPORTER_NAME),
            ("exporterVersion", EXPORTER_VERSION),
        ]))?;

        self.open(BytesStart::new("bpmn:process").with_attributes([
            ("id", graph.id().as_str()),
            ("name", graph.name()),
            ("isExecutable", "true"),
        ]))?;
        for node in graph.nodes() {
            trace!(node:% = node.id(); "Writing semantic element");
            self.write_node(node, &refs[node.id().as_str()])?;
        }
        for edge in graph.edges() {
            self.write_sequence_flow(edge)?;
        }
        self.close("bpmn:process")?;

        self.open(BytesStart::new("bpmndi:BPMNDiagram").with_attributes([("id", DIAGRAM_ID)]))?;
        self.open(BytesStart::new("bpmndi:BPMNPlane").with_attributes([
            ("id", PLANE_ID),
            ("bpmnElement", graph.id().as_str()),
        ]))?;
        for node in graph.nodes() {
            self.write_shape(node)?;
        }
        for edge in graph.edges() {
            self.write_edge(edge)?;
        }
        self.close("bpmndi:BPMNPlane")?;
        self.close("bpmndi:BPMNDiagram")?;

        self.close("bpmn:definitions")
    }
}

/// Flow ids touching one node, each list in graph edge order.
#[derive(Debug, Default)]
struct FlowRefs<'a> {
    incoming: Vec<&'a str>,
    outgoing: Vec<&'a str>,
}

/// Builds the per-node flow references, keyed and ordered by node.
fn collect_flow_refs(graph: &Graph) -> Result<IndexMap<&str, FlowRefs<'_>>, Error> {
    let mut refs: IndexMap<&str, FlowRefs<'_>> = graph
        .nodes()
        .iter()
        .map(|node| (node.id().as_str(), FlowRefs::default()))
        .collect();

    for edge in graph.edges() {
        let dangling = |node: &Id| Error::DanglingEdge {
            edge: edge.id().clone(),
            node: node.clone(),
        };
        refs.get_mut(edge.source().as_str())
            .ok_or_else(|| dangling(edge.source()))?
            .outgoing
            .push(edge.id().as_str());
        refs.get_mut(edge.target().as_str())
            .ok_or_else(|| dangling(edge.target()))?
            .incoming
            .push(edge.id().as_str());
    }

    Ok(refs)
}

/// Semantic element name for a node kind.
fn semantic_tag(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Start => "bpmn:startEvent",
        NodeKind::End => "bpmn:endEvent",
        NodeKind::Task => "bpmn:task",
        NodeKind::DivergingGateway | NodeKind::ConvergingGateway => "bpmn:exclusiveGateway",
    }
}

/// Integer rendering of a coordinate, truncated toward zero.
fn coordinate(value: f32) -> String {
    (value as i64).to_string()
}

#[cfg(test)]
mod tests {
    use sopflow_core::geometry::Size;

    use super::*;

    fn two_node_graph() -> Graph {
        let mut graph = Graph::new(Id::new("Process_1"), "Tiny");
        let mut start = Node::new(Id::new("StartEvent_1"), NodeKind::Start, "Tiny Started");
        start.set_size(Size::square(36.0));
        start.place_centered(Point::new(150.0, 250.0));
        let mut end = Node::new(Id::new("EndEvent_2"), NodeKind::End, "");
        end.set_size(Size::square(36.0));
        end.place_centered(Point::new(330.5, 250.0));
        graph.add_node(start);
        graph.add_node(end);

        let mut flow = Edge::new(
            Id::new("Flow_1"),
            Id::new("StartEvent_1"),
            Id::new("EndEvent_2"),
            "",
        );
        flow.set_waypoints(vec![Point::new(168.0, 250.0), Point::new(312.9, 250.0)]);
        graph.add_edge(flow);
        graph
    }

    fn render(graph: &Graph) -> String {
        String::from_utf8(serialize(graph).unwrap()).unwrap()
    }

    #[test]
    fn test_document_prologue() {
        let xml = render(&two_node_graph());

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL""#));
        assert!(xml.contains(r#"exporter="SOP to BPMN Converter""#));
        assert!(xml.contains(r#"<bpmn:process id="Process_1" name="Tiny" isExecutable="true">"#));
    }

    #[test]
    fn test_semantic_elements() {
        let xml = render(&two_node_graph());

        assert!(xml.contains(r#"<bpmn:startEvent id="StartEvent_1" name="Tiny Started">"#));
        // Empty labels are omitted
        assert!(xml.contains(r#"<bpmn:endEvent id="EndEvent_2">"#));
        assert!(xml.contains("<bpmn:outgoing>Flow_1</bpmn:outgoing>"));
        assert!(xml.contains("<bpmn:incoming>Flow_1</bpmn:incoming>"));
        assert!(xml.contains(
            r#"<bpmn:sequenceFlow id="Flow_1" sourceRef="StartEvent_1" targetRef="EndEvent_2"/>"#
        ));
    }

    #[test]
    fn test_diagram_coordinates_are_truncated() {
        let xml = render(&two_node_graph());

        assert!(xml.contains(r#"<bpmndi:BPMNShape id="StartEvent_1_di" bpmnElement="StartEvent_1">"#));
        assert!(xml.contains(r#"<dc:Bounds x="132" y="232" width="36" height="36"/>"#));
        // 330.5 - 18 = 312.5
        assert!(xml.contains(r#"<dc:Bounds x="312" y="232" width="36" height="36"/>"#));
        assert!(xml.contains(r#"<di:waypoint x="312" y="250"/>"#));
        assert!(xml.contains(r#"<bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="Process_1">"#));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut graph = two_node_graph();
        graph.add_node(Node::new(Id::new("Task_3"), NodeKind::Task, "Check <R&D> \"docs\""));

        let xml = render(&graph);

        assert!(xml.contains("Check &lt;R&amp;D&gt;"));
        assert!(!xml.contains("<R&D>"));
    }

    #[test]
    fn test_dangling_flow_is_error() {
        let mut graph = two_node_graph();
        graph.add_edge(Edge::new(
            Id::new("Flow_2"),
            Id::new("EndEvent_2"),
            Id::new("Task_404"),
            "",
        ));

        let err = serialize(&graph).unwrap_err();

        assert!(matches!(
            err,
            Error::DanglingEdge { ref edge, ref node } if edge == "Flow_2" && node == "Task_404"
        ));
    }

    #[test]
    fn test_coordinate_truncates_toward_zero() {
        assert_eq!(coordinate(12.9), "12");
        assert_eq!(coordinate(-12.9), "-12");
        assert_eq!(coordinate(0.0), "0");
    }
}
