//! Recursive tree-to-graph compiler.
//!
//! Compilation threads a cursor (the id of the most recently emitted node)
//! through the element sequence. Each element extends the graph from the
//! cursor and returns the new cursor; a decision returns its converging
//! gateway, so nested decisions compose without any shared parent state.

use log::{debug, trace};

use sopflow_core::{
    graph::{Edge, Graph, Node, NodeKind},
    identifier::Id,
    procedure::{Decision, Element, Procedure},
};

/// Id of the single process element emitted per document.
pub const PROCESS_ID: &str = "Process_1";

/// Compiles a procedure tree into an unplaced process graph.
///
/// The graph starts with a start event labeled `"<title> Started"` and ends
/// with an end event labeled `"<title> Completed"`. Node ids are
/// `<Prefix>_<n>` from one node counter, flow ids are `Flow_<n>` from a
/// separate counter; both start at 1 for every call.
///
/// # Examples
///
/// ```
/// use sopflow::structure::compile;
/// use sopflow::procedure::{Element, Procedure};
///
/// let procedure = Procedure::new("Onboarding")
///     .with_element(Element::step("Create account"))
///     .with_element(Element::step("Send welcome pack"));
///
/// let graph = compile(&procedure);
/// assert_eq!(graph.nodes().len(), 4);
/// assert_eq!(graph.edges().len(), 3);
/// assert_eq!(graph.nodes()[0].label(), "Onboarding Started");
/// ```
pub fn compile(procedure: &Procedure) -> Graph {
    let title = procedure.title();
    let mut ctx = CompileContext::new(Graph::new(Id::new(PROCESS_ID), title));

    let start = ctx.add_node(NodeKind::Start, format!("{title} Started"));
    let cursor = compile_sequence(&mut ctx, procedure.elements(), start, "");
    let end = ctx.add_node(NodeKind::End, format!("{title} Completed"));
    ctx.add_edge(cursor, end, "");

    let graph = ctx.finish();
    debug!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len();
        "Procedure compiled"
    );
    graph
}

/// The graph under construction plus the id counters of one compilation run.
struct CompileContext {
    graph: Graph,
    node_counter: usize,
    edge_counter: usize,
}

impl CompileContext {
    fn new(graph: Graph) -> Self {
        Self {
            graph,
            node_counter: 0,
            edge_counter: 0,
        }
    }

    fn add_node(&mut self, kind: NodeKind, label: impl Into<String>) -> Id {
        self.node_counter += 1;
        let id = Id::numbered(kind.id_prefix(), self.node_counter);
        trace!(id:% = id, kind:?; "Node emitted");
        self.graph.add_node(Node::new(id.clone(), kind, label));
        id
    }

    fn add_edge(&mut self, source: Id, target: Id, label: &str) {
        self.edge_counter += 1;
        let id = Id::numbered("Flow", self.edge_counter);
        trace!(id:% = id, source:% = source, target:% = target; "Flow emitted");
        self.graph.add_edge(Edge::new(id, source, target, label));
    }

    fn finish(self) -> Graph {
        self.graph
    }
}

/// Emits `elements` in order starting from `cursor`.
///
/// `entry_label` is put on the first flow emitted for the sequence (the flow
/// entering its first task or first diverging gateway) and on no other.
/// Returns the cursor after the last element.
fn compile_sequence(
    ctx: &mut CompileContext,
    elements: &[Element],
    mut cursor: Id,
    entry_label: &str,
) -> Id {
    let mut label = entry_label;
    for element in elements {
        cursor = compile_element(ctx, element, cursor, label);
        label = "";
    }
    cursor
}

fn compile_element(ctx: &mut CompileContext, element: &Element, cursor: Id, label: &str) -> Id {
    match element {
        Element::Step { text } => {
            let task = ctx.add_node(NodeKind::Task, text.as_str());
            ctx.add_edge(cursor, task.clone(), label);
            task
        }
        Element::Decision(decision) => compile_decision(ctx, decision, cursor, label),
    }
}

/// Emits a gateway pair with one path per branch; returns the converging gateway.
fn compile_decision(
    ctx: &mut CompileContext,
    decision: &Decision,
    cursor: Id,
    entry_label: &str,
) -> Id {
    let diverging = ctx.add_node(NodeKind::DivergingGateway, decision.question());
    ctx.add_edge(cursor, diverging.clone(), entry_label);
    let converging = ctx.add_node(NodeKind::ConvergingGateway, "");

    if decision.branches().is_empty() {
        ctx.add_edge(diverging, converging.clone(), "");
        return converging;
    }

    for branch in decision.branches() {
        if branch.steps().is_empty() {
            ctx.add_edge(
                diverging.clone(),
                converging.clone(),
                branch.condition_label(),
            );
            continue;
        }

        let exit = compile_sequence(
            ctx,
            branch.steps(),
            diverging.clone(),
            branch.condition_label(),
        );
        ctx.add_edge(exit, converging.clone(), "");
    }

    converging
}
