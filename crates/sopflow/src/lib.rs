//! Sopflow - compile standard operating procedures into BPMN 2.0 diagrams.
//!
//! A procedure is a tree of steps and decisions, usually produced by an
//! upstream analysis service as JSON. Sopflow compiles the tree into a
//! process graph, lays the graph out left to right, and serializes it as a
//! BPMN 2.0 document that diagram viewers can open directly.

pub mod config;
pub mod export;
pub mod layout;
pub mod structure;

mod error;

pub use sopflow_core::{geometry, graph, identifier, procedure};

pub use error::SopflowError;

use log::{debug, info, trace};

use config::AppConfig;
use graph::Graph;
use procedure::Procedure;

/// Builder for turning analysis documents into BPMN diagrams.
///
/// The pipeline has three stages: [`parse`](Self::parse) decodes the
/// analysis reply, [`build_graph`](Self::build_graph) compiles and lays out
/// the process graph, and [`render_bpmn`](Self::render_bpmn) runs the whole
/// tree-to-document path.
///
/// # Examples
///
/// ```rust
/// use sopflow::{ProcessBuilder, config::AppConfig};
///
/// let source = r#"{
///     "title": "Refund",
///     "elements": [{"type": "step", "text": "Issue refund"}]
/// }"#;
///
/// let builder = ProcessBuilder::new(AppConfig::default());
///
/// let procedure = builder.parse(source).expect("Failed to parse");
/// let xml = builder.render_bpmn(&procedure).expect("Failed to render");
///
/// assert!(xml.contains("<bpmn:task id=\"Task_2\" name=\"Issue refund\">"));
/// ```
#[derive(Default)]
pub struct ProcessBuilder {
    config: AppConfig,
}

impl ProcessBuilder {
    /// Create a new process builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse an analysis reply into a procedure tree.
    ///
    /// A Markdown code fence around the JSON is tolerated and removed.
    ///
    /// # Errors
    ///
    /// Returns `SopflowError::Parse` with every diagnostic found and the
    /// decoded text for snippet rendering.
    pub fn parse(&self, source: &str) -> Result<Procedure, SopflowError> {
        info!("Parsing analysis document");

        let json = sopflow_parser::strip_code_fences(source);
        let procedure = sopflow_parser::parse(json)
            .map_err(|err| SopflowError::new_parse_error(err, json))?;

        debug!(title = procedure.title(); "Procedure parsed successfully");
        Ok(procedure)
    }

    /// Compile a procedure into a laid-out process graph.
    ///
    /// # Errors
    ///
    /// Returns `SopflowError::Graph` if the compiled graph breaks a
    /// structural invariant and `SopflowError::Layout` if it cannot be
    /// placed. Neither happens for graphs built from a decoded procedure.
    pub fn build_graph(&self, procedure: &Procedure) -> Result<Graph, SopflowError> {
        info!(title = procedure.title(); "Building process graph");
        let mut graph = structure::compile(procedure);
        graph.validate()?;
        debug!("Structure built successfully");

        let engine = layout::Engine::from_config(self.config.layout());
        engine.apply(&mut graph)?;
        trace!(graph:?; "Laid-out graph");

        Ok(graph)
    }

    /// Render a procedure as a BPMN 2.0 XML document.
    ///
    /// # Errors
    ///
    /// Returns `SopflowError` for graph, layout, or export failures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sopflow::{ProcessBuilder, procedure::{Element, Procedure}};
    ///
    /// let procedure = Procedure::new("Checklist")
    ///     .with_element(Element::step("Lock the door"));
    ///
    /// let xml = ProcessBuilder::default()
    ///     .render_bpmn(&procedure)
    ///     .expect("Failed to render");
    ///
    /// assert!(xml.starts_with("<?xml"));
    /// ```
    pub fn render_bpmn(&self, procedure: &Procedure) -> Result<String, SopflowError> {
        let graph = self.build_graph(procedure)?;

        let bytes = export::bpmn::serialize(&graph)?;
        let xml = String::from_utf8(bytes).map_err(|err| SopflowError::Export(Box::new(err)))?;

        info!(bytes = xml.len(); "BPMN rendered successfully");
        Ok(xml)
    }
}
