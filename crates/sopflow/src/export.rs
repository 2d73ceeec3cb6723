//! Serialization of laid-out process graphs.
//!
//! Exporters consume a [`Graph`] whose nodes and flows already carry
//! geometry. [`bpmn`] produces BPMN 2.0 XML with an embedded diagram
//! interchange section.

pub mod bpmn;

use thiserror::Error;

use sopflow_core::{graph::Graph, identifier::Id};

/// A sink for laid-out process graphs.
pub trait Exporter {
    /// Write `graph` to the exporter's output.
    fn export_graph(&mut self, graph: &Graph) -> Result<(), Error>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("flow `{edge}` references unknown node `{node}`")]
    DanglingEdge { edge: Id, node: Id },

    #[error("XML write error: {0}")]
    Write(String),
}
