//! Graph compilation from procedure trees.
//!
//! This module turns a [`Procedure`](sopflow_core::procedure::Procedure) into
//! a process [`Graph`](sopflow_core::graph::Graph): one task per step, and a
//! diverging/converging gateway pair per decision with one path per branch.
//! The result carries structure only; geometry is added by the
//! [`layout`](crate::layout) stage.

mod compiler;

pub use compiler::{PROCESS_ID, compile};
