//! Sopflow Core Types and Definitions
//!
//! This crate provides the passive data model shared by every stage of the
//! sopflow pipeline. It includes:
//!
//! - **Identifiers**: Owned node and flow identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Procedure**: The step/decision tree consumed by the compiler ([`procedure`] module)
//! - **Graph**: The process graph produced by the compiler ([`graph`] module)

pub mod geometry;
pub mod graph;
pub mod identifier;
pub mod procedure;
