//! followgraph-cli: Operator shell for the follow graph.
//!
//! Each subcommand maps onto one store operation. Users are addressed by
//! username and results are rendered as JSON.

pub mod commands;
pub mod error;
pub mod settings;
