//! wn-model: EPANET INP network model access.
//!
//! Parses the subset of an INP document the analysis pipeline needs
//! (node/link inventory, coordinates, per-link initial status) while
//! keeping the original text, so the document handed to the solver is the
//! user's own model with only link-status overrides applied.

pub mod error;
pub mod inp;
pub mod network;

pub use error::{ModelError, ModelResult};
pub use network::{Link, LinkKind, LinkStatus, NetworkModel, Node, NodeKind};
