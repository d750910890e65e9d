//! wn-epanet: adapter for an external EPANET-compatible solver binary.
//!
//! The solver itself is an external collaborator. This crate writes the
//! model to a scratch INP file, runs the binary, and reads the generated
//! report back into a [`wn_impact::PressureSeries`]. Every failure here is
//! a solve failure from the pipeline's point of view, so the adapter
//! reuses [`wn_impact::SolveError`] rather than inventing its own type.

pub mod rpt;
pub mod solver;

pub use solver::{EpanetSolver, DEFAULT_BINARY};
