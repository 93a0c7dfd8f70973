//! Evaluator panel domain
//!
//! The panel is the fixed set of [`EvaluatorProfile`]s voting on every
//! purchase request. It is built once at process start and never changes.

mod profile;

pub use profile::{EvaluatorProfile, PANEL_SIZE, Panel};
