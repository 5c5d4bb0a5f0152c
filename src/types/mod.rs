//! Core domain types for the bisection engine.
//!
//! Candidates are opaque version identifiers whose only ordering is their
//! position in the candidate list handed to a bisector.

pub mod ids;
pub mod result;

// Re-export commonly used types at the module level
pub use ids::Version;
pub use result::{BoundaryPair, RunResult, result_string};
