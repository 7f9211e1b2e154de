//! Structural errors surfaced by boolean operations.
//!
//! Only invariant violations live here. Geometric edge cases inside the CSG
//! pipeline (near-coplanar splits, epsilon-boundary classification) are
//! resolved locally by the documented tie-break rules and never escape as
//! errors; a ray that misses is `None`, an empty boolean result is a solid
//! with zero faces.

use thiserror::Error;

/// Errors raised when a boolean operation cannot be applied safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsgError {
    /// An operand fails the closed-2-manifold invariant before the
    /// operation begins. The operation is aborted and the previous solid
    /// must be retained unchanged by the caller.
    #[error(
        "{operand} operand is not a closed 2-manifold: {defective_edges} edge(s) not shared by exactly two faces"
    )]
    NonManifoldOperand {
        /// Which operand failed validation ("target" or "cutter").
        operand: &'static str,
        /// Number of edges whose incident-face count differs from two.
        defective_edges: usize,
    },
}
