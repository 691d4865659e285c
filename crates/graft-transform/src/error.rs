//! Transformation errors

use graft_model::{ModelError, TypeKind, VerifyError};
use thiserror::Error;

/// Result alias for pipeline runs.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors surfaced by the transformation pipeline.
///
/// A failure from a downstream stage propagates unchanged through every
/// upstream stage; nothing in the chain wraps or swallows it, so the caller
/// always sees the original structural defect.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The parent class offers no constructor a derived class can forward to
    #[error("cannot extend parser class '{parent}': no constructor visible to derived classes")]
    NoVisibleConstructor {
        /// Fully qualified parent class name
        parent: String,
    },

    /// A parameter cannot be forwarded under the reference-only contract
    #[error(
        "cannot forward constructor {signature} of '{parent}': \
         parameter {index} has non-reference kind {kind}"
    )]
    UnsupportedParameter {
        /// Fully qualified parent class name
        parent: String,
        /// Rendered signature of the offending constructor
        signature: String,
        /// Zero-based index of the offending parameter
        index: usize,
        /// Kind of the offending parameter
        kind: TypeKind,
    },

    /// A body was constructed against the wrong frame layout
    #[error("constructor body construction failed: {0}")]
    Model(#[from] ModelError),

    /// The finished model failed structural verification
    #[error("synthesized class '{class}' failed verification: {source}")]
    Verify {
        /// Fully qualified target class name
        class: String,
        /// Underlying shape violation
        #[source]
        source: VerifyError,
    },
}
