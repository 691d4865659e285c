//! Graft Class Transformation Pipeline
//!
//! Derives an executable subclass of a user-authored rule-description class
//! by threading an in-memory class model through an ordered chain of
//! rewrite stages. The stage implemented here is constructor synthesis:
//! one public forwarding constructor per constructor visible from the
//! parent class, each handing its arguments unchanged to the corresponding
//! super constructor.

pub mod chain;
pub mod forward;
pub mod driver;
pub mod cache;
pub mod error;

pub use chain::{Chain, ClassTransformer};
pub use forward::ForwardConstructors;
pub use driver::{Fingerprint, ParentClass, Synthesizer};
pub use cache::ModelCache;
pub use error::{TransformError, TransformResult};

// Re-export model types for convenience
pub use graft_model::{
    verify_class, ClassModel, ConstructorSignature, Instruction, InstructionSeq, MethodModel,
    TypeKind, VerifyError, Visibility,
};
