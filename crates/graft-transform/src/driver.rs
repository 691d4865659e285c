//! Pipeline driver
//!
//! Owns the ordered stage list and runs it once per target class: build the
//! initial model from parent introspection, thread it through the chain,
//! then gate the result behind structural verification so a defective model
//! never reaches the loader.

use crate::chain::{Chain, ClassTransformer};
use crate::error::{TransformError, TransformResult};
use crate::forward::ForwardConstructors;
use graft_model::{verify_class, ClassModel, ConstructorSignature};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Introspection result for a parent class: its fully qualified name and
/// every constructor visible to a derived class, in reported order.
///
/// Supplied by the caller before the pipeline starts; the pipeline never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentClass {
    /// Fully qualified parent class name
    pub name: String,
    /// Visible constructor signatures, in reported order
    pub constructors: Vec<ConstructorSignature>,
}

impl ParentClass {
    /// New introspection record.
    pub fn new(name: impl Into<String>, constructors: Vec<ConstructorSignature>) -> Self {
        Self {
            name: name.into(),
            constructors,
        }
    }

    /// Content fingerprint of this introspection record.
    ///
    /// Synthesis is deterministic in (parent name, constructor list), so
    /// identical records hash identically and the fingerprint is a safe
    /// deduplication key for finished models. The hash covers a
    /// length-prefixed byte encoding, so adjacent fields cannot alias.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Sha256::new();
        hasher.update((self.name.len() as u32).to_le_bytes());
        hasher.update(self.name.as_bytes());
        hasher.update((self.constructors.len() as u32).to_le_bytes());
        for signature in &self.constructors {
            hasher.update([signature.visibility as u8]);
            hasher.update((signature.params.len() as u32).to_le_bytes());
            for kind in &signature.params {
                hasher.update([kind.descriptor_char() as u8]);
            }
            hasher.update((signature.exceptions.len() as u32).to_le_bytes());
            for exception in &signature.exceptions {
                hasher.update((exception.len() as u32).to_le_bytes());
                hasher.update(exception.as_bytes());
            }
        }
        Fingerprint(hasher.finalize().into())
    }
}

/// Stable content fingerprint of a parent introspection record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Drives the transform chain, one target class per call.
///
/// The driver is stateless between runs; each call builds a fresh model, so
/// independent target classes can be synthesized concurrently through a
/// shared driver without locking.
pub struct Synthesizer {
    stages: Vec<Box<dyn ClassTransformer>>,
}

impl Synthesizer {
    /// Driver with no stages, for embedders composing their own chain.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Driver with the standard stage set: constructor forwarding in
    /// reference-only mode.
    pub fn standard() -> Self {
        Self::new().with_stage(ForwardConstructors::reference_only())
    }

    /// Append a stage to the end of the chain.
    ///
    /// Ordering is fixed once synthesis starts; the same ordering must be
    /// used for every synthesis of a given target class so output stays
    /// deterministic.
    pub fn with_stage(mut self, stage: impl ClassTransformer + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Number of registered stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Synthesize the class model for `target` extending `parent`.
    ///
    /// Builds a fresh model, runs the chain once, and verifies the result
    /// before returning it. On any failure no model is produced.
    pub fn synthesize(&self, target: &str, parent: &ParentClass) -> TransformResult<ClassModel> {
        let model = ClassModel::new(target, parent.name.clone(), parent.constructors.clone());
        let model = Chain::new(&self.stages).run(model)?;
        verify_class(&model).map_err(|source| TransformError::Verify {
            class: target.to_string(),
            source,
        })?;
        Ok(model)
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::standard()
    }
}
