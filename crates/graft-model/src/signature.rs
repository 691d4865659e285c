//! Constructor signatures

use crate::typedesc::TypeKind;
use serde::{Deserialize, Serialize};

/// Access level of a declared constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Visible everywhere
    Public,
    /// Visible to derived classes
    Protected,
    /// Visible within the declaring package
    #[default]
    Package,
    /// Not visible outside the declaring class
    Private,
}

/// Signature of one constructor visible to a derived class.
///
/// The implicit leading self reference is not part of `params`; it always
/// occupies slot 0 of the activation frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorSignature {
    /// Parameter kinds, in declaration order
    pub params: Vec<TypeKind>,
    /// Declared exception names, copied verbatim from the parent
    pub exceptions: Vec<String>,
    /// Access level declared on the parent constructor
    pub visibility: Visibility,
}

impl ConstructorSignature {
    /// Public signature with the given parameter kinds and no exceptions.
    pub fn new(params: Vec<TypeKind>) -> Self {
        Self {
            params,
            exceptions: Vec::new(),
            visibility: Visibility::Public,
        }
    }

    /// Attach declared exception names.
    pub fn with_exceptions(mut self, exceptions: Vec<String>) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Set the declared access level.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Total frame slots: the self slot plus the cumulative parameter widths.
    pub fn frame_size(&self) -> u16 {
        1 + self.params.iter().map(|k| k.slot_width()).sum::<u16>()
    }
}

impl std::fmt::Display for ConstructorSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, kind) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", kind)?;
        }
        write!(f, ")")
    }
}
