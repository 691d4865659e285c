//! Class models

use crate::method::MethodModel;
use crate::signature::ConstructorSignature;
use serde::{Deserialize, Serialize};

/// In-memory representation of one class under transformation.
///
/// Created once per target class, mutated in place by each transform stage,
/// consumed exactly once by the loader, then discarded. The parent
/// constructor list is introspection input and stays read-only for the
/// whole run; only the method list is open for mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassModel {
    /// Fully qualified name of the class being generated
    pub name: String,
    /// Fully qualified name of the parent class
    pub parent: String,
    /// Constructor signatures visible from the parent, in reported order
    constructors: Vec<ConstructorSignature>,
    /// Methods to be written into the final class
    pub methods: Vec<MethodModel>,
}

impl ClassModel {
    /// Model for `name` extending `parent` with the given visible constructors.
    pub fn new(
        name: impl Into<String>,
        parent: impl Into<String>,
        constructors: Vec<ConstructorSignature>,
    ) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            constructors,
            methods: Vec::new(),
        }
    }

    /// Constructor signatures visible from the parent, in reported order.
    pub fn constructors(&self) -> &[ConstructorSignature] {
        &self.constructors
    }

    /// Append a method to the class.
    pub fn add_method(&mut self, method: MethodModel) {
        self.methods.push(method);
    }

    /// Methods with constructor semantics.
    pub fn constructor_methods(&self) -> impl Iterator<Item = &MethodModel> {
        self.methods.iter().filter(|m| m.is_constructor())
    }
}
