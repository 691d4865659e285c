//! Method models and the builder that checks bodies as they are emitted

use crate::error::{ModelError, ModelResult};
use crate::instr::{FrameLayout, Instruction, InstructionSeq};
use crate::signature::Visibility;
use crate::typedesc::TypeKind;
use serde::{Deserialize, Serialize};

/// Method name carrying constructor semantics.
pub const CONSTRUCTOR_NAME: &str = "constructor";

/// Structural model of one method, including its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodModel {
    /// Method name
    pub name: String,
    /// Access level
    pub visibility: Visibility,
    /// Parameter kinds in declaration order
    pub params: Vec<TypeKind>,
    /// Declared exception names, copied verbatim from the originating signature
    pub exceptions: Vec<String>,
    /// Body instructions
    pub code: InstructionSeq,
}

impl MethodModel {
    /// Whether this method has constructor semantics.
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// Total slots in the activation frame: self plus parameter widths.
    pub fn frame_size(&self) -> u16 {
        1 + self.params.iter().map(|k| k.slot_width()).sum::<u16>()
    }
}

/// Builder for constructor method bodies.
///
/// Owns the declared frame layout of the method under construction, so
/// every emitted load is checked against the kind of the slot it reads at
/// the time it is emitted.
#[derive(Debug)]
pub struct MethodBuilder {
    name: String,
    visibility: Visibility,
    params: Vec<TypeKind>,
    exceptions: Vec<String>,
    layout: FrameLayout,
    code: InstructionSeq,
}

impl MethodBuilder {
    /// Builder for a public constructor with the given parameter kinds.
    pub fn constructor(params: Vec<TypeKind>) -> Self {
        let layout = FrameLayout::for_constructor(&params);
        Self {
            name: CONSTRUCTOR_NAME.to_string(),
            visibility: Visibility::Public,
            params,
            exceptions: Vec::new(),
            layout,
            code: InstructionSeq::new(),
        }
    }

    /// Attach declared exception names copied from the originating signature.
    pub fn exceptions(mut self, exceptions: Vec<String>) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Emit a load of `slot` with the kind the frame layout declares for it.
    pub fn load_slot(&mut self, slot: u16) -> ModelResult<()> {
        let kind = self.layout.kind_at(slot)?;
        self.code.push(Instruction::LoadLocal { slot, kind });
        Ok(())
    }

    /// Emit a load of `slot`, checking the claimed kind against the layout.
    pub fn load_slot_as(&mut self, slot: u16, kind: TypeKind) -> ModelResult<()> {
        let declared = self.layout.kind_at(slot)?;
        if declared != kind {
            return Err(ModelError::KindMismatch {
                slot,
                declared,
                requested: kind,
            });
        }
        self.code.push(Instruction::LoadLocal { slot, kind });
        Ok(())
    }

    /// Emit a constructor invocation on `owner`.
    pub fn invoke_constructor(&mut self, owner: &str, params: Vec<TypeKind>) {
        self.code.push(Instruction::InvokeConstructor {
            owner: owner.to_string(),
            params,
        });
    }

    /// Emit a return.
    pub fn ret(&mut self) {
        self.code.push(Instruction::Return);
    }

    /// Finish the method.
    pub fn build(self) -> MethodModel {
        MethodModel {
            name: self.name,
            visibility: self.visibility,
            params: self.params,
            exceptions: self.exceptions,
            code: self.code,
        }
    }
}
