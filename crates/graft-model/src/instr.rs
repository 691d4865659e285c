//! Method body instructions
//!
//! The minimal stack-oriented instruction set needed to express a
//! forwarding constructor: load a local slot, invoke a named constructor on
//! a named type, return. Bodies are built append-only; a load is checked
//! against the declared kind of the slot it reads at the time it is
//! emitted, not in a later verification pass.

use crate::error::{ModelError, ModelResult};
use crate::typedesc::TypeKind;
use serde::{Deserialize, Serialize};

/// A single method body instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Push the value stored in a local slot
    LoadLocal {
        /// Slot index in the activation frame
        slot: u16,
        /// Declared kind of the slot
        kind: TypeKind,
    },

    /// Invoke the constructor of `owner` with the given parameter kinds
    InvokeConstructor {
        /// Fully qualified name of the type declaring the constructor
        owner: String,
        /// Parameter kinds of the invoked constructor
        params: Vec<TypeKind>,
    },

    /// Return from the method
    Return,
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::LoadLocal { slot, kind } => {
                write!(f, "LOAD_LOCAL {} {}", slot, kind)
            }
            Instruction::InvokeConstructor { owner, params } => {
                write!(f, "CALL_CONSTRUCTOR {} (", owner)?;
                for (i, kind) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                write!(f, ")")
            }
            Instruction::Return => write!(f, "RETURN"),
        }
    }
}

/// Append-only ordered sequence of instructions forming a method body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSeq {
    instrs: Vec<Instruction>,
}

impl InstructionSeq {
    /// Empty sequence.
    pub fn new() -> Self {
        Self { instrs: Vec::new() }
    }

    /// Append an instruction.
    pub fn push(&mut self, instr: Instruction) {
        self.instrs.push(instr);
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Iterate over the instructions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instrs.iter()
    }

    /// The instructions as a slice.
    pub fn as_slice(&self) -> &[Instruction] {
        &self.instrs
    }
}

impl std::fmt::Display for InstructionSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for instr in &self.instrs {
            writeln!(f, "{}", instr)?;
        }
        Ok(())
    }
}

/// Declared slot layout of a constructor activation frame.
///
/// Slot 0 holds the self reference; each parameter occupies the next
/// `slot_width()` slots. The upper half of a wide value is not addressable.
#[derive(Debug, Clone)]
pub struct FrameLayout {
    slots: Vec<Option<TypeKind>>,
}

impl FrameLayout {
    /// Layout for a constructor with the given parameter kinds.
    pub fn for_constructor(params: &[TypeKind]) -> Self {
        let mut slots = vec![Some(TypeKind::Reference)];
        for &kind in params {
            slots.push(Some(kind));
            if kind.is_wide() {
                slots.push(None);
            }
        }
        Self { slots }
    }

    /// Declared kind of the value stored at `slot`.
    pub fn kind_at(&self, slot: u16) -> ModelResult<TypeKind> {
        match self.slots.get(slot as usize) {
            Some(Some(kind)) => Ok(*kind),
            Some(None) => Err(ModelError::WideSlotHalf { slot }),
            None => Err(ModelError::SlotOutOfRange {
                slot,
                frame_size: self.frame_size(),
            }),
        }
    }

    /// Total slots in the frame.
    pub fn frame_size(&self) -> u16 {
        self.slots.len() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_append_only() {
        let mut seq = InstructionSeq::new();
        assert!(seq.is_empty());
        seq.push(Instruction::Return);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.as_slice(), &[Instruction::Return]);
    }

    #[test]
    fn test_layout_self_slot() {
        let layout = FrameLayout::for_constructor(&[]);
        assert_eq!(layout.frame_size(), 1);
        assert_eq!(layout.kind_at(0), Ok(TypeKind::Reference));
    }

    #[test]
    fn test_layout_wide_params() {
        // (reference, double, int) -> slots: 0 self, 1 ref, 2 double, 3 high half, 4 int
        let layout =
            FrameLayout::for_constructor(&[TypeKind::Reference, TypeKind::Double, TypeKind::Int]);
        assert_eq!(layout.frame_size(), 5);
        assert_eq!(layout.kind_at(1), Ok(TypeKind::Reference));
        assert_eq!(layout.kind_at(2), Ok(TypeKind::Double));
        assert_eq!(layout.kind_at(4), Ok(TypeKind::Int));
    }

    #[test]
    fn test_layout_rejects_wide_upper_half() {
        let layout = FrameLayout::for_constructor(&[TypeKind::Long]);
        assert_eq!(
            layout.kind_at(2),
            Err(ModelError::WideSlotHalf { slot: 2 })
        );
    }

    #[test]
    fn test_layout_rejects_out_of_range_slot() {
        let layout = FrameLayout::for_constructor(&[TypeKind::Int]);
        assert_eq!(
            layout.kind_at(7),
            Err(ModelError::SlotOutOfRange {
                slot: 7,
                frame_size: 2
            })
        );
    }

    #[test]
    fn test_instruction_display() {
        let load = Instruction::LoadLocal {
            slot: 3,
            kind: TypeKind::Double,
        };
        assert_eq!(load.to_string(), "LOAD_LOCAL 3 double");

        let invoke = Instruction::InvokeConstructor {
            owner: "calc.Parser".to_string(),
            params: vec![TypeKind::Reference, TypeKind::Int],
        };
        assert_eq!(invoke.to_string(), "CALL_CONSTRUCTOR calc.Parser (reference, int)");

        assert_eq!(Instruction::Return.to_string(), "RETURN");
    }
}
