//! Structural verification of synthesized constructors
//!
//! Re-checks the constructor body invariant before a model is handed to
//! the loader: the exact load prefix, slot alignment for wide parameters,
//! and the super-constructor linkage. The builder layer already prevents
//! most of these defects; this pass catches models assembled by hand or by
//! a misbehaving transform stage, where a wrong slot index or a flat slot
//! increment would otherwise surface only when the loaded class crashes at
//! invocation time.

use crate::class::ClassModel;
use crate::instr::Instruction;
use crate::method::MethodModel;
use crate::typedesc::TypeKind;
use thiserror::Error;

/// Constructor shape violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// Empty body
    #[error("{method}: constructor body is empty")]
    EmptyBody {
        /// Offending method description
        method: String,
    },

    /// Body does not end with a return
    #[error("{method}: constructor body does not end with RETURN")]
    MissingReturn {
        /// Offending method description
        method: String,
    },

    /// More than one return
    #[error("{method}: expected exactly one RETURN, found {count}")]
    ExtraReturn {
        /// Offending method description
        method: String,
        /// Number of returns found
        count: usize,
    },

    /// No super-constructor invocation
    #[error("{method}: no super-constructor invocation in body")]
    MissingSuperCall {
        /// Offending method description
        method: String,
    },

    /// More than one constructor invocation
    #[error("{method}: expected exactly one constructor invocation, found {count}")]
    ExtraSuperCall {
        /// Offending method description
        method: String,
        /// Number of invocations found
        count: usize,
    },

    /// The super call is not immediately before the return
    #[error("{method}: super-constructor invocation must immediately precede RETURN")]
    SuperCallNotLast {
        /// Offending method description
        method: String,
    },

    /// The super call targets a type other than the declared parent
    #[error("{method}: super call targets '{found}', parent is '{expected}'")]
    WrongSuperTarget {
        /// Offending method description
        method: String,
        /// Declared parent type
        expected: String,
        /// Type the invocation targets
        found: String,
    },

    /// The super call forwards a different signature than the method declares
    #[error("{method}: super call forwards {found}, declared signature is {expected}")]
    ForwardedSignatureMismatch {
        /// Offending method description
        method: String,
        /// Rendered declared signature
        expected: String,
        /// Rendered forwarded signature
        found: String,
    },

    /// An instruction other than a load appears before the super call
    #[error("{method}: instruction {index} must be a load")]
    UnexpectedInstruction {
        /// Offending method description
        method: String,
        /// Index of the offending instruction
        index: usize,
    },

    /// Wrong number of loads for the declared signature
    #[error("{method}: expected {expected} loads (self + parameters), found {found}")]
    LoadCountMismatch {
        /// Offending method description
        method: String,
        /// Loads required by the signature
        expected: usize,
        /// Loads present in the body
        found: usize,
    },

    /// A load reads the wrong slot for its position
    #[error("{method}: load {index} reads slot {found}, expected slot {expected}")]
    SlotMisaligned {
        /// Offending method description
        method: String,
        /// Index of the load within the load prefix
        index: usize,
        /// Slot the load should read
        expected: u16,
        /// Slot the load reads
        found: u16,
    },

    /// A load carries the wrong kind for its slot
    #[error("{method}: load {index} has kind {found}, declared kind is {expected}")]
    KindMismatch {
        /// Offending method description
        method: String,
        /// Index of the load within the load prefix
        index: usize,
        /// Kind declared for the slot
        expected: TypeKind,
        /// Kind the load carries
        found: TypeKind,
    },
}

/// Verify every constructor-semantics method of a class model.
///
/// Non-constructor methods are outside this pass; later pipeline stages own
/// their shape.
pub fn verify_class(model: &ClassModel) -> Result<(), VerifyError> {
    for method in model.constructor_methods() {
        verify_constructor(&model.parent, &model.name, method)?;
    }
    Ok(())
}

fn verify_constructor(
    parent: &str,
    class: &str,
    method: &MethodModel,
) -> Result<(), VerifyError> {
    let label = format!("{}.{}{}", class, method.name, render_params(&method.params));
    let code = method.code.as_slice();

    if code.is_empty() {
        return Err(VerifyError::EmptyBody { method: label });
    }

    // Exactly one RETURN, and it terminates the body
    let return_count = code
        .iter()
        .filter(|i| matches!(i, Instruction::Return))
        .count();
    if !matches!(code[code.len() - 1], Instruction::Return) {
        return Err(VerifyError::MissingReturn { method: label });
    }
    if return_count != 1 {
        return Err(VerifyError::ExtraReturn {
            method: label,
            count: return_count,
        });
    }

    // Exactly one constructor invocation, immediately before the RETURN
    let invoke_count = code
        .iter()
        .filter(|i| matches!(i, Instruction::InvokeConstructor { .. }))
        .count();
    match invoke_count {
        0 => return Err(VerifyError::MissingSuperCall { method: label }),
        1 => {}
        count => {
            return Err(VerifyError::ExtraSuperCall {
                method: label,
                count,
            })
        }
    }
    let (owner, forwarded) = match &code[code.len() - 2] {
        Instruction::InvokeConstructor { owner, params } => (owner, params),
        _ => return Err(VerifyError::SuperCallNotLast { method: label }),
    };
    if owner != parent {
        return Err(VerifyError::WrongSuperTarget {
            method: label,
            expected: parent.to_string(),
            found: owner.clone(),
        });
    }
    if forwarded != &method.params {
        return Err(VerifyError::ForwardedSignatureMismatch {
            method: label,
            expected: render_params(&method.params),
            found: render_params(forwarded),
        });
    }

    // Everything before the super call must be the load prefix
    let loads = &code[..code.len() - 2];
    for (index, instr) in loads.iter().enumerate() {
        if !matches!(instr, Instruction::LoadLocal { .. }) {
            return Err(VerifyError::UnexpectedInstruction {
                method: label,
                index,
            });
        }
    }
    let expected_loads = 1 + method.params.len();
    if loads.len() != expected_loads {
        return Err(VerifyError::LoadCountMismatch {
            method: label,
            expected: expected_loads,
            found: loads.len(),
        });
    }

    // Load prefix: self slot, then each parameter at its width-aligned slot
    let mut expected = Vec::with_capacity(expected_loads);
    expected.push((0u16, TypeKind::Reference));
    let mut slot = 1u16;
    for &kind in &method.params {
        expected.push((slot, kind));
        slot += kind.slot_width();
    }

    for (index, (instr, &(expected_slot, expected_kind))) in
        loads.iter().zip(expected.iter()).enumerate()
    {
        if let Instruction::LoadLocal { slot, kind } = instr {
            if *slot != expected_slot {
                return Err(VerifyError::SlotMisaligned {
                    method: label,
                    index,
                    expected: expected_slot,
                    found: *slot,
                });
            }
            if *kind != expected_kind {
                return Err(VerifyError::KindMismatch {
                    method: label,
                    index,
                    expected: expected_kind,
                    found: *kind,
                });
            }
        }
    }

    Ok(())
}

fn render_params(params: &[TypeKind]) -> String {
    let mut out = String::from("(");
    for (i, kind) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(kind.mnemonic());
    }
    out.push(')');
    out
}
