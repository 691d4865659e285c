//! Model construction errors

use crate::typedesc::TypeKind;
use thiserror::Error;

/// Result alias for model construction.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while constructing a method body against a frame layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A load claimed a kind different from the slot's declared kind
    #[error("slot {slot}: load kind {requested} does not match declared kind {declared}")]
    KindMismatch {
        /// Slot index being read
        slot: u16,
        /// Kind the frame layout declares for the slot
        declared: TypeKind,
        /// Kind the load claimed
        requested: TypeKind,
    },

    /// A load addressed the upper half of a wide value
    #[error("slot {slot} addresses the upper half of a wide value")]
    WideSlotHalf {
        /// Slot index being read
        slot: u16,
    },

    /// A load addressed a slot outside the frame
    #[error("slot {slot} out of range for frame of {frame_size} slots")]
    SlotOutOfRange {
        /// Slot index being read
        slot: u16,
        /// Total slots in the frame
        frame_size: u16,
    },
}
