//! Transform stage chain
//!
//! Stages are held as an explicit ordered list owned by the driver. Each
//! stage receives the model by value together with the remainder of the
//! chain, so the model is never aliased between stages: a stage finishes
//! its mutation before the next stage observes anything.

use crate::error::TransformResult;
use graft_model::ClassModel;

/// A single rewrite stage over a class model.
///
/// Implementations mutate the model, then hand it to `next.run` to continue
/// the chain. Returning without invoking `next` terminates the run early
/// and is a legitimate outcome, so callers must not assume every registered
/// stage executes. Errors from `next` must be propagated unchanged.
pub trait ClassTransformer: Send + Sync {
    /// Stage name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Consume the model and produce the transformed model.
    fn transform(&self, model: ClassModel, next: Chain<'_>) -> TransformResult<ClassModel>;
}

/// The remainder of a transform chain.
#[derive(Clone, Copy)]
pub struct Chain<'a> {
    stages: &'a [Box<dyn ClassTransformer>],
}

impl<'a> Chain<'a> {
    /// Chain over an ordered stage list.
    pub fn new(stages: &'a [Box<dyn ClassTransformer>]) -> Self {
        Self { stages }
    }

    /// Run the remaining stages. An empty chain returns the model unchanged.
    pub fn run(self, model: ClassModel) -> TransformResult<ClassModel> {
        match self.stages.split_first() {
            None => Ok(model),
            Some((head, rest)) => head.transform(model, Chain { stages: rest }),
        }
    }

    /// Number of stages remaining.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether any stages remain.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
