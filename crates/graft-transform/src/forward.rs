//! Forwarding constructor synthesis
//!
//! For every constructor visible from the parent class, appends a public
//! constructor that loads its arguments and hands them unchanged to the
//! corresponding parent constructor. This is where slot arithmetic must be
//! exact: a wide argument occupies two consecutive slots, so the running
//! slot counter advances by each parameter's width, never by a flat 1.

use crate::chain::{Chain, ClassTransformer};
use crate::error::{TransformError, TransformResult};
use graft_model::{ClassModel, ConstructorSignature, MethodBuilder, MethodModel};

/// Transform stage that synthesizes one forwarding constructor per parent
/// constructor signature.
///
/// The default mode forwards parameters of every kind. `reference_only`
/// mode instead rejects primitive parameter kinds up front: the parser
/// system passes reference-typed configuration through rule-class
/// constructors, and a primitive parameter there means the description
/// class is not one this pipeline should accept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardConstructors {
    reference_only: bool,
}

impl ForwardConstructors {
    /// Stage that forwards parameters of every kind.
    pub fn new() -> Self {
        Self {
            reference_only: false,
        }
    }

    /// Stage that rejects primitive parameter kinds.
    pub fn reference_only() -> Self {
        Self {
            reference_only: true,
        }
    }

    fn synthesize(
        &self,
        model: &ClassModel,
        signature: &ConstructorSignature,
    ) -> TransformResult<MethodModel> {
        if self.reference_only {
            if let Some(index) = signature.params.iter().position(|k| !k.is_reference()) {
                return Err(TransformError::UnsupportedParameter {
                    parent: model.parent.clone(),
                    signature: signature.to_string(),
                    index,
                    kind: signature.params[index],
                });
            }
        }

        let mut builder = MethodBuilder::constructor(signature.params.clone())
            .exceptions(signature.exceptions.clone());

        // Self reference, then each argument at its width-aligned slot
        builder.load_slot(0)?;
        let mut slot = 1u16;
        for kind in &signature.params {
            builder.load_slot_as(slot, *kind)?;
            slot += kind.slot_width();
        }

        builder.invoke_constructor(&model.parent, signature.params.clone());
        builder.ret();
        Ok(builder.build())
    }
}

impl ClassTransformer for ForwardConstructors {
    fn name(&self) -> &'static str {
        "forward-constructors"
    }

    fn transform(&self, mut model: ClassModel, next: Chain<'_>) -> TransformResult<ClassModel> {
        if model.constructors().is_empty() {
            return Err(TransformError::NoVisibleConstructor {
                parent: model.parent.clone(),
            });
        }

        // Stage everything before touching the model, so a failing
        // signature leaves the method list exactly as it was.
        let mut synthesized = Vec::with_capacity(model.constructors().len());
        for signature in model.constructors() {
            synthesized.push(self.synthesize(&model, signature)?);
        }
        model.methods.extend(synthesized);

        next.run(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_model::{Instruction, TypeKind, Visibility};

    fn run(stage: ForwardConstructors, model: ClassModel) -> TransformResult<ClassModel> {
        let stages: Vec<Box<dyn ClassTransformer>> = vec![];
        stage.transform(model, Chain::new(&stages))
    }

    fn model_for(signatures: Vec<ConstructorSignature>) -> ClassModel {
        ClassModel::new("calc.CalcParser$$graft", "calc.CalcParser", signatures)
    }

    #[test]
    fn test_one_method_per_parent_constructor() {
        let model = model_for(vec![
            ConstructorSignature::new(vec![]),
            ConstructorSignature::new(vec![TypeKind::Reference]),
            ConstructorSignature::new(vec![TypeKind::Reference, TypeKind::Reference]),
        ]);
        let out = run(ForwardConstructors::new(), model).unwrap();

        assert_eq!(out.methods.len(), 3);
        for (method, signature) in out.methods.iter().zip(out.constructors()) {
            assert!(method.is_constructor());
            assert_eq!(method.params, signature.params);
        }
    }

    #[test]
    fn test_forwarding_body_shape() {
        let model = model_for(vec![ConstructorSignature::new(vec![TypeKind::Reference])]);
        let out = run(ForwardConstructors::new(), model).unwrap();

        let code = out.methods[0].code.as_slice();
        assert_eq!(
            code,
            &[
                Instruction::LoadLocal {
                    slot: 0,
                    kind: TypeKind::Reference
                },
                Instruction::LoadLocal {
                    slot: 1,
                    kind: TypeKind::Reference
                },
                Instruction::InvokeConstructor {
                    owner: "calc.CalcParser".to_string(),
                    params: vec![TypeKind::Reference],
                },
                Instruction::Return,
            ]
        );
    }

    #[test]
    fn test_wide_params_advance_slot_by_width() {
        // widths [1, 1, 2, 1] -> load slots [1, 2, 3, 5]
        let model = model_for(vec![ConstructorSignature::new(vec![
            TypeKind::Reference,
            TypeKind::Int,
            TypeKind::Double,
            TypeKind::Float,
        ])]);
        let out = run(ForwardConstructors::new(), model).unwrap();

        let slots: Vec<u16> = out.methods[0]
            .code
            .iter()
            .filter_map(|i| match i {
                Instruction::LoadLocal { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 5]);
    }

    #[test]
    fn test_empty_parent_list_fails_without_mutation() {
        let model = model_for(vec![]);
        let err = run(ForwardConstructors::new(), model).unwrap_err();
        assert!(matches!(
            err,
            TransformError::NoVisibleConstructor { parent } if parent == "calc.CalcParser"
        ));
    }

    #[test]
    fn test_reference_only_rejects_primitive_param() {
        let model = model_for(vec![ConstructorSignature::new(vec![
            TypeKind::Reference,
            TypeKind::Int,
        ])]);
        let err = run(ForwardConstructors::reference_only(), model).unwrap_err();
        match err {
            TransformError::UnsupportedParameter {
                parent,
                signature,
                index,
                kind,
            } => {
                assert_eq!(parent, "calc.CalcParser");
                assert_eq!(signature, "(reference, int)");
                assert_eq!(index, 1);
                assert_eq!(kind, TypeKind::Int);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reference_only_failure_stages_nothing() {
        // First signature is fine, second is not; nothing may be appended
        let model = model_for(vec![
            ConstructorSignature::new(vec![TypeKind::Reference]),
            ConstructorSignature::new(vec![TypeKind::Double]),
        ]);
        let err = run(ForwardConstructors::reference_only(), model).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedParameter { .. }));
    }

    #[test]
    fn test_reference_only_accepts_all_reference_signature() {
        let model = model_for(vec![ConstructorSignature::new(vec![
            TypeKind::Reference,
            TypeKind::Reference,
        ])]);
        let out = run(ForwardConstructors::reference_only(), model).unwrap();
        assert_eq!(out.methods.len(), 1);
    }

    #[test]
    fn test_visibility_forced_public() {
        let model = model_for(vec![ConstructorSignature::new(vec![])
            .with_visibility(Visibility::Protected)]);
        let out = run(ForwardConstructors::new(), model).unwrap();
        assert_eq!(out.methods[0].visibility, Visibility::Public);
    }

    #[test]
    fn test_exceptions_copied_verbatim() {
        let exceptions = vec!["ParseException".to_string(), "IOFailure".to_string()];
        let model = model_for(vec![
            ConstructorSignature::new(vec![]).with_exceptions(exceptions.clone())
        ]);
        let out = run(ForwardConstructors::new(), model).unwrap();
        assert_eq!(out.methods[0].exceptions, exceptions);
    }

    #[test]
    fn test_existing_methods_untouched() {
        let mut model = model_for(vec![ConstructorSignature::new(vec![])]);
        let mut existing = MethodBuilder::constructor(vec![]).build();
        existing.name = "rule_body".to_string();
        model.add_method(existing.clone());

        let out = run(ForwardConstructors::new(), model).unwrap();
        assert_eq!(out.methods.len(), 2);
        assert_eq!(out.methods[0], existing);
    }
}
