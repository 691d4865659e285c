//! Benchmarks for constructor body construction and verification

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graft_model::{verify_class, ClassModel, MethodBuilder, TypeKind};

fn forwarding_body(parent: &str, params: &[TypeKind]) -> graft_model::MethodModel {
    let mut builder = MethodBuilder::constructor(params.to_vec());
    builder.load_slot(0).unwrap();
    let mut slot = 1u16;
    for kind in params {
        builder.load_slot(slot).unwrap();
        slot += kind.slot_width();
    }
    builder.invoke_constructor(parent, params.to_vec());
    builder.ret();
    builder.build()
}

fn bench_build_constructor(c: &mut Criterion) {
    let params = [
        TypeKind::Reference,
        TypeKind::Int,
        TypeKind::Double,
        TypeKind::Reference,
        TypeKind::Long,
        TypeKind::Float,
    ];

    c.bench_function("build_forwarding_constructor", |b| {
        b.iter(|| forwarding_body(black_box("calc.CalcParser"), black_box(&params)))
    });
}

fn bench_verify_class(c: &mut Criterion) {
    let signatures: [&[TypeKind]; 3] = [
        &[],
        &[TypeKind::Reference],
        &[TypeKind::Reference, TypeKind::Double, TypeKind::Int],
    ];

    let mut model = ClassModel::new("calc.CalcParser$$graft", "calc.CalcParser", vec![]);
    for params in signatures {
        model.add_method(forwarding_body("calc.CalcParser", params));
    }

    c.bench_function("verify_class", |b| {
        b.iter(|| verify_class(black_box(&model)))
    });
}

criterion_group!(benches, bench_build_constructor, bench_verify_class);
criterion_main!(benches);
