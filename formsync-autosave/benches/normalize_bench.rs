use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formsync_autosave::normalize_enum_selections;
use formsync_types::{EnumOption, FormSnapshot};
use serde_json::Value;

fn intake_form(fields: usize) -> FormSnapshot {
    (0..fields)
        .map(|i| {
            let value = if i % 3 == 0 {
                Value::Array(
                    (0..5)
                        .map(|k| EnumOption::new(format!("KEY_{k}"), format!("Label {k}")).to_value())
                        .collect(),
                )
            } else {
                Value::from(format!("free text {i}"))
            };
            (format!("field{i}"), value)
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let form = intake_form(60);
    c.bench_function("normalize_60_fields", |b| {
        b.iter(|| normalize_enum_selections(black_box(form.clone())))
    });

    let normalized = normalize_enum_selections(form);
    c.bench_function("normalize_already_normalized", |b| {
        b.iter(|| normalize_enum_selections(black_box(normalized.clone())))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
