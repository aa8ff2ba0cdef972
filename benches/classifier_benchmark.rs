use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expense_classifier::{Pipeline, PipelineBuilder, Predict};

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Food", &["starbucks latte", "walmart groceries", "pizza dinner", "sushi lunch", "bakery bread"]),
    ("Transport", &["uber ride", "shell gas station", "metro card", "airport parking", "train ticket"]),
    ("Utilities", &["electricity bill", "comcast broadband", "city water", "phone plan", "gas heating"]),
    ("Entertainment", &["netflix subscription", "cinema tickets", "concert", "video game", "museum pass"]),
];

fn training_builder(repeats: usize) -> PipelineBuilder {
    let mut builder = Pipeline::builder();
    for i in 0..repeats {
        for (label, examples) in CATEGORIES {
            for example in *examples {
                builder = builder
                    .add_example(format!("{} {}", example, i), *label)
                    .unwrap();
            }
        }
    }
    builder
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fit");
    group.sample_size(20);

    for repeats in [1usize, 10, 50] {
        group.bench_function(format!("{}_examples", repeats * 20), |b| {
            b.iter(|| training_builder(black_box(repeats)).build().unwrap())
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let pipeline = training_builder(10).build().unwrap();
    let mut group = c.benchmark_group("Predict");

    group.bench_function("short_text", |b| {
        b.iter(|| pipeline.predict(black_box("coffee")).unwrap())
    });

    group.bench_function("long_text", |b| {
        b.iter(|| {
            pipeline
                .predict(black_box(
                    "monthly comcast broadband bill paid together with the city water \
                     utility and a netflix subscription renewal at the end of the month",
                ))
                .unwrap()
        })
    });

    group.bench_function("batch_of_16", |b| {
        let texts = vec!["uber ride home"; 16];
        b.iter(|| pipeline.predict_batch(black_box(&texts)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
