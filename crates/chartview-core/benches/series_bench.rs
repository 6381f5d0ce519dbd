use chartview_core::memory::MemoryDatabase;
use chartview_core::{
    BarBuildOptions, BarChartSettings, Bindings, ColorClassifier, ResolvedAccessors, SeriesBuilder, Value,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn gen_items(n: usize, slots: usize) -> (Vec<String>, MemoryDatabase) {
    let mut db = MemoryDatabase::new();
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = format!("item{i}");
        for s in 0..slots {
            // simple waveform, always positive so log axes keep every value
            let v = (i as f64 * 0.01 + s as f64).sin() * 10.0 + 11.0;
            db.insert(id.as_str(), format!("v{s}"), Value::Number(v));
        }
        db.insert(id.as_str(), "label", Value::Text(id.clone()));
        ids.push(id);
    }
    (ids, db)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("series_build");
    for &n in &[1_000usize, 10_000usize] {
        for &slots in &[1usize, 4usize] {
            let (ids, db) = gen_items(n, slots);
            let columns: Vec<String> = (0..slots).map(|s| format!("v{s}")).collect();
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            let accessors = ResolvedAccessors::resolve(&Bindings::separate(&columns, "label")).unwrap();
            let settings = BarChartSettings::default();
            let colors = ColorClassifier::new(None, settings.color.clone());
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}_s{slots}")), &ids, |b, ids| {
                let builder = SeriesBuilder::new(BarBuildOptions::from_settings(&settings), &accessors, &db, &colors);
                b.iter(|| {
                    let _ = black_box(builder.build(ids.iter().cloned()));
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
