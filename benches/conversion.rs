use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use toml_native::{dumps, from_str, loads, to_string, Map, Value};

#[derive(Serialize, Deserialize, Clone)]
struct Dependency {
    name: String,
    version: String,
    optional: bool,
    features: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Manifest {
    package: Package,
    dependency: Vec<Dependency>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Package {
    name: String,
    version: String,
    authors: Vec<String>,
    edition: String,
}

fn manifest(deps: usize) -> Manifest {
    Manifest {
        package: Package {
            name: "bench".to_string(),
            version: "0.1.0".to_string(),
            authors: vec!["Alice <alice@example.com>".to_string()],
            edition: "2021".to_string(),
        },
        dependency: (0..deps)
            .map(|i| Dependency {
                name: format!("dep-{}", i),
                version: format!("1.{}.0", i),
                optional: i % 3 == 0,
                features: vec!["std".to_string(), "serde".to_string()],
            })
            .collect(),
    }
}

const CALENDAR_DOC: &str = r#"
odt = 1979-05-27T07:32:00-08:00
ldt = 1979-05-27T07:32:00.999999
ld = 1979-05-27
lt = 00:32:00.999999
"#;

fn benchmark_loads(c: &mut Criterion) {
    let mut group = c.benchmark_group("loads");

    for size in [10, 100, 1000].iter() {
        let text = to_string(&manifest(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| loads(black_box(text)))
        });
    }

    group.bench_function("calendar", |b| b.iter(|| loads(black_box(CALENDAR_DOC))));
    group.finish();
}

fn benchmark_dumps(c: &mut Criterion) {
    let mut group = c.benchmark_group("dumps");

    for size in [10, 100, 1000].iter() {
        let text = to_string(&manifest(*size)).unwrap();
        let value = Value::Map(loads(&text).unwrap());
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| dumps(black_box(value)))
        });
    }

    group.finish();
}

fn benchmark_typed(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed");
    let data = manifest(100);
    let text = to_string(&data).unwrap();

    group.bench_function("to_string", |b| b.iter(|| to_string(black_box(&data))));
    group.bench_function("from_str", |b| {
        b.iter(|| from_str::<Manifest>(black_box(&text)))
    });
    group.bench_function("toml_crate_from_str", |b| {
        b.iter(|| toml::from_str::<Manifest>(black_box(&text)))
    });
    group.finish();
}

fn benchmark_wide_table(c: &mut Criterion) {
    let map: Map = (0..500)
        .map(|i| (format!("key_{}", i), Value::Integer(i)))
        .collect();
    let value = Value::Map(map);

    c.bench_function("roundtrip_wide_table", |b| {
        b.iter(|| {
            let text = dumps(black_box(&value)).unwrap();
            loads(&text).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_loads,
    benchmark_dumps,
    benchmark_typed,
    benchmark_wide_table
);
criterion_main!(benches);
