//! Benchmark – `jsonshape` typed decoding against `serde_json`
#![allow(missing_docs)]

use std::{fmt::Write, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsonshape::{Record, decode_value, from_slice, record};

record! {
    #[derive(Debug, Default, serde::Deserialize)]
    struct Profile {
        name: String,
        age: i64,
        email: String,
        active: bool,
        score: Option<f64>,
    }
}

record! {
    #[derive(Debug, Default, serde::Deserialize)]
    struct Document {
        id: i64,
        profiles: Vec<Profile>,
        tags: Vec<String>,
    }
}

/// Produce a deterministic document with `profiles` entries. Every other
/// profile carries an extra key that neither decoder declares.
fn make_payload(profiles: usize) -> String {
    let mut s = String::from(r#"{"id":1234,"tags":["foo","bar","baz"],"profiles":["#);
    for i in 0..profiles {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r#"{{"name":"user {i}","age":{},"email":"user{i}@example.com","active":{},"score":{}"#,
            i % 90,
            i % 2 == 0,
            if i % 3 == 0 { "null".to_string() } else { format!("{}.5", i) },
        )
        .unwrap();
        if i % 2 == 1 {
            s.push_str(r#","extra":{"nested":[1,2,{"deep":"value"}]}"#);
        }
        s.push('}');
    }
    s.push_str("]}");
    s
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for &profiles in &[10usize, 1_000] {
        let payload = make_payload(profiles);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("jsonshape", profiles),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let doc: Document = from_slice(black_box(payload.as_bytes())).unwrap();
                    black_box(doc);
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("jsonshape_value", profiles),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let tree =
                        decode_value(Document::schema(), black_box(payload.as_bytes())).unwrap();
                    black_box(tree);
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("serde_json", profiles),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let doc: Document = serde_json::from_slice(black_box(payload.as_bytes())).unwrap();
                    black_box(doc);
                });
            },
        );
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_decode }
criterion_main!(benches);
