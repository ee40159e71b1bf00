use criterion::{criterion_group, criterion_main, Criterion};

fn parse_timestamp(c: &mut Criterion) {
    let input = r#"2023-04-07T12:52:00.654+0200"#;
    let mut group = c.benchmark_group("timestamp");

    group.bench_function("own", |b| {
        b.iter(|| {
            let _ = servicemsg::Timestamp::parse(input);
        })
    });

    group.bench_function("chrono", |b| {
        b.iter(|| {
            let _ = chrono::DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.3f%z");
        })
    });

    group.finish();
}

fn format_timestamp(c: &mut Criterion) {
    let Ok(timestamp) = servicemsg::Timestamp::parse("2023-04-07T12:52:00.654+0200") else {
        return;
    };
    let instant = timestamp.instant();
    let mut group = c.benchmark_group("format");

    group.bench_function("own", |b| {
        b.iter(|| servicemsg::format_timestamp(&instant))
    });

    group.bench_function("chrono", |b| {
        b.iter(|| instant.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string())
    });

    group.finish();
}

criterion_group!(benches, parse_timestamp, format_timestamp);
criterion_main!(benches);
