use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use servicemsg::{events, parse_message, Event};

const SINGLE: &str = "##teamcity[testFailed name='suite.case' message='expected |'a|' got |'b|'' details='at foo|nat bar' flowId='7' timestamp='2023-04-07T12:52:00.654+0200']";

fn mixed_log(messages: usize) -> String {
    let mut log = String::new();
    for i in 0..messages {
        log.push_str("compiling crate ");
        log.push_str(&i.to_string());
        log.push('\n');
        log.push_str(&format!("##teamcity[testStarted name='t{i}' flowId='{i}']\n"));
        log.push_str(&format!("##teamcity[testFinished name='t{i}' duration='{i}']\n"));
    }
    log
}

fn parse_single(c: &mut Criterion) {
    c.bench_function("parse_message", |b| {
        b.iter(|| {
            let _ = parse_message(SINGLE);
        })
    });

    let message = parse_message(SINGLE).ok().flatten();
    c.bench_function("to_wire", |b| {
        b.iter(|| message.as_ref().map(ToString::to_string))
    });
}

fn parse_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");

    for messages in [10, 100, 1000] {
        let log = mixed_log(messages);
        group.throughput(Throughput::Bytes(log.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(messages), &log, |b, log| {
            b.iter(|| {
                events(log)
                    .filter(|event| matches!(event, Event::Message(_)))
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, parse_single, parse_mixed);
criterion_main!(benches);
