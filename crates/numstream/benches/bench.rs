use core::hint::black_box;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use numstream::{
    CompressionConfig, Framing, JsonArrayEncoder, MemorySink, MonotonicClock, NoPause, Record,
    RecordGenerator, SessionConfig, StreamCompressor, StreamSession, ThreadEntropy, TimeSource,
    take,
};
use tokio::runtime::Builder;

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of records generated per benchmark iteration.
const TOTAL_RECORDS: usize = 100_000;

fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator");
    group.throughput(Throughput::Elements(TOTAL_RECORDS as u64));

    group.bench_function("thread_entropy/monotonic_clock", |b| {
        b.iter(|| {
            let generator = RecordGenerator::new(ThreadEntropy, MonotonicClock::new());
            for record in take(generator, TOTAL_RECORDS) {
                black_box(record.unwrap());
            }
        });
    });

    group.bench_function("thread_entropy/fixed_clock", |b| {
        b.iter(|| {
            let generator =
                RecordGenerator::new(ThreadEntropy, FixedMockTime { millis: 1_735_689_600_000 });
            for record in take(generator, TOTAL_RECORDS) {
                black_box(record.unwrap());
            }
        });
    });

    group.finish();
}

fn bench_encoder(c: &mut Criterion) {
    let records: Vec<Record> = (0..TOTAL_RECORDS as u64)
        .map(|index| Record {
            index,
            time: 1_735_689_600_000 + index,
            number: u128::MAX - u128::from(index),
        })
        .collect();

    let mut group = c.benchmark_group("encoder");
    group.throughput(Throughput::Elements(TOTAL_RECORDS as u64));

    for framing in [Framing::LineDelimited, Framing::PrettyArray] {
        group.bench_with_input(BenchmarkId::from_parameter(framing), &records, |b, records| {
            b.iter(|| {
                let mut encoder = JsonArrayEncoder::new(framing);
                let mut out = Vec::with_capacity(256 * 2_000);
                for (i, record) in records.iter().enumerate() {
                    encoder.encode(record, &mut out).unwrap();
                    if i % 2_000 == 0 {
                        black_box(&out);
                        out.clear();
                    }
                }
                encoder.close(&mut out).unwrap();
                black_box(out);
            });
        });
    }

    group.finish();
}

fn bench_compressor(c: &mut Criterion) {
    let mut encoder = JsonArrayEncoder::new(Framing::PrettyArray);
    let mut text = Vec::new();
    for index in 0..2_000 {
        let record = Record {
            index,
            time: 1_735_689_600_000,
            number: u128::from(index).wrapping_mul(0x9E37_79B9_7F4A_7C15),
        };
        encoder.encode(&record, &mut text).unwrap();
    }

    let mut group = c.benchmark_group("compressor");
    group.throughput(Throughput::Bytes(text.len() as u64));

    for level in [1, 6, 9] {
        group.bench_with_input(BenchmarkId::new("level", level), &text, |b, text| {
            b.iter(|| {
                let mut compressor = StreamCompressor::new(CompressionConfig {
                    level,
                    ..CompressionConfig::default()
                });
                black_box(compressor.submit(text).unwrap());
                black_box(compressor.finish().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let rt = Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("failed to build runtime");

    let mut group = c.benchmark_group("session");
    group.throughput(Throughput::Elements(TOTAL_RECORDS as u64));
    group.sample_size(10);

    let configs = [
        ("compressed_array", SessionConfig::compressed_array()),
        (
            "plain_array",
            SessionConfig {
                compression: None,
                ..SessionConfig::compressed_array()
            },
        ),
    ];

    for (name, config) in configs {
        group.bench_function(name, |b| {
            b.to_async(&rt).iter(|| async move {
                let records = take(
                    RecordGenerator::new(ThreadEntropy, MonotonicClock::new()),
                    TOTAL_RECORDS,
                );
                let report = StreamSession::new(MemorySink::new(), config, NoPause)
                    .run(records)
                    .await
                    .unwrap();
                black_box(report);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generator,
    bench_encoder,
    bench_compressor,
    bench_session
);
criterion_main!(benches);
