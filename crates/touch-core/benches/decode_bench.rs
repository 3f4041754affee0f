//! Criterion benchmarks for touch frame decoding.
//!
//! Raw touch streams can exceed several hundred frames per second, and every
//! frame is decoded even when the rate gate drops the tick, so decoding must
//! stay far below the per-frame budget.
//!
//! Run with:
//! ```bash
//! cargo bench --package touch-core --bench decode_bench
//! ```

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use touch_core::protocol::frame::{ABS_PRESSURE, ABS_X, ABS_Y};
use touch_core::{ByteOrder, DeviceState, FrameDecoder, FrameFields, FrameReader, RawFrame};

fn make_frames(count: usize) -> Vec<u8> {
    let cycle = [
        FrameFields::abs(ABS_X, 10_483),
        FrameFields::abs(ABS_Y, 7_862),
        FrameFields::abs(ABS_PRESSURE, 3_500),
        FrameFields {
            event_type: 0,
            event_code: 0,
            value: 0,
        },
    ];
    cycle
        .iter()
        .cycle()
        .take(count)
        .flat_map(|f| *RawFrame::from_fields(*f, ByteOrder::Native).as_bytes())
        .collect()
}

fn bench_decode_single(c: &mut Criterion) {
    let decoder = FrameDecoder::default();
    let mut group = c.benchmark_group("decode_single");

    for (name, fields) in [
        ("abs_x", FrameFields::abs(ABS_X, 10_483)),
        ("pressure", FrameFields::abs(ABS_PRESSURE, 3_500)),
        (
            "ignored",
            FrameFields {
                event_type: 1,
                event_code: 330,
                value: 1,
            },
        ),
    ] {
        let frame = RawFrame::from_fields(fields, ByteOrder::Native);
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            let mut state = DeviceState::new();
            b.iter(|| decoder.decode(black_box(&frame), &mut state));
        });
    }
    group.finish();
}

fn bench_read_and_decode_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_and_decode_stream");

    for count in [64usize, 1024] {
        let bytes = make_frames(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &bytes, |b, bytes| {
            let decoder = FrameDecoder::default();
            b.iter(|| {
                let mut state = DeviceState::new();
                for frame in FrameReader::new(Cursor::new(bytes.as_slice())).flatten() {
                    decoder.decode(&frame, &mut state);
                }
                black_box(state)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode_single, bench_read_and_decode_stream);
criterion_main!(benches);
