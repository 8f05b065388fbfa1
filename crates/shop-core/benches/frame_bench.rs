//! Criterion benchmarks for the realtime frame codec.
//!
//! Every inbound event passes through `decode_frame` on the reader task before
//! it is dispatched, so decode latency directly bounds dispatch throughput.
//!
//! Run with:
//! ```bash
//! cargo bench --package shop-core --bench frame_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use shop_core::protocol::{
    decode_frame, encode_frame, ChannelFrame, InboundEvent, OrderStatusChanged, OutboundEvent,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn order_status_text() -> String {
    r#"{"event":"orderStatusChanged","data":{"orderId":"6650f1c2a9","status":"delivered"}}"#
        .to_string()
}

fn connect_text() -> String {
    r#"{"event":"connect","data":{"socketId":"Xw3k9Pq0aZ"}}"#.to_string()
}

fn bulky_text(items: usize) -> String {
    let lines: Vec<_> = (0..items)
        .map(|i| json!({"productId": format!("p{i}"), "quantity": i, "price": 9.99}))
        .collect();
    let frame = ChannelFrame::new("cartUpdated", json!({ "items": lines }));
    serde_json::to_string(&frame).unwrap()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_frame");

    let fixtures = [
        ("connect", connect_text()),
        ("orderStatusChanged", order_status_text()),
        ("cart_50_items", bulky_text(50)),
    ];
    for (name, text) in &fixtures {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| decode_frame(black_box(text)).unwrap())
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frame");

    let register = OutboundEvent::register("64f0c0ffee", "Xw3k9Pq0aZ").into_frame();
    group.bench_function("registerUser", |b| {
        b.iter(|| encode_frame(black_box(&register)).unwrap())
    });

    group.finish();
}

fn bench_typed_dispatch_path(c: &mut Criterion) {
    // Full inbound path: text → frame → InboundEvent → typed payload.
    let text = order_status_text();
    c.bench_function("order_status_decode_typed", |b| {
        b.iter(|| {
            let frame = decode_frame(black_box(&text)).unwrap();
            let event = InboundEvent::from(frame);
            event.decode::<OrderStatusChanged>().unwrap()
        })
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_typed_dispatch_path);
criterion_main!(benches);
