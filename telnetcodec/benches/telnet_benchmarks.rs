//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Benchmarks for record framing in the telnet codec

use bytes::BytesMut;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tn3270_telnetcodec::{TelnetCodec, TelnetEvent, TelnetFrame, consts};
use tokio_util::codec::{Decoder, Encoder};

/// Build a record body of `size` bytes with an IAC every 64 bytes.
fn record_body(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| if i % 64 == 63 { consts::IAC } else { 0x40 + (i % 48) as u8 })
        .collect()
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encode_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_record");

    for size in [80usize, 1920, 3564].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        let body = record_body(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &body, |b, body| {
            let mut codec = TelnetCodec::new();
            let mut buffer = BytesMut::with_capacity(body.len() * 2 + 2);

            b.iter(|| {
                buffer.clear();
                for &byte in body {
                    codec.encode(black_box(byte), &mut buffer).unwrap();
                }
                codec.encode(TelnetFrame::EndOfRecord, &mut buffer).unwrap();
            });
        });
    }

    group.finish();
}

// ============================================================================
// Decoding Benchmarks
// ============================================================================

fn bench_decode_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_record");

    for size in [80usize, 1920, 3564].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        let mut wire = BytesMut::new();
        let mut encoder = TelnetCodec::new();
        for byte in record_body(*size) {
            encoder.encode(byte, &mut wire).unwrap();
        }
        encoder.encode(TelnetFrame::EndOfRecord, &mut wire).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &wire, |b, wire| {
            let mut codec = TelnetCodec::new();

            b.iter(|| {
                let mut src = wire.clone();
                let mut count = 0usize;
                while let Some(event) = codec.decode(&mut src).unwrap() {
                    if let TelnetEvent::EndOfRecord = event {
                        break;
                    }
                    count += 1;
                }
                black_box(count)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode_record, bench_decode_record);
criterion_main!(benches);
