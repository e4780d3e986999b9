//! Criterion benchmark for the write engine and successive
//! `read_next_block` calls over a small synthetic stripe.
//!
//! Run with:
//!   cargo bench --bench stripe_io

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scatgat::config::StripeConfig;
use scatgat::StripePlan;
use tempfile::TempDir;

const PACKET_SIZE: u32 = 8192;

fn make_frame(secs_inre: u32, df_num_insec: u32) -> Vec<u8> {
    let mut buf = vec![0u8; PACKET_SIZE as usize];
    let word0 = secs_inre & 0x3FFF_FFFF;
    let word1 = df_num_insec & 0x00FF_FFFF;
    let df_len = PACKET_SIZE / 8;
    buf[0..4].copy_from_slice(&word0.to_le_bytes());
    buf[4..8].copy_from_slice(&word1.to_le_bytes());
    buf[8..12].copy_from_slice(&df_len.to_le_bytes());
    buf
}

fn make_stream(n_frames: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(n_frames as usize * PACKET_SIZE as usize);
    for i in 0..n_frames {
        out.extend_from_slice(&make_frame(100, i));
    }
    out
}

fn template(dir: &TempDir) -> String {
    format!("{}/{{module}}_{{disk}}_{{pattern}}.sg", dir.path().display())
}

fn bench_write_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_frames");

    for &n_frames in &[256u32, 1024] {
        let stream = make_stream(n_frames);
        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::new("write", n_frames), &stream, |b, stream| {
            b.iter(|| {
                let dir = TempDir::new().unwrap();
                let cfg = StripeConfig {
                    wblock_size: 64 * PACKET_SIZE as u64,
                    initial_size_in_blocks: 4,
                    growth_size_in_blocks: 4,
                    max_fanout: 8,
                };
                let mut plan =
                    StripePlan::build_write_plan(&template(&dir), "bench", &[1], &[1, 2, 3, 4], cfg)
                        .unwrap();
                plan.write_frames(stream, stream.len() as u64 / PACKET_SIZE as u64)
                    .unwrap();
                plan.close_write().unwrap();
            });
        });
    }

    group.finish();
}

fn bench_read_next_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_next_block");

    let n_frames = 1024u32;
    let stream = make_stream(n_frames);
    let cfg = StripeConfig {
        wblock_size: 64 * PACKET_SIZE as u64,
        initial_size_in_blocks: 4,
        growth_size_in_blocks: 4,
        max_fanout: 8,
    };

    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.bench_function("read_after_write", |b| {
        b.iter(|| {
            let dir = TempDir::new().unwrap();
            let tmpl = template(&dir);
            let mut write_plan =
                StripePlan::build_write_plan(&tmpl, "bench", &[1], &[1, 2, 3, 4], cfg).unwrap();
            write_plan
                .write_frames(&stream, n_frames as u64)
                .unwrap();
            write_plan.close_write().unwrap();
            write_plan.free();

            let mut read_plan = StripePlan::build_read_plan(&tmpl, "bench", &[1], &[1, 2, 3, 4], cfg).unwrap();
            let mut out = Vec::with_capacity(stream.len());
            loop {
                let n = read_plan.read_next_block(&mut out).unwrap();
                if n == 0 {
                    break;
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_write_frames, bench_read_next_block);
criterion_main!(benches);
