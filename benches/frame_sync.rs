// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for the per-frame decisions of the playback loop.
//!
//! Measures the performance of:
//! - The sync step decision across steady, lagging and seeking audio
//! - A full wait/step/rearm cycle of the lag tracker
//! - Blit geometry for on-screen and partially clipped placements

use clip_player::domain::geometry::{compute_blit_geometry, Extent, Point, Rect};
use clip_player::domain::video::{resolve_sync_step, LagGrace};
use clip_player::video_player::FrameSync;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::time::Duration;
use tokio::time::Instant;

fn bench_resolve_sync_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_sync");

    // (want, cur, clagged): advance, lag, catch-up, seek
    let cases = [(11, 10, 0), (8, 10, 2), (9, 10, 2), (250, 10, 0)];
    group.bench_function("resolve_sync_step", |b| {
        b.iter(|| {
            for (want, cur, clagged) in cases {
                black_box(resolve_sync_step(
                    black_box(want),
                    black_box(cur),
                    black_box(clagged),
                ));
            }
        });
    });

    group.finish();
}

/// One simulated second of audio that stalls every fourth frame.
fn bench_sync_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_sync");
    let frame_wait = Duration::from_millis(40);

    group.bench_function("stalling_audio_25_frames", |b| {
        b.iter(|| {
            let now = Instant::now();
            let mut sync = FrameSync::new(LagGrace::default(), now, frame_wait);
            let mut cur = 0_i64;
            for tick in 1..=25_i64 {
                let want = if tick % 4 == 0 { cur } else { cur + 1 };
                if !sync.is_waiting(want, cur) || sync.is_expired(now + frame_wait) {
                    black_box(sync.step(want, cur));
                    cur += 1;
                    sync.rearm(now, frame_wait);
                }
            }
            black_box(sync.clagged());
        });
    });

    group.finish();
}

fn bench_blit_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_sync");
    let screen = Extent::new(320, 240);
    let context = Rect::new(16, 16, 288, 208);
    let clip = Extent::new(160, 120);

    group.bench_function("blit_geometry_inside", |b| {
        b.iter(|| compute_blit_geometry(black_box(clip), Point::new(40, 40), context, screen));
    });
    group.bench_function("blit_geometry_clipped", |b| {
        b.iter(|| compute_blit_geometry(black_box(clip), Point::new(-60, 150), context, screen));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_sync_step,
    bench_sync_cycle,
    bench_blit_geometry
);
criterion_main!(benches);
