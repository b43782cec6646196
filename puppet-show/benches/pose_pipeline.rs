//! Criterion benchmarks for the per-frame hot paths
//!
//! Covers: feature extraction, recorder gating, ring buffer hand-off and
//! interpolated playback ticks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector3;
use puppet_show::capture::ring_buffer::PoseRingBuffer;
use puppet_show::capture::types::{HandSide, RawPose, LANDMARK_COUNT};
use puppet_show::features::{extract_features, HandFeatures};
use puppet_show::playback::{PlaybackMode, PlaybackScheduler};
use puppet_show::recorder::PoseRecorder;
use puppet_show::workflow::{Keyframe, Recording};
use std::sync::Arc;

fn make_pose(step: u64, side: HandSide) -> RawPose {
    let phase = step as f64 * 0.1;
    let positions: [Vector3<f64>; LANDMARK_COUNT] = std::array::from_fn(|i| {
        let t = i as f64;
        Vector3::new(0.01 * t + 0.03 * phase.sin(), 0.02 * (i / 4) as f64, 0.002 * t)
    });
    RawPose::new(0.9, positions, side, step as f64 * 20.0)
}

fn make_recording(keyframes: usize) -> Recording {
    let frames: Vec<HandFeatures> = (0..keyframes as u64)
        .map(|i| extract_features(&make_pose(i, HandSide::Left)))
        .collect();

    let mut recording = Recording::default();
    for (i, f) in frames.iter().enumerate() {
        let timestamp = i as f64 * 20.0;
        recording.left.push(Keyframe { hand_features: *f, side: HandSide::Left, timestamp });
        recording.right.push(Keyframe { hand_features: *f, side: HandSide::Right, timestamp: timestamp + 7.0 });
    }
    recording.duration = keyframes as f64 * 20.0;
    recording
}

// ---------------------------------------------------------------------------
// Feature extraction
// ---------------------------------------------------------------------------

fn bench_extract_features(c: &mut Criterion) {
    let pose = make_pose(3, HandSide::Right);

    c.bench_function("extract_features", |b| {
        b.iter(|| black_box(extract_features(black_box(&pose))));
    });
}

// ---------------------------------------------------------------------------
// Recorder gating
// ---------------------------------------------------------------------------

fn bench_recorder_gating(c: &mut Criterion) {
    let mut group = c.benchmark_group("recorder_record");
    for count in [100u64, 1000] {
        let poses: Vec<RawPose> = (0..count)
            .flat_map(|i| [make_pose(i, HandSide::Left), make_pose(i, HandSide::Right)])
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &poses, |b, poses| {
            b.iter(|| {
                let mut recorder = PoseRecorder::default();
                recorder.start(0.0);
                for pose in poses {
                    black_box(recorder.record(pose.clone()));
                }
                recorder.stop(count as f64 * 20.0);
                black_box(recorder.recording().len());
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Ring buffer
// ---------------------------------------------------------------------------

fn bench_ring_buffer_pop_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("pose_ring_buffer_pop_batch");
    for batch_size in [16usize, 64, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &size| {
                let buffer = PoseRingBuffer::with_capacity(1024);
                let (mut producer, mut consumer) = buffer.split();
                let pose = make_pose(0, HandSide::Left);

                b.iter(|| {
                    for _ in 0..size {
                        producer.push(pose.clone());
                    }
                    black_box(consumer.pop_batch(black_box(size)));
                });
            },
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Playback ticks
// ---------------------------------------------------------------------------

fn bench_playback_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback_session");
    for mode in [PlaybackMode::Nearest, PlaybackMode::Interpolated] {
        let recording = Arc::new(make_recording(500));
        let duration = recording.duration;

        group.bench_with_input(BenchmarkId::new(mode.as_str(), 500), &recording, |b, recording| {
            b.iter(|| {
                let mut scheduler = PlaybackScheduler::new(mode);
                scheduler.play(Arc::clone(recording), 0.0);
                let mut now = 0.0;
                while now <= duration + 16.0 {
                    black_box(scheduler.advance(now));
                    now += 16.0;
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_extract_features,
    bench_recorder_gating,
    bench_ring_buffer_pop_batch,
    bench_playback_ticks,
);
criterion_main!(benches);
