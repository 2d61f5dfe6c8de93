//! # Gain Tuner Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use comms_if::sim::Telemetry;
use drive_lib::{
    drive_ctrl::DriveCtrl,
    frame_handler::handle_frame,
    gain_tuner::{GainTuner, Params},
};
use util::module::State;

fn gain_tuner_benchmark(c: &mut Criterion) {
    // ---- Build a synthetic error trace ----

    // One episode's worth of errors with the default window
    let params = Params::default();
    let errors: Vec<f64> = (0..(2 * params.window_ticks))
        .map(|i| (i as f64 * 0.05).sin() * 1.5)
        .collect();

    // ---- Benchmark ----

    c.bench_function("gain_tuner_episode", |b| {
        let mut tuner = GainTuner::new(&params);

        b.iter(|| {
            for e in errors.iter() {
                tuner.controller_mut().update(*e);
                black_box(tuner.controller().total_error());
                black_box(tuner.record(*e));
            }
        })
    });

    c.bench_function("drive_ctrl_proc", |b| {
        let mut drive_ctrl = DriveCtrl::default();
        let tlm = Telemetry {
            cross_track_error: 0.7598,
            speed: 18.2,
            steering_angle: -3.1,
        };

        b.iter(|| black_box(drive_ctrl.proc(black_box(&tlm))))
    });

    c.bench_function("handle_telemetry_frame", |b| {
        let mut drive_ctrl = DriveCtrl::default();
        let frame =
            r#"42["telemetry",{"cte":"0.7598","speed":"18.2000","steering_angle":"-3.1000"}]"#;

        b.iter(|| black_box(handle_frame(&mut drive_ctrl, black_box(frame)).is_ok()))
    });
}

criterion_group!(benches, gain_tuner_benchmark);
criterion_main!(benches);
