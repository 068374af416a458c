//! End-to-end determinism check for the camera precomputer: the same
//! `(EDL, effects, recordings, fps)` must always produce the same table,
//! and every center it emits must respect the edge-clamp invariant
//! (spec.md §8).

use camwright_platform_core::CaptureArea;
use camwright_processing_core::camera::Overscan;
use camwright_processing_core::camera_precompute::{precompute_camera_path, PrecomputeInput};
use camwright_processing_core::frame_layout::build_frame_layout;
use camwright_project_model::{Clip, Effect, EffectPayload, MouseEvent, Recording, RecordingSet, ZoomBlock};

fn build_fixture() -> (RecordingSet, Vec<camwright_processing_core::frame_layout::FrameLayoutItem>, Vec<Effect>) {
    let mut recordings = RecordingSet::new();
    let mut recording = Recording::new("r1", 1920, 1080, 1000.0);
    recording.capture_area = Some(CaptureArea {
        full_bounds_width: 1920,
        full_bounds_height: 1080,
        scale_factor: 1.0,
    });
    recording.mouse_events = vec![
        MouseEvent::new(0.0, 960.0, 540.0),
        MouseEvent::new(300.0, 1400.0, 540.0),
        MouseEvent::new(700.0, 1400.0, 540.0),
        MouseEvent::new(1000.0, 960.0, 540.0),
    ];
    recordings.insert("r1".to_string(), recording);

    let clip = Clip::new("c1", "r1", 0.0, 1000.0, 0.0);
    let layout = build_frame_layout(&[clip], 30).unwrap();

    let effects = vec![Effect {
        id: "zoom-1".to_string(),
        start_time: 0.0,
        end_time: 1000.0,
        enabled: true,
        payload: EffectPayload::Zoom(ZoomBlock::new(2.0)),
    }];

    (recordings, layout, effects)
}

fn run() -> Vec<camwright_processing_core::CameraOutput> {
    let (recordings, layout, effects) = build_fixture();
    precompute_camera_path(PrecomputeInput {
        total_frames: 30,
        fps: 30,
        layout: &layout,
        recordings: &recordings,
        timeline_effects: &effects,
        output_aspect: 16.0 / 9.0,
        overscan: Overscan::NONE,
    })
}

#[test]
fn precomputed_path_is_bit_identical_across_runs() {
    let first = run();
    let second = run();
    assert_eq!(first, second);
}

#[test]
fn every_frame_center_respects_the_edge_clamp_invariant() {
    let table = run();
    assert_eq!(table.len(), 30);
    for (i, frame) in table.iter().enumerate() {
        let half = 0.5 / frame.scale.max(0.0001);
        assert!(
            frame.center.x >= half - 1e-6 && frame.center.x <= 1.0 - half + 1e-6,
            "frame {i} center.x {} out of bounds for half {half}",
            frame.center.x
        );
        assert!(
            frame.center.y >= half - 1e-6 && frame.center.y <= 1.0 - half + 1e-6,
            "frame {i} center.y {} out of bounds for half {half}",
            frame.center.y
        );
    }
}
