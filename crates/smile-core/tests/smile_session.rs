use smilecount_common::error::SmileError;
use smilecount_core::{ReplaySource, Session, SmileTracker, TickOutcome, TrackerOptions};
use smilecount_face_model::frame::parse_frames;

const TWO_FACE_STREAM: &str = r#"# {"schema_version":"1.0","source":"fixture","fps":30}
{"t":0,"videoTime":0.000,"faceBlendshapes":[{"categories":[{"categoryName":"mouthSmileLeft","score":0.1},{"categoryName":"mouthSmileRight","score":0.1}]}]}
{"t":33333333,"videoTime":0.033,"faceBlendshapes":[{"categories":[{"categoryName":"mouthSmileLeft","score":0.6},{"categoryName":"mouthSmileRight","score":0.4}]},{"categories":[{"categoryName":"mouthSmileLeft","score":0.2},{"categoryName":"mouthSmileRight","score":0.2}]}]}
{"t":50000000,"videoTime":0.033,"faceBlendshapes":[{"categories":[{"categoryName":"mouthSmileLeft","score":0.0},{"categoryName":"mouthSmileRight","score":0.0}]}]}
{"t":66666666,"videoTime":0.066,"faceBlendshapes":[{"categories":[{"categoryName":"mouthSmileLeft","score":0.7},{"categoryName":"mouthSmileRight","score":0.7}]},{"categories":[{"categoryName":"mouthSmileLeft","score":0.9}]}]}
{"t":100000000,"videoTime":0.100,"faceBlendshapes":[{"categories":[{"categoryName":"mouthSmileLeft","score":0.3},{"categoryName":"mouthSmileRight","score":0.3}]}]}
{"t":133333333,"videoTime":0.133,"faceBlendshapes":[{"categories":[{"categoryName":"mouthSmileLeft","score":0.8},{"categoryName":"mouthSmileRight","score":0.8}]},{"categories":[{"categoryName":"mouthSmileLeft","score":0.5},{"categoryName":"mouthSmileRight","score":0.7}]}]}
"#;

#[test]
fn replayed_stream_counts_smiles_per_slot() {
    let frames = parse_frames(TWO_FACE_STREAM).unwrap();
    let mut session = Session::start(ReplaySource::new(frames), TrackerOptions::default()).unwrap();
    session.run_to_end().unwrap();

    let stats = session.stats();
    assert_eq!(stats.frames_processed, 5);
    assert_eq!(stats.duplicate_frames, 1);
    assert_eq!(stats.faces_skipped, 1);

    let slots = session.snapshot();
    assert_eq!(slots.len(), 2);
    // Face 1: 0.1, 0.5, 0.7, 0.3, 0.8 -> edges at 0.5 and 0.8.
    assert_eq!(slots[0].count, 2);
    assert!((slots[0].score - 0.8).abs() < 1e-9);
    // Face 2: 0.2, (skipped), absent, 0.6 -> one edge.
    assert_eq!(slots[1].count, 1);
    assert!((slots[1].score - 0.6).abs() < 1e-9);
}

#[test]
fn missing_category_leaves_slot_untouched_mid_stream() {
    let frames = parse_frames(TWO_FACE_STREAM).unwrap();
    let mut session = Session::start(ReplaySource::new(frames), TrackerOptions::default()).unwrap();

    // Ticks through the frame where face 2 lacks mouthSmileRight.
    for _ in 0..4 {
        session.tick().unwrap();
    }
    let slot = session.tracker().slot(1).copied().unwrap();
    assert!((slot.score - 0.2).abs() < 1e-9);
    assert_eq!(slot.count, 0);
    assert_eq!(session.tracker().slot(0).unwrap().count, 1);
}

#[test]
fn slots_persist_after_faces_leave() {
    let mut tracker = SmileTracker::with_defaults();
    tracker.update(2, 0.5);
    assert_eq!(tracker.len(), 3);

    let before = tracker.snapshot();
    tracker.update(0, 0.9);
    let after = tracker.snapshot();

    assert_eq!(after.len(), 3);
    assert_eq!(before[1], after[1]);
    assert_eq!(before[2], after[2]);
}

#[test]
fn session_start_fails_without_upstream() {
    let source = ReplaySource::new(Vec::new()).unavailable("camera permission denied");
    match Session::start(source, TrackerOptions::default()) {
        Err(SmileError::UpstreamUnavailable { message }) => {
            assert!(message.contains("camera permission denied"))
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("session should not start"),
    }
}

#[test]
fn transient_failures_preserve_counts() {
    let frames = parse_frames(TWO_FACE_STREAM).unwrap();
    let mut session =
        Session::start(ReplaySource::new(frames).failing_at([0, 2, 4]), TrackerOptions::default())
            .unwrap();

    let mut failed = 0;
    loop {
        match session.tick().unwrap() {
            TickOutcome::Failed => failed += 1,
            TickOutcome::Ended => break,
            _ => {}
        }
    }
    assert_eq!(failed, 3);
    assert_eq!(session.stats().failed_frames, 3);
    // The 0.3 frame failed, so face 1 never re-armed before the 0.8.
    assert_eq!(session.snapshot()[0].count, 1);
}

mod properties {
    use proptest::prelude::*;
    use smilecount_core::{FrameProcessor, SmileTracker};
    use smilecount_face_model::blendshape::{
        Category, DetectionResult, FaceBlendshapes, MOUTH_SMILE_LEFT,
    };

    fn rising_edges(scores: &[f64], threshold: f64) -> u64 {
        let mut above = false;
        let mut edges = 0;
        for &s in scores {
            let now = s > threshold;
            if now && !above {
                edges += 1;
            }
            above = now;
        }
        edges
    }

    proptest! {
        #[test]
        fn count_never_decreases(scores in prop::collection::vec(0.0f64..=1.0, 0..200)) {
            let mut tracker = SmileTracker::with_defaults();
            let mut last = 0;
            for score in scores {
                tracker.update(0, score);
                let count = tracker.slot(0).unwrap().count;
                prop_assert!(count >= last);
                last = count;
            }
        }

        #[test]
        fn count_equals_rising_edges(scores in prop::collection::vec(0.0f64..=1.0, 0..200)) {
            let mut tracker = SmileTracker::with_defaults();
            for &score in &scores {
                tracker.update(0, score);
            }
            let count = tracker.slot(0).map(|s| s.count).unwrap_or(0);
            prop_assert_eq!(count, rising_edges(&scores, 0.4));
        }

        #[test]
        fn slots_only_grow(indices in prop::collection::vec(0usize..8, 1..100)) {
            let mut tracker = SmileTracker::with_defaults();
            let mut max_seen = 0;
            for index in indices {
                let before = tracker.len();
                tracker.update(index, 0.5);
                max_seen = max_seen.max(index + 1);
                prop_assert!(tracker.len() >= before);
                prop_assert_eq!(tracker.len(), max_seen);
            }
        }

        #[test]
        fn slots_cover_every_face_in_frame(
            frames in prop::collection::vec(
                prop::collection::vec((0.0f64..=1.0, any::<bool>()), 0..5),
                1..50,
            )
        ) {
            let mut tracker = SmileTracker::with_defaults();
            let processor = FrameProcessor::default();
            let mut max_faces = 0;
            for faces in frames {
                let batch = DetectionResult::new(
                    faces
                        .iter()
                        .map(|&(score, complete)| {
                            if complete {
                                FaceBlendshapes::smile(score, score)
                            } else {
                                FaceBlendshapes::new(vec![Category::new(MOUTH_SMILE_LEFT, score)])
                            }
                        })
                        .collect(),
                );
                max_faces = max_faces.max(batch.face_count());
                processor.process(&mut tracker, &batch);
                prop_assert!(tracker.len() >= batch.face_count());
                prop_assert_eq!(tracker.len(), max_faces);
            }
        }
    }
}
