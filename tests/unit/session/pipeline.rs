use super::*;
use crate::{
    capture::source::StillSource,
    foundation::core::Canvas,
    foundation::error::VanishError,
    gate::classifier::ScriptedClassifier,
    gate::expression::DetectionResult,
    raster::image::RasterImage,
    session::session::SessionState,
};

fn small_config() -> VanishConfig {
    VanishConfig {
        partition_count: 6,
        canvas: Canvas::new(10, 8).unwrap(),
        seed: Some(11),
        ..VanishConfig::default()
    }
}

fn still() -> StillSource {
    StillSource::new(RasterImage::from_fn(10, 8, |x, y| {
        [x as u8 * 20, y as u8 * 30, 90, 255]
    }))
}

#[tokio::test(start_paused = true)]
async fn smile_triggers_exactly_one_dissolve() {
    let script = ScriptedClassifier::new(vec![
        vec![DetectionResult::with_happy(0.4)],
        vec![],
        vec![DetectionResult::with_happy(0.95)],
        vec![DetectionResult::with_happy(0.99)],
    ]);
    let mut source = still();

    let outcome = run_pipeline(&mut source, script, &small_config())
        .await
        .unwrap();
    assert!(outcome.vanished());
    let PipelineOutcome::Vanished(session) = outcome else {
        panic!("expected a dissolve");
    };
    assert_eq!(session.state(), SessionState::Vanished);
    assert_eq!(session.stage().len(), 6);
    assert!(source.is_paused());
}

#[tokio::test(start_paused = true)]
async fn stream_without_smile_ends_quietly() {
    let script = ScriptedClassifier::new(vec![
        vec![DetectionResult::with_happy(0.9)],
        vec![],
        vec![DetectionResult::default()],
    ]);
    let mut source = still();

    let outcome = run_pipeline(&mut source, script, &small_config())
        .await
        .unwrap();
    assert!(matches!(outcome, PipelineOutcome::StreamEnded { cycles: 3 }));
    assert!(!source.is_paused());
}

#[tokio::test(start_paused = true)]
async fn trigger_on_a_pending_source_fails() {
    let script = ScriptedClassifier::new(vec![vec![DetectionResult::with_happy(1.0)]]);
    let mut source = StillSource::pending();

    let err = run_pipeline(&mut source, script, &small_config())
        .await
        .unwrap_err();
    assert!(matches!(err, VanishError::SourceNotReady(_)));
}

#[tokio::test]
async fn invalid_config_is_rejected_up_front() {
    let config = VanishConfig {
        partition_count: 0,
        ..VanishConfig::default()
    };
    let err = run_pipeline(&mut still(), ScriptedClassifier::default(), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, VanishError::InvalidConfiguration(_)));
}
