use super::*;
use crate::{
    animation::ease::Ease,
    animation::tween::{SurfaceState, Tween},
    foundation::core::Canvas,
    raster::image::{RasterImage, SubImage},
    render::surface::{DissolveRenderer, Stage},
};

fn fade() -> Tween<f64> {
    Tween {
        delay: 0.0,
        duration: 0.5,
        ease: Ease::Linear,
        from: 1.0,
        to: 0.0,
    }
}

fn surface_tween(delay: f64) -> Tween<SurfaceState> {
    Tween {
        delay,
        duration: 1.0,
        ease: Ease::OutQuad,
        from: SurfaceState::REST,
        to: SurfaceState {
            opacity: 0.0,
            ..SurfaceState::REST
        },
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<AnimationEvent>) -> Vec<AnimationEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

#[tokio::test(start_paused = true)]
async fn completion_waits_for_the_tail_surface() {
    let timeline = DissolveTimeline::plan(3, &DissolveParams::default(), &mut Rng64::new(1)).unwrap();
    let animator = DissolveAnimator::default();

    let start = tokio::time::Instant::now();
    let mut run = animator.run_timeline(timeline).unwrap();
    assert_eq!(run.tail_index(), 2);
    let mut events = run.take_events().unwrap();
    run.finished().await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(1200));
    let seen = drain(&mut events);
    assert_eq!(seen.last(), Some(&AnimationEvent::Finished { index: 2 }));
    for index in 0..3 {
        assert!(seen.contains(&AnimationEvent::Started { index }));
        assert!(seen.contains(&AnimationEvent::Finished { index }));
    }
}

#[tokio::test(start_paused = true)]
async fn completion_follows_index_not_wall_clock() {
    // Surface 0 is held back far past the tail; completion must not wait for it.
    let timeline = DissolveTimeline::from_tweens(
        vec![surface_tween(2.0), surface_tween(0.0), surface_tween(0.0)],
        fade(),
    )
    .unwrap();
    let animator = DissolveAnimator::default();

    let start = tokio::time::Instant::now();
    let mut run = animator.run_timeline(timeline).unwrap();
    let mut events = run.take_events().unwrap();
    run.finished().await.unwrap();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(2000));
    let seen = drain(&mut events);
    assert!(seen.contains(&AnimationEvent::Finished { index: 2 }));
    assert!(!seen.contains(&AnimationEvent::Finished { index: 0 }));
}

#[tokio::test(start_paused = true)]
async fn time_unit_scales_the_schedule() {
    let timeline = DissolveTimeline::plan(3, &DissolveParams::default(), &mut Rng64::new(1)).unwrap();
    let animator = DissolveAnimator::new(
        DissolveParams::default(),
        BlurParams::default(),
        Duration::from_millis(100),
    )
    .unwrap();

    let start = tokio::time::Instant::now();
    animator.run_timeline(timeline).unwrap().finished().await.unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(120));
    assert!(elapsed < Duration::from_millis(1200));
}

#[tokio::test(start_paused = true)]
async fn animate_blurs_every_surface_and_plans_one_tween_each() {
    let canvas = Canvas::new(8, 6).unwrap();
    let frame = RasterImage::from_fn(8, 6, |x, y| [x as u8 * 30, y as u8 * 40, 0, 255]);
    let parts: Vec<SubImage> =
        crate::partition::partitioner::partition(&frame, 5, &mut Rng64::new(2)).unwrap();
    let mut stage = Stage::new(canvas);
    DissolveRenderer::new(canvas).render(&parts, &mut stage).unwrap();

    let run = DissolveAnimator::default()
        .animate(&mut stage, &mut Rng64::new(3))
        .unwrap();
    assert!(stage.surfaces().iter().all(|s| s.is_blurred()));
    assert_eq!(run.timeline().len(), 5);
    assert_eq!(run.tail_index(), 4);
    run.finished().await.unwrap();
}

#[tokio::test]
async fn empty_stage_cannot_be_animated() {
    let mut stage = Stage::new(Canvas::new(2, 2).unwrap());
    let err = DissolveAnimator::default()
        .animate(&mut stage, &mut Rng64::new(0))
        .unwrap_err();
    assert!(matches!(err, VanishError::Animation(_)));
}

#[test]
fn missing_runtime_is_an_animation_error() {
    let timeline = DissolveTimeline::from_tweens(vec![surface_tween(0.0)], fade()).unwrap();
    let err = DissolveAnimator::default().run_timeline(timeline).unwrap_err();
    assert!(matches!(err, VanishError::Animation(_)));
}

#[tokio::test]
async fn dropped_tail_sender_fails_the_barrier() {
    let (barrier, tx) = TailBarrier::new(7);
    drop(tx);
    let err = barrier.wait().await.unwrap_err();
    assert!(err.to_string().contains("tail surface 7"));
}

#[test]
fn zero_time_unit_is_rejected() {
    assert!(
        DissolveAnimator::new(DissolveParams::default(), BlurParams::default(), Duration::ZERO)
            .is_err()
    );
}

#[tokio::test]
async fn oversized_delay_is_an_error_not_a_panic() {
    let timeline =
        DissolveTimeline::from_tweens(vec![surface_tween(0.0), surface_tween(1e18)], fade()).unwrap();
    let err = DissolveAnimator::default().run_timeline(timeline).unwrap_err();
    assert!(matches!(err, VanishError::Animation(_)));
    assert!(err.to_string().contains("surface 1 delay"));
}
