use super::*;
use crate::{
    animation::timeline::DissolveParams,
    foundation::core::Canvas,
    foundation::math::Rng64,
    partition::partitioner::partition,
    raster::image::RasterImage,
    render::surface::{Backdrop, DissolveRenderer},
};

fn staged(count: usize) -> (Stage, DissolveTimeline, RasterImage) {
    let canvas = Canvas::new(10, 8).unwrap();
    let image = RasterImage::from_fn(10, 8, |x, y| [x as u8 * 20, y as u8 * 25, 90, 255]);
    let parts = partition(&image, count, &mut Rng64::new(1)).unwrap();
    let mut stage = Stage::new(canvas);
    DissolveRenderer::new(canvas).render(&parts, &mut stage).unwrap();
    let timeline =
        DissolveTimeline::plan(count, &DissolveParams::default(), &mut Rng64::new(2)).unwrap();
    (stage, timeline, image)
}

#[test]
fn first_frame_reassembles_the_capture() {
    let (stage, timeline, image) = staged(4);
    let frame = render_stage_frame(&stage, &timeline, 0.0).unwrap();
    assert_eq!((frame.width, frame.height), (10, 8));
    assert_eq!(frame.data, image.data());
}

#[test]
fn backdrop_alone_shows_the_capture_at_t0() {
    let (mut stage, timeline, image) = staged(2);
    stage.set_backdrop(Backdrop::from_raster(&image));
    let frame = render_stage_frame(&stage, &timeline, 0.0).unwrap();
    assert_eq!(frame.data, image.data());
}

#[test]
fn last_frame_is_blank() {
    let (mut stage, timeline, image) = staged(3);
    stage.set_backdrop(Backdrop::from_raster(&image));
    let end = timeline.total_duration();
    let frame = render_stage_frame(&stage, &timeline, end).unwrap();
    assert!(frame.is_blank());
}

#[test]
fn mismatched_timeline_is_rejected() {
    let (stage, _, _) = staged(3);
    let other = DissolveTimeline::plan(2, &DissolveParams::default(), &mut Rng64::new(0)).unwrap();
    assert!(render_stage_frame(&stage, &other, 0.0).is_err());
}

#[test]
fn frame_times_cover_the_whole_timeline() {
    let (_, timeline, _) = staged(3);
    let times = frame_times(&timeline, 10).unwrap();
    assert_eq!(times.first(), Some(&0.0));
    assert_eq!(*times.last().unwrap(), timeline.total_duration());
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert!(frame_times(&timeline, 0).is_err());
}

#[test]
fn render_dissolve_frames_matches_frame_times() {
    let (stage, timeline, _) = staged(2);
    let frames = render_dissolve_frames(&stage, &timeline, 5).unwrap();
    assert_eq!(frames.len(), frame_times(&timeline, 5).unwrap().len());
    assert!(frames.iter().all(|f| f.width == 10 && f.height == 8));
}

#[test]
fn endless_timeline_is_refused() {
    let timeline = DissolveTimeline::plan(
        3,
        &DissolveParams {
            stagger: 1e12,
            ..DissolveParams::default()
        },
        &mut Rng64::new(0),
    )
    .unwrap();
    let err = frame_times(&timeline, 30).unwrap_err();
    assert!(matches!(err, VanishError::Validation(_)));
}
