use std::path::Path;

use crate::{
    animation::timeline::DissolveTimeline,
    foundation::core::Transform2D,
    foundation::error::{VanishError, VanishResult},
    raster::image::save_rgba8_png,
    render::composite::draw_layer,
    render::surface::Stage,
};

/// One composited frame. `data` is premultiplied RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn save_png(&self, path: &Path) -> VanishResult<()> {
        save_rgba8_png(path, &self.data, self.width, self.height)
    }

    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// Composite the stage at animation time `t` (time units).
///
/// Backdrop first with its fade, then surfaces bottom to top with their sampled state.
pub fn render_stage_frame(
    stage: &Stage,
    timeline: &DissolveTimeline,
    t: f64,
) -> VanishResult<FrameRGBA> {
    if timeline.len() != stage.len() {
        return Err(VanishError::render(format!(
            "timeline has {} tweens for {} surfaces",
            timeline.len(),
            stage.len()
        )));
    }

    let canvas = stage.canvas();
    let mut data = vec![0u8; canvas.rgba_len()];

    if let Some(backdrop) = stage.backdrop() {
        let opacity = timeline.backdrop_opacity(t) as f32;
        draw_layer(
            &mut data,
            canvas,
            backdrop.layer(),
            Transform2D::default().to_affine(),
            opacity,
        )?;
    }

    for surface in stage.surfaces() {
        let Some(state) = timeline.sample_surface(surface.index(), t) else {
            return Err(VanishError::render(format!(
                "no tween for surface {}",
                surface.index()
            )));
        };
        draw_layer(
            &mut data,
            canvas,
            surface.layer(),
            state.transform(canvas).to_affine(),
            state.opacity as f32,
        )?;
    }

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

/// Upper bound on frames rendered for one dissolve.
pub const MAX_FRAMES: u64 = 1 << 20;

/// Sample times from 0 through the end of the timeline (inclusive) at `fps`.
pub fn frame_times(timeline: &DissolveTimeline, fps: u32) -> VanishResult<Vec<f64>> {
    if fps == 0 {
        return Err(VanishError::validation("fps must be non-zero"));
    }
    let total = timeline.total_duration();
    let frames = (total * f64::from(fps)).ceil();
    if !frames.is_finite() || frames >= MAX_FRAMES as f64 {
        return Err(VanishError::validation(format!(
            "a {total}-unit dissolve at {fps} fps exceeds {MAX_FRAMES} frames"
        )));
    }
    let frames = frames as u64;
    Ok((0..=frames)
        .map(|f| (f as f64 / f64::from(fps)).min(total))
        .collect())
}

pub fn render_dissolve_frames(
    stage: &Stage,
    timeline: &DissolveTimeline,
    fps: u32,
) -> VanishResult<Vec<FrameRGBA>> {
    frame_times(timeline, fps)?
        .into_iter()
        .map(|t| render_stage_frame(stage, timeline, t))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
