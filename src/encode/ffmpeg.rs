use std::{
    io::{ErrorKind, Write as _},
    path::Path,
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    animation::timeline::DissolveTimeline,
    foundation::core::Canvas,
    foundation::error::{VanishError, VanishResult},
    foundation::math::mul_div255_u8,
    render::frame::{frame_times, render_stage_frame},
    render::surface::Stage,
};

/// Options for [`render_dissolve_to_mp4`].
#[derive(Clone, Debug)]
pub struct Mp4Opts {
    pub fps: u32,
    /// Opaque colour showing through wherever the dissolve left the frame transparent.
    pub background: [u8; 3],
    pub overwrite: bool,
}

impl Default for Mp4Opts {
    fn default() -> Self {
        Self {
            fps: 30,
            background: [0, 0, 0],
            overwrite: true,
        }
    }
}

impl Mp4Opts {
    /// yuv420p output needs an even canvas.
    pub fn validate(&self, canvas: Canvas) -> VanishResult<()> {
        if self.fps == 0 {
            return Err(VanishError::validation("mp4 fps must be non-zero"));
        }
        if !canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2) {
            return Err(VanishError::validation(format!(
                "mp4 output needs an even canvas, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        Ok(())
    }
}

/// Composite the dissolve from t = 0 through the end of the timeline and pipe it into `ffmpeg`.
///
/// Everything that can be checked is checked before `ffmpeg` starts. Returns the frame count.
#[tracing::instrument(skip(stage, timeline, opts), fields(fps = opts.fps))]
pub fn render_dissolve_to_mp4(
    stage: &Stage,
    timeline: &DissolveTimeline,
    out_path: &Path,
    opts: &Mp4Opts,
) -> VanishResult<usize> {
    let canvas = stage.canvas();
    opts.validate(canvas)?;
    if timeline.len() != stage.len() {
        return Err(VanishError::render(format!(
            "timeline has {} tweens for {} surfaces",
            timeline.len(),
            stage.len()
        )));
    }
    let times = frame_times(timeline, opts.fps)?;
    prepare_output(out_path, opts.overwrite)?;

    let mut pipe = FfmpegPipe::spawn(canvas, opts.fps, out_path)?;
    let mut opaque = vec![0u8; canvas.rgba_len()];
    for &t in &times {
        let frame = render_stage_frame(stage, timeline, t)?;
        flatten_over_background(&frame.data, opts.background, &mut opaque);
        pipe.write_frame(&opaque)?;
    }
    pipe.close()?;

    tracing::info!(frames = times.len(), out = %out_path.display(), "encoded dissolve");
    Ok(times.len())
}

fn prepare_output(out_path: &Path, overwrite: bool) -> VanishResult<()> {
    if !overwrite && out_path.exists() {
        return Err(VanishError::validation(format!(
            "'{}' already exists",
            out_path.display()
        )));
    }
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

/// A running `ffmpeg` reading raw RGBA frames from stdin. Killed if dropped unclosed.
struct FfmpegPipe {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegPipe {
    fn spawn(canvas: Canvas, fps: u32, out_path: &Path) -> VanishResult<Self> {
        let size = format!("{}x{}", canvas.width, canvas.height);
        let rate = fps.to_string();
        let mut child = Command::new("ffmpeg")
            .args(["-y", "-loglevel", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "-s", &size, "-r", &rate])
            .args(["-i", "pipe:0", "-an"])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"])
            .arg(out_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    VanishError::render("mp4 output needs `ffmpeg` on PATH, and none was found")
                }
                _ => VanishError::render(format!("spawn ffmpeg: {e}")),
            })?;
        let stdin = child.stdin.take();
        Ok(Self { child, stdin })
    }

    fn write_frame(&mut self, rgba: &[u8]) -> VanishResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| VanishError::render("ffmpeg stdin is closed"))?;
        stdin
            .write_all(rgba)
            .map_err(|e| VanishError::render(format!("pipe frame to ffmpeg: {e}")))
    }

    fn close(mut self) -> VanishResult<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| VanishError::render(format!("wait for ffmpeg: {e}")))?;
        if status.success() {
            return Ok(());
        }
        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            let _ = std::io::Read::read_to_string(&mut pipe, &mut stderr);
        }
        Err(VanishError::render(format!(
            "ffmpeg exited with {status}: {}",
            stderr.trim()
        )))
    }
}

impl Drop for FfmpegPipe {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Premultiplied frame over an opaque colour; the result is fully opaque.
pub(crate) fn flatten_over_background(premul: &[u8], background: [u8; 3], dst: &mut [u8]) {
    for (out, px) in dst.chunks_exact_mut(4).zip(premul.chunks_exact(4)) {
        let uncovered = 255 - u16::from(px[3]);
        for c in 0..3 {
            out[c] = px[c].saturating_add(mul_div255_u8(u16::from(background[c]), uncovered));
        }
        out[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
