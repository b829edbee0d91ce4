use crate::{
    capture::source::FrameSource,
    foundation::error::{VanishError, VanishResult},
    raster::image::RasterImage,
};

/// Snapshots the current frame of a [`FrameSource`] at its native resolution.
///
/// Two calls may return different frames; a session calls it exactly once.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCapture;

impl FrameCapture {
    #[tracing::instrument(skip(source))]
    pub fn capture<S: FrameSource + ?Sized>(source: &mut S) -> VanishResult<RasterImage> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(VanishError::source_not_ready(format!(
                "source reports {width}x{height}; wait until it is playing"
            )));
        }

        let frame = source.read_frame()?;
        if frame.width() != width || frame.height() != height {
            return Err(VanishError::validation(format!(
                "source reported {width}x{height} but delivered {}x{}",
                frame.width(),
                frame.height()
            )));
        }

        tracing::debug!(width, height, "captured frame");
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/frame.rs"]
mod tests;
