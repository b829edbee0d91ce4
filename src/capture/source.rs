use std::path::Path;

use crate::{
    foundation::error::{VanishError, VanishResult},
    raster::image::RasterImage,
};

/// A live picture the dissolve can freeze: a camera, a decoded video, or a still.
pub trait FrameSource {
    /// Current native frame size; `(0, 0)` until the source is playing.
    fn dimensions(&self) -> (u32, u32);

    /// Sample the frame currently on display.
    fn read_frame(&mut self) -> VanishResult<RasterImage>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;
}

/// A frozen frame standing in for a camera feed.
#[derive(Clone, Debug, Default)]
pub struct StillSource {
    frame: Option<RasterImage>,
    paused: bool,
}

impl StillSource {
    pub fn new(frame: RasterImage) -> Self {
        Self {
            frame: Some(frame),
            paused: false,
        }
    }

    /// A source that has not produced a frame yet.
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn open(path: &Path) -> VanishResult<Self> {
        Ok(Self::new(RasterImage::load(path)?))
    }
}

impl FrameSource for StillSource {
    fn dimensions(&self) -> (u32, u32) {
        self.frame
            .as_ref()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((0, 0))
    }

    fn read_frame(&mut self) -> VanishResult<RasterImage> {
        self.frame
            .clone()
            .ok_or_else(|| VanishError::source_not_ready("still source has no frame"))
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
