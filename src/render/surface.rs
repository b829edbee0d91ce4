use crate::{
    foundation::core::Canvas,
    foundation::error::{VanishError, VanishResult},
    raster::image::{RasterImage, SubImage, premultiply_rgba8_in_place},
    render::blur::{BlurParams, blur_rgba8_premul},
    render::composite::LayerRef,
};

/// A drawable layer sized to the session canvas, holding one partition's pixels.
#[derive(Clone, Debug)]
pub struct Surface {
    index: usize,
    canvas: Canvas,
    pixels: Vec<u8>, // premultiplied
    blurred: Option<Vec<u8>>,
}

impl Surface {
    /// Paint `part` at origin (0,0): overflow is cropped, uncovered area stays transparent.
    pub fn from_sub_image(index: usize, part: &SubImage, canvas: Canvas) -> Self {
        let mut pixels = vec![0u8; canvas.rgba_len()];
        let copy_w = part.width().min(canvas.width) as usize;
        let copy_h = part.height().min(canvas.height) as usize;
        let src_stride = part.width() as usize * 4;
        let dst_stride = canvas.width as usize * 4;
        for row in 0..copy_h {
            let s = row * src_stride;
            let d = row * dst_stride;
            pixels[d..d + copy_w * 4].copy_from_slice(&part.data()[s..s + copy_w * 4]);
        }
        premultiply_rgba8_in_place(&mut pixels);

        Self {
            index,
            canvas,
            pixels,
            blurred: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_blurred(&self) -> bool {
        self.blurred.is_some()
    }

    /// Mark the surface blurred; the blurred pixels are computed once and cached.
    pub fn apply_blur(&mut self, params: BlurParams) -> VanishResult<()> {
        if self.blurred.is_none() {
            self.blurred = Some(blur_rgba8_premul(
                &self.pixels,
                self.canvas.width,
                self.canvas.height,
                params,
            )?);
        }
        Ok(())
    }

    pub(crate) fn layer(&self) -> LayerRef<'_> {
        LayerRef {
            pixels: self.blurred.as_deref().unwrap_or(&self.pixels),
            width: self.canvas.width,
            height: self.canvas.height,
        }
    }
}

/// The frozen frame shown underneath the surfaces while it fades out.
#[derive(Clone, Debug)]
pub struct Backdrop {
    width: u32,
    height: u32,
    pixels: Vec<u8>, // premultiplied
}

impl Backdrop {
    pub fn from_raster(image: &RasterImage) -> Self {
        let mut pixels = image.data().to_vec();
        premultiply_rgba8_in_place(&mut pixels);
        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    pub(crate) fn layer(&self) -> LayerRef<'_> {
        LayerRef {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}

/// Display container: surfaces stacked in insertion order over an optional backdrop.
#[derive(Clone, Debug)]
pub struct Stage {
    canvas: Canvas,
    backdrop: Option<Backdrop>,
    surfaces: Vec<Surface>,
}

impl Stage {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            backdrop: None,
            surfaces: Vec::new(),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn set_backdrop(&mut self, backdrop: Backdrop) {
        self.backdrop = Some(backdrop);
    }

    pub fn backdrop(&self) -> Option<&Backdrop> {
        self.backdrop.as_ref()
    }

    pub fn attach(&mut self, surface: Surface) -> VanishResult<()> {
        if surface.canvas != self.canvas {
            return Err(VanishError::render(format!(
                "surface {} is {}x{}, stage is {}x{}",
                surface.index,
                surface.canvas.width,
                surface.canvas.height,
                self.canvas.width,
                self.canvas.height
            )));
        }
        self.surfaces.push(surface);
        Ok(())
    }

    /// Bottom-most first.
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub(crate) fn surfaces_mut(&mut self) -> &mut [Surface] {
        &mut self.surfaces
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Turns a partition into surfaces and stacks all of them on a stage at once.
#[derive(Clone, Copy, Debug)]
pub struct DissolveRenderer {
    canvas: Canvas,
}

impl DissolveRenderer {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Every surface is built before the first one is attached, so a failure leaves the stage untouched.
    pub fn render(&self, parts: &[SubImage], stage: &mut Stage) -> VanishResult<()> {
        if stage.canvas() != self.canvas {
            return Err(VanishError::render("stage canvas differs from renderer canvas"));
        }
        if !stage.is_empty() {
            return Err(VanishError::validation(
                "stage already hosts surfaces from another session",
            ));
        }

        let surfaces: Vec<Surface> = parts
            .iter()
            .enumerate()
            .map(|(i, part)| Surface::from_sub_image(i, part, self.canvas))
            .collect();
        for surface in surfaces {
            stage.attach(surface)?;
        }
        tracing::debug!(surfaces = stage.len(), "surfaces attached");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
