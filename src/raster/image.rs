use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{VanishError, VanishResult};

/// A captured still: dense straight-alpha RGBA8, row-major, 4 bytes per pixel.
///
/// Immutable once built; the partitioner only ever reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> VanishResult<Self> {
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(VanishError::validation(format!(
                "raster buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Decode any format the `image` crate understands.
    pub fn load(path: &Path) -> VanishResult<Self> {
        let dyn_img =
            image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
        Ok(Self::from_rgba_image(dyn_img.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    pub fn save_png(&self, path: &Path) -> VanishResult<()> {
        save_rgba8_png(path, &self.data, self.width, self.height)
    }
}

/// One sparse layer of a partition: the source's size, transparent everywhere it does not own a pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
    owned: usize,
}

impl SubImage {
    pub fn transparent(width: u32, height: u32) -> VanishResult<Self> {
        Ok(Self {
            width,
            height,
            data: vec![0u8; rgba_len(width, height)?],
            owned: 0,
        })
    }

    /// Copy the 4 bytes at `offset` from `src` verbatim.
    pub(crate) fn take_pixel(&mut self, src: &[u8], offset: usize) {
        self.data[offset..offset + 4].copy_from_slice(&src[offset..offset + 4]);
        self.owned += 1;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of source pixels assigned to this layer.
    pub fn owned_pixels(&self) -> usize {
        self.owned
    }

    pub fn save_png(&self, path: &Path) -> VanishResult<()> {
        save_rgba8_png(path, &self.data, self.width, self.height)
    }
}

/// Write every layer as `part_000.png`, `part_001.png`, ... into `dir`.
pub fn write_sub_images(dir: &Path, parts: &[SubImage]) -> VanishResult<Vec<std::path::PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output dir '{}'", dir.display()))?;
    let mut written = Vec::with_capacity(parts.len());
    for (i, part) in parts.iter().enumerate() {
        let path = dir.join(format!("part_{i:03}.png"));
        part.save_png(&path)?;
        written.push(path);
    }
    Ok(written)
}

pub(crate) fn rgba_len(width: u32, height: u32) -> VanishResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| VanishError::validation("raster buffer size overflow"))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn save_rgba8_png(path: &Path, data: &[u8], width: u32, height: u32) -> VanishResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        data,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
