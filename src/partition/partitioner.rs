use crate::{
    foundation::error::{VanishError, VanishResult},
    foundation::math::Rng64,
    raster::image::{RasterImage, SubImage},
};

/// Number of layers a captured frame is shattered into.
pub const DEFAULT_PARTITION_COUNT: usize = 35;

/// Splits a frame into `count` sparse layers that together cover every pixel exactly once.
///
/// Each pixel independently lands in a uniformly drawn layer, so layer sizes are binomial
/// rather than balanced. Positions never move: a pixel keeps its byte offset in its layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPartitioner {
    count: usize,
}

impl PixelPartitioner {
    pub fn new(count: usize) -> VanishResult<Self> {
        if count == 0 {
            return Err(VanishError::invalid_configuration(
                "partition count must be a positive integer",
            ));
        }
        Ok(Self { count })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Single synchronous pass over the buffer in row-major order.
    #[tracing::instrument(skip(self, image, rng), fields(count = self.count))]
    pub fn partition(&self, image: &RasterImage, rng: &mut Rng64) -> VanishResult<Vec<SubImage>> {
        let mut parts = (0..self.count)
            .map(|_| SubImage::transparent(image.width(), image.height()))
            .collect::<VanishResult<Vec<_>>>()?;

        let src = image.data();
        for offset in (0..src.len()).step_by(4) {
            let bucket = rng.index(self.count);
            parts[bucket].take_pixel(src, offset);
        }

        tracing::debug!(
            pixels = image.pixel_count(),
            layers = parts.len(),
            "partitioned frame"
        );
        Ok(parts)
    }
}

impl Default for PixelPartitioner {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTITION_COUNT,
        }
    }
}

/// Convenience wrapper around [`PixelPartitioner::partition`].
pub fn partition(image: &RasterImage, count: usize, rng: &mut Rng64) -> VanishResult<Vec<SubImage>> {
    PixelPartitioner::new(count)?.partition(image, rng)
}

#[cfg(test)]
#[path = "../../tests/unit/partition/partitioner.rs"]
mod tests;
