//! Freezing a live source into a [`RasterImage`](crate::RasterImage).

pub mod frame;
pub mod source;
