//! Owned RGBA8 buffers: the captured still and its sparse partition layers.

pub mod image;
