//! CPU compositing of partition layers.
//!
//! Surfaces hold premultiplied pixels; frames are produced by sampling a
//! [`DissolveTimeline`](crate::DissolveTimeline) and drawing every surface with its transform.

pub mod blur;
pub mod composite;
pub mod frame;
pub mod surface;
