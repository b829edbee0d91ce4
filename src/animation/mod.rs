//! Tween planning and the timed dissolve run.

pub mod animator;
pub mod ease;
pub mod timeline;
pub mod tween;
