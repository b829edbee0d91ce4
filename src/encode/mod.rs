//! MP4 output through the system `ffmpeg` binary.

/// Flattened dissolve frames piped into `ffmpeg`.
pub mod ffmpeg;
