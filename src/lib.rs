//! Vanish turns a smile into a disappearing act.
//!
//! A [`DetectionPoller`] feeds classifier batches to an [`ExpressionGate`]. When the gate fires,
//! a [`DissolveSession`] freezes the [`FrameSource`], scatters its pixels into N sparse layers,
//! attaches one blurred surface per layer to a [`Stage`] and animates them away with a staggered
//! timeline. Frames of the dissolve can be composited on the CPU and encoded to MP4 via `ffmpeg`.
//!
//! - [`run_pipeline`] wires the whole thing end to end
//! - [`PixelPartitioner`] and [`DissolveRenderer`] are usable on their own
//! - [`VanishConfig`] carries every tunable
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod capture;
pub mod config;
pub mod encode;
pub mod gate;
pub mod partition;
pub mod raster;
pub mod render;
pub mod session;

pub use crate::foundation::core::{Affine, Canvas, Point, Transform2D, Vec2};
pub use crate::foundation::error::{VanishError, VanishResult};
pub use crate::foundation::math::Rng64;

pub use crate::animation::animator::{AnimationEvent, AnimationRun, DissolveAnimator, TailBarrier};
pub use crate::animation::ease::Ease;
pub use crate::animation::timeline::{DissolveParams, DissolveTimeline};
pub use crate::animation::tween::{SurfaceState, Tween};
pub use crate::capture::frame::FrameCapture;
pub use crate::capture::source::{FrameSource, StillSource};
pub use crate::config::VanishConfig;
pub use crate::encode::ffmpeg::{Mp4Opts, render_dissolve_to_mp4};
pub use crate::gate::classifier::{Classifier, ScriptedClassifier};
pub use crate::gate::expression::{
    DetectionBatch, DetectionResult, ExpressionGate, ExpressionScores,
};
pub use crate::gate::poller::{DetectionPoller, PollerHandle};
pub use crate::partition::partitioner::{DEFAULT_PARTITION_COUNT, PixelPartitioner};
pub use crate::raster::image::{RasterImage, SubImage, write_sub_images};
pub use crate::render::blur::BlurParams;
pub use crate::render::frame::{FrameRGBA, render_dissolve_frames, render_stage_frame};
pub use crate::render::surface::{Backdrop, DissolveRenderer, Stage, Surface};
pub use crate::session::pipeline::{PipelineOutcome, run_pipeline};
pub use crate::session::session::{DissolveSession, SessionState};
