use std::{path::Path, time::Duration};

use anyhow::Context as _;

use crate::{
    animation::animator::DissolveAnimator,
    animation::ease::Ease,
    animation::timeline::DissolveParams,
    foundation::core::Canvas,
    foundation::error::{VanishError, VanishResult},
    foundation::math::Rng64,
    gate::expression::{DEFAULT_HAPPY_THRESHOLD, ExpressionGate},
    gate::poller::DetectionPoller,
    partition::partitioner::{DEFAULT_PARTITION_COUNT, PixelPartitioner},
    render::blur::BlurParams,
};

/// Every tunable of the pipeline. All fields are optional in JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VanishConfig {
    pub partition_count: usize,
    pub canvas: Canvas,
    pub happy_threshold: f64,
    pub detection_interval_ms: u64,
    pub time_unit_ms: u64,
    pub stagger: f64,
    pub duration: f64,
    pub source_fade: f64,
    pub ease: Ease,
    pub blur_radius: u32,
    pub blur_sigma: f32,
    /// Fixed seed for reproducible runs; clock-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for VanishConfig {
    fn default() -> Self {
        let params = DissolveParams::default();
        let blur = BlurParams::default();
        Self {
            partition_count: DEFAULT_PARTITION_COUNT,
            canvas: Canvas::default(),
            happy_threshold: DEFAULT_HAPPY_THRESHOLD,
            detection_interval_ms: 100,
            time_unit_ms: 1000,
            stagger: params.stagger,
            duration: params.duration,
            source_fade: params.source_fade,
            ease: params.ease,
            blur_radius: blur.radius,
            blur_sigma: blur.sigma,
            seed: None,
        }
    }
}

impl VanishConfig {
    pub fn from_json(json: &str) -> VanishResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| VanishError::serde(format!("parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_path(path: &Path) -> VanishResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> VanishResult<()> {
        PixelPartitioner::new(self.partition_count)?;
        Canvas::new(self.canvas.width, self.canvas.height)?;
        ExpressionGate::new(self.happy_threshold)?;
        if self.detection_interval_ms == 0 {
            return Err(VanishError::invalid_configuration(
                "detection_interval_ms must be > 0",
            ));
        }
        if self.time_unit_ms == 0 {
            return Err(VanishError::invalid_configuration("time_unit_ms must be > 0"));
        }
        self.dissolve_params().validate()?;
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(VanishError::invalid_configuration("blur_sigma must be > 0"));
        }
        Ok(())
    }

    pub fn dissolve_params(&self) -> DissolveParams {
        DissolveParams {
            stagger: self.stagger,
            duration: self.duration,
            source_fade: self.source_fade,
            ease: self.ease,
        }
    }

    pub fn blur(&self) -> BlurParams {
        BlurParams {
            radius: self.blur_radius,
            sigma: self.blur_sigma,
        }
    }

    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    pub fn partitioner(&self) -> VanishResult<PixelPartitioner> {
        PixelPartitioner::new(self.partition_count)
    }

    pub fn gate(&self) -> VanishResult<ExpressionGate> {
        ExpressionGate::new(self.happy_threshold)
    }

    pub fn poller(&self) -> VanishResult<DetectionPoller> {
        DetectionPoller::new(Duration::from_millis(self.detection_interval_ms))
    }

    pub fn animator(&self) -> VanishResult<DissolveAnimator> {
        DissolveAnimator::new(self.dissolve_params(), self.blur(), self.time_unit())
    }

    pub fn rng(&self) -> Rng64 {
        self.seed.map(Rng64::new).unwrap_or_else(Rng64::from_clock)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
