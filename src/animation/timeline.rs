use crate::{
    animation::ease::Ease,
    animation::tween::{SurfaceState, Tween},
    foundation::core::Vec2,
    foundation::error::{VanishError, VanishResult},
    foundation::math::Rng64,
};

/// Displacement presets (pixels) shared by x, y and rotation.
pub const DISPLACEMENTS: [f64; 3] = [0.0, 100.0, -100.0];
/// Rotation is a displacement preset scaled down to degrees.
pub const ROTATION_FACTOR: f64 = 0.1;

/// Timing knobs for a dissolve, in animation time units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DissolveParams {
    pub stagger: f64,
    pub duration: f64,
    pub source_fade: f64,
    pub ease: Ease,
}

impl Default for DissolveParams {
    fn default() -> Self {
        Self {
            stagger: 0.1,
            duration: 1.0,
            source_fade: 0.5,
            ease: Ease::OutQuad,
        }
    }
}

impl DissolveParams {
    pub fn validate(&self) -> VanishResult<()> {
        if !self.stagger.is_finite() || self.stagger < 0.0 {
            return Err(VanishError::invalid_configuration("stagger must be finite and >= 0"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(VanishError::invalid_configuration("duration must be finite and > 0"));
        }
        if !self.source_fade.is_finite() || self.source_fade <= 0.0 {
            return Err(VanishError::invalid_configuration(
                "source_fade must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Scale preset for surface `index` of `count`: 2 strictly past the midpoint, else 1.
pub fn scale_preset(index: usize, count: usize) -> f64 {
    if index as f64 > count as f64 / 2.0 { 2.0 } else { 1.0 }
}

/// Per-surface tweens plus the backdrop fade. Pure: sampling never touches a clock.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DissolveTimeline {
    surfaces: Vec<Tween<SurfaceState>>,
    backdrop: Tween<f64>,
    tail: usize,
}

impl DissolveTimeline {
    /// Draw targets for `count` surfaces. Surface `i` starts at `i * stagger`.
    pub fn plan(count: usize, params: &DissolveParams, rng: &mut Rng64) -> VanishResult<Self> {
        params.validate()?;
        let surfaces = (0..count)
            .map(|i| Tween {
                delay: i as f64 * params.stagger,
                duration: params.duration,
                ease: params.ease,
                from: SurfaceState::REST,
                to: SurfaceState {
                    opacity: 0.0,
                    scale: scale_preset(i, count),
                    rotation_deg: rng.pick(&DISPLACEMENTS) * ROTATION_FACTOR,
                    offset: Vec2::new(rng.pick(&DISPLACEMENTS), rng.pick(&DISPLACEMENTS)),
                },
            })
            .collect();
        Self::from_tweens(surfaces, backdrop_fade(params))
    }

    /// Build from explicit tweens; the tail is always the last index.
    pub fn from_tweens(surfaces: Vec<Tween<SurfaceState>>, backdrop: Tween<f64>) -> VanishResult<Self> {
        if surfaces.is_empty() {
            return Err(VanishError::animation("a dissolve needs at least one surface"));
        }
        for tween in &surfaces {
            tween.validate()?;
        }
        backdrop.validate()?;
        Ok(Self {
            tail: surfaces.len() - 1,
            surfaces,
            backdrop,
        })
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Index whose completion ends the dissolve.
    pub fn tail_index(&self) -> usize {
        self.tail
    }

    pub fn tweens(&self) -> &[Tween<SurfaceState>] {
        &self.surfaces
    }

    pub fn backdrop_fade(&self) -> &Tween<f64> {
        &self.backdrop
    }

    /// When the tail surface finishes.
    pub fn tail_end(&self) -> f64 {
        self.surfaces[self.tail].end()
    }

    /// When every tween (backdrop included) has settled.
    pub fn total_duration(&self) -> f64 {
        self.surfaces
            .iter()
            .map(Tween::end)
            .fold(self.backdrop.end(), f64::max)
    }

    pub fn sample_surface(&self, index: usize, t: f64) -> Option<SurfaceState> {
        self.surfaces.get(index).map(|tween| tween.sample(t))
    }

    pub fn backdrop_opacity(&self, t: f64) -> f64 {
        self.backdrop.sample(t)
    }
}

fn backdrop_fade(params: &DissolveParams) -> Tween<f64> {
    Tween {
        delay: 0.0,
        duration: params.source_fade,
        ease: params.ease,
        from: 1.0,
        to: 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
