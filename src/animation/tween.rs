use crate::{
    animation::ease::Ease,
    foundation::core::{Canvas, Transform2D, Vec2},
    foundation::error::{VanishError, VanishResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Visual state of one surface at an instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceState {
    pub opacity: f64,
    pub scale: f64,
    pub rotation_deg: f64,
    pub offset: Vec2, // pixels
}

impl SurfaceState {
    /// Fully visible, untransformed.
    pub const REST: Self = Self {
        opacity: 1.0,
        scale: 1.0,
        rotation_deg: 0.0,
        offset: Vec2::ZERO,
    };

    /// Scale and rotation pivot on the canvas centre.
    pub fn transform(&self, canvas: Canvas) -> Transform2D {
        Transform2D {
            translate: self.offset,
            rotation_rad: self.rotation_deg.to_radians(),
            scale: Vec2::new(self.scale, self.scale),
            anchor: canvas.center(),
        }
    }
}

impl Lerp for SurfaceState {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            opacity: <f64 as Lerp>::lerp(&a.opacity, &b.opacity, t),
            scale: <f64 as Lerp>::lerp(&a.scale, &b.scale, t),
            rotation_deg: <f64 as Lerp>::lerp(&a.rotation_deg, &b.rotation_deg, t),
            // kurbo's inherent `Vec2::lerp` takes values; name the trait explicitly.
            offset: <Vec2 as Lerp>::lerp(&a.offset, &b.offset, t),
        }
    }
}

/// A delayed, eased transition from `from` to `to`. Times are in animation time units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tween<T> {
    pub delay: f64,
    pub duration: f64,
    pub ease: Ease,
    pub from: T,
    pub to: T,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn validate(&self) -> VanishResult<()> {
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(VanishError::animation("tween delay must be finite and >= 0"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(VanishError::animation("tween duration must be finite and > 0"));
        }
        Ok(())
    }

    /// Time at which the tween reaches `to`.
    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }

    /// Linear progress in `[0, 1]` at time `t`.
    pub fn progress(&self, t: f64) -> f64 {
        ((t - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    pub fn sample(&self, t: f64) -> T {
        let p = self.progress(t);
        if p <= 0.0 {
            return self.from.clone();
        }
        if p >= 1.0 {
            return self.to.clone();
        }
        T::lerp(&self.from, &self.to, self.ease.apply(p))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
