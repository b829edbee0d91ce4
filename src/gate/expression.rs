use crate::foundation::error::{VanishError, VanishResult};

/// Confidence in `[0, 1]` for each expression label; absent labels read as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExpressionScores {
    pub neutral: f64,
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub fearful: f64,
    pub disgusted: f64,
    pub surprised: f64,
}

impl ExpressionScores {
    pub fn get(&self, label: &str) -> Option<f64> {
        match label {
            "neutral" => Some(self.neutral),
            "happy" => Some(self.happy),
            "sad" => Some(self.sad),
            "angry" => Some(self.angry),
            "fearful" => Some(self.fearful),
            "disgusted" => Some(self.disgusted),
            "surprised" => Some(self.surprised),
            _ => None,
        }
    }
}

/// One detected face. Unknown fields from the classifier are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub expressions: Option<ExpressionScores>,
}

impl DetectionResult {
    pub fn with_happy(happy: f64) -> Self {
        Self {
            expressions: Some(ExpressionScores {
                happy,
                ..ExpressionScores::default()
            }),
        }
    }
}

/// Faces found in one classifier cycle; only the first is consulted.
pub type DetectionBatch = Vec<DetectionResult>;

pub const DEFAULT_HAPPY_THRESHOLD: f64 = 0.9;

/// One-shot trigger over detection batches.
///
/// Only the latest batch counts (no smoothing); the first qualifying batch latches it for good.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpressionGate {
    threshold: f64,
    triggered: bool,
}

impl Default for ExpressionGate {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_HAPPY_THRESHOLD,
            triggered: false,
        }
    }
}

impl ExpressionGate {
    pub fn new(threshold: f64) -> VanishResult<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(VanishError::invalid_configuration(format!(
                "happy threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            triggered: false,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Feed one batch. Returns `true` only for the batch that flips the gate.
    pub fn observe(&mut self, batch: &[DetectionResult]) -> bool {
        if self.triggered {
            return false;
        }
        let Some(happy) = happy_score(batch) else {
            return false;
        };
        if happy > self.threshold {
            self.triggered = true;
            tracing::info!(happy, threshold = self.threshold, "expression gate triggered");
            return true;
        }
        false
    }
}

/// `happy` of the first face, if the batch has one with scores.
pub fn happy_score(batch: &[DetectionResult]) -> Option<f64> {
    batch.first()?.expressions.map(|e| e.happy)
}

#[cfg(test)]
#[path = "../../tests/unit/gate/expression.rs"]
mod tests;
