use std::{collections::VecDeque, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::{VanishError, VanishResult},
    gate::expression::DetectionBatch,
};

/// Black-box face/expression detector, called once per polling cycle.
pub trait Classifier: Send {
    /// `Ok(None)` ends the detection stream.
    fn detect(&mut self) -> VanishResult<Option<DetectionBatch>>;
}

/// Replays recorded batches in order, then ends the stream.
#[derive(Clone, Debug, Default)]
pub struct ScriptedClassifier {
    batches: VecDeque<DetectionBatch>,
}

impl ScriptedClassifier {
    pub fn new(batches: impl IntoIterator<Item = DetectionBatch>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }

    /// JSON array of batches, e.g. `[[{"expressions": {"happy": 0.2}}], []]`.
    pub fn from_json(json: &str) -> VanishResult<Self> {
        let batches: Vec<DetectionBatch> = serde_json::from_str(json)
            .map_err(|e| VanishError::serde(format!("parse detection script: {e}")))?;
        Ok(Self::new(batches))
    }

    pub fn from_json_path(path: &Path) -> VanishResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read detection script '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl Classifier for ScriptedClassifier {
    fn detect(&mut self) -> VanishResult<Option<DetectionBatch>> {
        Ok(self.batches.pop_front())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/classifier.rs"]
mod tests;
