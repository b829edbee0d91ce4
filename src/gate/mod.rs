//! Expression detection: the classifier seam, the periodic poller and the one-shot gate.

pub mod classifier;
pub mod expression;
pub mod poller;
