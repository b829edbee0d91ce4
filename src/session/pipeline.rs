use crate::{
    capture::source::FrameSource,
    config::VanishConfig,
    foundation::error::VanishResult,
    gate::classifier::Classifier,
    gate::expression::happy_score,
    session::session::DissolveSession,
};

/// How a pipeline run ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The gate fired and the dissolve ran to completion.
    Vanished(Box<DissolveSession>),
    /// Detection ran out before anyone smiled.
    StreamEnded { cycles: u64 },
}

impl PipelineOutcome {
    pub fn vanished(&self) -> bool {
        matches!(self, Self::Vanished(_))
    }
}

/// Poll the classifier until the gate fires, then dissolve one frame of `source`.
///
/// The poller is stopped before capture; the gate never re-arms, so at most one
/// dissolve runs per call.
#[tracing::instrument(skip_all, fields(threshold = config.happy_threshold))]
pub async fn run_pipeline<S, C>(
    source: &mut S,
    classifier: C,
    config: &VanishConfig,
) -> VanishResult<PipelineOutcome>
where
    S: FrameSource + ?Sized,
    C: Classifier + 'static,
{
    config.validate()?;
    let mut gate = config.gate()?;
    let mut poller = config.poller()?.spawn(classifier)?;

    let mut cycles: u64 = 0;
    while let Some(batch) = poller.next_batch().await {
        cycles += 1;
        if !gate.observe(&batch) {
            continue;
        }
        tracing::debug!(cycles, score = ?happy_score(&batch), "stopping detection before capture");
        poller.join().await?;

        let mut session = DissolveSession::new(config)?;
        session.run(source).await?;
        return Ok(PipelineOutcome::Vanished(Box::new(session)));
    }

    tracing::info!(cycles, "detection stream ended without a trigger");
    poller.join().await?;
    Ok(PipelineOutcome::StreamEnded { cycles })
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
