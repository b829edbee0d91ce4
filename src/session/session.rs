use crate::{
    animation::animator::{AnimationRun, DissolveAnimator},
    animation::timeline::DissolveTimeline,
    capture::frame::FrameCapture,
    capture::source::FrameSource,
    config::VanishConfig,
    foundation::core::Canvas,
    foundation::error::{VanishError, VanishResult},
    foundation::math::Rng64,
    partition::partitioner::PixelPartitioner,
    raster::image::{RasterImage, SubImage},
    render::frame::{FrameRGBA, render_stage_frame},
    render::surface::{Backdrop, DissolveRenderer, Stage},
};

/// Lifecycle of one dissolve. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Capturing,
    Partitioning,
    Rendered,
    Animating,
    Vanished,
    /// A step failed; the session is dead and a new trigger is the only way forward.
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Vanished | Self::Aborted)
    }
}

/// One capture → partition → render → animate run.
///
/// Owns the captured frame, its partition, the stage hosting the surfaces and, once
/// animation started, the timeline. Nothing is shared with other sessions.
#[derive(Debug)]
pub struct DissolveSession {
    state: SessionState,
    started: bool,
    partitioner: PixelPartitioner,
    animator: DissolveAnimator,
    rng: Rng64,
    frame: Option<RasterImage>,
    parts: Vec<SubImage>,
    stage: Stage,
    timeline: Option<DissolveTimeline>,
}

impl DissolveSession {
    pub fn new(config: &VanishConfig) -> VanishResult<Self> {
        config.validate()?;
        Ok(Self::with_parts(
            config.partitioner()?,
            config.animator()?,
            config.canvas,
            config.rng(),
        ))
    }

    pub fn with_parts(
        partitioner: PixelPartitioner,
        animator: DissolveAnimator,
        canvas: Canvas,
        rng: Rng64,
    ) -> Self {
        Self {
            state: SessionState::Capturing,
            started: false,
            partitioner,
            animator,
            rng,
            frame: None,
            parts: Vec::new(),
            stage: Stage::new(canvas),
            timeline: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn frame(&self) -> Option<&RasterImage> {
        self.frame.as_ref()
    }

    pub fn sub_images(&self) -> &[SubImage] {
        &self.parts
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Available once the dissolve has been planned or started.
    pub fn timeline(&self) -> Option<&DissolveTimeline> {
        self.timeline.as_ref()
    }

    /// Freeze the source, capture, partition, attach every surface and start the animation.
    ///
    /// Runs synchronously up to ANIMATING; await the returned run with [`Self::finish`].
    #[tracing::instrument(skip_all, fields(count = self.partitioner.count()))]
    pub fn start<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> VanishResult<AnimationRun> {
        if self.started {
            return Err(VanishError::validation(format!(
                "session already started (state {:?})",
                self.state
            )));
        }
        self.started = true;
        let res = self.start_inner(source);
        self.abort_on_err(res)
    }

    fn start_inner<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> VanishResult<AnimationRun> {
        self.build_stage(source)?;
        let run = self.animator.animate(&mut self.stage, &mut self.rng)?;
        self.timeline = Some(run.timeline().clone());
        self.transition(SessionState::Animating);
        Ok(run)
    }

    /// Capture, partition and plan the dissolve without running it.
    ///
    /// The session stays in RENDERED; frames are available through [`Self::render_frame`].
    #[tracing::instrument(skip_all, fields(count = self.partitioner.count()))]
    pub fn plan<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> VanishResult<&DissolveTimeline> {
        if self.started {
            return Err(VanishError::validation(format!(
                "session already started (state {:?})",
                self.state
            )));
        }
        self.started = true;
        let res = self.plan_inner(source);
        self.abort_on_err(res)?;
        self.timeline
            .as_ref()
            .ok_or_else(|| VanishError::animation("dissolve was not planned"))
    }

    fn plan_inner<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> VanishResult<()> {
        self.build_stage(source)?;
        let timeline = self.animator.prepare(&mut self.stage, &mut self.rng)?;
        self.timeline = Some(timeline);
        Ok(())
    }

    fn build_stage<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> VanishResult<()> {
        if !source.is_paused() {
            source.pause();
        }
        let frame = FrameCapture::capture(source)?;

        self.transition(SessionState::Partitioning);
        self.parts = self.partitioner.partition(&frame, &mut self.rng)?;

        DissolveRenderer::new(self.stage.canvas()).render(&self.parts, &mut self.stage)?;
        self.stage.set_backdrop(Backdrop::from_raster(&frame));
        self.frame = Some(frame);
        self.transition(SessionState::Rendered);
        Ok(())
    }

    /// Wait for the tail surface, then settle in VANISHED.
    pub async fn finish(&mut self, run: AnimationRun) -> VanishResult<()> {
        if self.state != SessionState::Animating {
            return Err(VanishError::validation(format!(
                "cannot finish a session in state {:?}",
                self.state
            )));
        }
        let res = run.finished().await;
        let timeline = self.abort_on_err(res)?;
        self.timeline = Some(timeline);
        self.transition(SessionState::Vanished);
        tracing::info!(surfaces = self.stage.len(), "dissolve finished");
        Ok(())
    }

    pub async fn run<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> VanishResult<()> {
        let run = self.start(source)?;
        self.finish(run).await
    }

    /// Composite the stage at animation time `t`.
    pub fn render_frame(&self, t: f64) -> VanishResult<FrameRGBA> {
        let timeline = self
            .timeline
            .as_ref()
            .ok_or_else(|| VanishError::validation("session has not been animated yet"))?;
        render_stage_frame(&self.stage, timeline, t)
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
    }

    fn abort_on_err<T>(&mut self, res: VanishResult<T>) -> VanishResult<T> {
        if let Err(err) = &res {
            tracing::debug!(state = ?self.state, error = %err, "session aborted");
            self.state = SessionState::Aborted;
        }
        res
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/session.rs"]
mod tests;
