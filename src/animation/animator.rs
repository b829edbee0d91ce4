use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::{
    animation::timeline::{DissolveParams, DissolveTimeline},
    foundation::error::{VanishError, VanishResult},
    foundation::math::Rng64,
    render::blur::BlurParams,
    render::surface::Stage,
};

/// Per-surface progress notifications, in the order the runtime observes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    Started { index: usize },
    Finished { index: usize },
}

/// Join point keyed on one surface index rather than on whichever task ends last.
#[derive(Debug)]
pub struct TailBarrier {
    index: usize,
    done: oneshot::Receiver<()>,
}

impl TailBarrier {
    pub fn new(index: usize) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { index, done: rx }, tx)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub async fn wait(self) -> VanishResult<()> {
        self.done.await.map_err(|_| {
            VanishError::animation(format!(
                "tail surface {} stopped before finishing",
                self.index
            ))
        })
    }
}

/// A dissolve in flight.
#[derive(Debug)]
pub struct AnimationRun {
    timeline: DissolveTimeline,
    tail: TailBarrier,
    events: Option<mpsc::UnboundedReceiver<AnimationEvent>>,
}

impl AnimationRun {
    pub fn timeline(&self) -> &DissolveTimeline {
        &self.timeline
    }

    pub fn tail_index(&self) -> usize {
        self.tail.index()
    }

    /// Progress events; available once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<AnimationEvent>> {
        self.events.take()
    }

    /// Resolves when the tail surface finishes, handing the timeline back for rendering.
    pub async fn finished(self) -> VanishResult<DissolveTimeline> {
        self.tail.wait().await?;
        Ok(self.timeline)
    }
}

/// Drives the staggered outward animation of every surface on a stage.
#[derive(Clone, Copy, Debug)]
pub struct DissolveAnimator {
    params: DissolveParams,
    blur: BlurParams,
    time_unit: Duration,
}

impl Default for DissolveAnimator {
    fn default() -> Self {
        Self {
            params: DissolveParams::default(),
            blur: BlurParams::default(),
            time_unit: Duration::from_secs(1),
        }
    }
}

impl DissolveAnimator {
    pub fn new(params: DissolveParams, blur: BlurParams, time_unit: Duration) -> VanishResult<Self> {
        params.validate()?;
        if time_unit.is_zero() {
            return Err(VanishError::invalid_configuration("time unit must be > 0"));
        }
        Ok(Self {
            params,
            blur,
            time_unit,
        })
    }

    /// Blur every surface, plan its tween and start the clock.
    ///
    /// All surfaces must already be attached; the stage is not modified afterwards.
    pub fn animate(&self, stage: &mut Stage, rng: &mut Rng64) -> VanishResult<AnimationRun> {
        let runtime = current_runtime()?;
        let timeline = self.prepare(stage, rng)?;
        let schedule = self.schedule(&timeline)?;
        Ok(self.spawn(&runtime, timeline, schedule))
    }

    /// Blur and plan without starting any timers, for offline frame rendering.
    pub fn prepare(&self, stage: &mut Stage, rng: &mut Rng64) -> VanishResult<DissolveTimeline> {
        if stage.is_empty() {
            return Err(VanishError::animation("stage has no surfaces to animate"));
        }
        let timeline = DissolveTimeline::plan(stage.len(), &self.params, rng)?;
        for surface in stage.surfaces_mut() {
            surface.apply_blur(self.blur)?;
        }
        Ok(timeline)
    }

    /// Run an already planned timeline; used when tweens are supplied by the caller.
    pub fn run_timeline(&self, timeline: DissolveTimeline) -> VanishResult<AnimationRun> {
        let runtime = current_runtime()?;
        let schedule = self.schedule(&timeline)?;
        Ok(self.spawn(&runtime, timeline, schedule))
    }

    /// Wall-clock `(delay, duration)` per surface. Fails before any task is spawned.
    fn schedule(&self, timeline: &DissolveTimeline) -> VanishResult<Vec<(Duration, Duration)>> {
        timeline
            .tweens()
            .iter()
            .enumerate()
            .map(|(index, tween)| {
                Ok((
                    self.scaled(index, "delay", tween.delay)?,
                    self.scaled(index, "duration", tween.duration)?,
                ))
            })
            .collect()
    }

    fn scaled(&self, index: usize, what: &str, units: f64) -> VanishResult<Duration> {
        Duration::try_from_secs_f64(self.time_unit.as_secs_f64() * units).map_err(|e| {
            VanishError::animation(format!(
                "surface {index} {what} of {units} time units is not representable: {e}"
            ))
        })
    }

    fn spawn(
        &self,
        runtime: &tokio::runtime::Handle,
        timeline: DissolveTimeline,
        schedule: Vec<(Duration, Duration)>,
    ) -> AnimationRun {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (tail, tail_tx) = TailBarrier::new(timeline.tail_index());
        let mut tail_tx = Some(tail_tx);

        for (index, (delay, duration)) in schedule.into_iter().enumerate() {
            let events = events_tx.clone();
            let done = if index == tail.index() {
                tail_tx.take()
            } else {
                None
            };

            runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = events.send(AnimationEvent::Started { index });
                tokio::time::sleep(duration).await;
                let _ = events.send(AnimationEvent::Finished { index });
                if let Some(done) = done {
                    let _ = done.send(());
                }
            });
        }

        tracing::debug!(
            surfaces = timeline.len(),
            tail = tail.index(),
            "dissolve animation started"
        );
        AnimationRun {
            timeline,
            tail,
            events: Some(events_rx),
        }
    }
}

fn current_runtime() -> VanishResult<tokio::runtime::Handle> {
    tokio::runtime::Handle::try_current()
        .map_err(|e| VanishError::animation(format!("no async runtime available: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
