use super::{
    clock::SimTime,
    event::SchedEvent,
    observer::Observer,
    state::{ProcessId, SimCtx},
};
use crate::{
    DEFAULT_COMPLETION_EPSILON,
    error::SimError,
    scheduler::{PriorityScheduler, Scheduler},
    sim::{ProcessDescriptor, validate_descriptors},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// What one call to [`PreemptiveScheduler::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub now: SimTime,
    pub running: Option<ProcessId>,
    // Served fraction of `running`'s burst
    pub progress: Option<f64>,
    pub events: Vec<SchedEvent>,
    pub completed: bool,
}

/// Online preemptive priority engine driven by an external clock.
///
/// Every tick covers the window `[now, now + delta]`. The window is walked in
/// sub-steps that end at the next arrival or at the current process's
/// completion, so a higher priority arrival preempts at its exact arrival
/// time and the recorded intervals do not depend on the host's step size.
pub struct PreemptiveScheduler<S: Scheduler = PriorityScheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
    phase: Phase,
    epsilon: SimTime,
}

impl<S: Scheduler> PreemptiveScheduler<S> {
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_COMPLETION_EPSILON)
    }

    pub fn with_epsilon(epsilon: SimTime) -> Self {
        let mut ctx = SimCtx::new();
        let scheduler = S::init(&mut ctx);
        Self {
            ctx,
            scheduler,
            observer: Observer::new(),
            phase: Phase::Idle,
            epsilon,
        }
    }

    /// Reset all state and load a new set of processes.
    ///
    /// Invalid descriptors leave the engine untouched.
    pub fn initialize(&mut self, descriptors: &[ProcessDescriptor]) -> Result<(), SimError> {
        validate_descriptors(descriptors)?;

        self.ctx.load(descriptors);
        self.scheduler.reset(&mut self.ctx);
        self.observer = Observer::new();
        self.phase = Phase::Running;

        tracing::info!(
            "Initialized preemptive priority simulation with {} processes",
            descriptors.len()
        );
        Ok(())
    }

    pub fn tick(&mut self, delta: SimTime) -> Result<TickReport, SimError> {
        match self.phase {
            Phase::Idle => return Err(SimError::NotStarted),
            Phase::Completed => return Ok(self.report(Vec::new())),
            Phase::Running => {}
        }
        if !(delta.is_finite() && delta >= 0.0) {
            return Err(SimError::InvalidDelta(delta));
        }

        let mut events = Vec::new();
        let mut cursor = self.ctx.clock.now();
        let end = self.ctx.clock.advance(delta);

        loop {
            self.admit(cursor, &mut events);
            self.switch_to_best(cursor, &mut events);

            if self.ctx.all_completed() {
                self.finish(cursor, &mut events);
                break;
            }
            if cursor >= end {
                break;
            }

            // Next decision point inside this tick
            let horizon = self
                .ctx
                .next_arrival()
                .filter(|&arrival| arrival < end)
                .unwrap_or(end);

            cursor = match self.ctx.current {
                Some(id) => self.run(id, cursor, horizon, end, &mut events),
                None => {
                    events.push(SchedEvent::CpuIdle {
                        from: cursor,
                        to: horizon,
                    });
                    horizon
                }
            };
        }

        self.observer.observe(&self.ctx);
        Ok(self.report(events))
    }

    // Serve `id` from `cursor` up to `horizon`; returns the new cursor
    fn run(
        &mut self,
        id: ProcessId,
        cursor: SimTime,
        horizon: SimTime,
        end: SimTime,
        events: &mut Vec<SchedEvent>,
    ) -> SimTime {
        let remaining = self.ctx.process(id).remaining;
        let finish = cursor + remaining;

        if finish > horizon + self.epsilon {
            self.ctx.process_mut(id).consume(horizon - cursor);
            return horizon;
        }

        let finish = finish.min(end);
        self.close_interval(id, finish, events);
        self.scheduler.retire(&mut self.ctx, id);
        self.ctx.mark_completed(id, finish);
        events.push(SchedEvent::Completed {
            process: id,
            at: finish,
        });
        tracing::debug!(
            "Process {} completed at {:.3}",
            self.ctx.process(id).name,
            finish
        );
        finish
    }

    fn admit(&mut self, now: SimTime, events: &mut Vec<SchedEvent>) {
        // Arrivals within epsilon of `now` are due, so rounding in the host's
        // deltas cannot open a sliver of an interval just before an arrival
        for id in self.ctx.admit_due(now + self.epsilon) {
            self.scheduler.enqueue(&mut self.ctx, id);
            events.push(SchedEvent::Admitted {
                process: id,
                at: now,
            });
            tracing::debug!("Process {} admitted at {:.3}", self.ctx.process(id).name, now);
        }
    }

    fn switch_to_best(&mut self, now: SimTime, events: &mut Vec<SchedEvent>) {
        let next = self.scheduler.pick_next(&self.ctx);
        if next == self.ctx.current {
            return;
        }

        if let Some(prev) = self.ctx.current {
            self.close_interval(prev, now, events);
            self.ctx.clear_current();
            if let Some(by) = next {
                events.push(SchedEvent::Preempted {
                    process: prev,
                    by,
                    at: now,
                });
                tracing::debug!(
                    "Process {} preempted by {} at {:.3}",
                    self.ctx.process(prev).name,
                    self.ctx.process(by).name,
                    now
                );
            }
        }

        if let Some(id) = next {
            self.ctx.set_executing(id, now);
            events.push(SchedEvent::Dispatched {
                process: id,
                at: now,
            });
        }
    }

    fn close_interval(&mut self, id: ProcessId, end: SimTime, events: &mut Vec<SchedEvent>) {
        let start = self.ctx.last_switch;
        if end > start {
            events.push(SchedEvent::SliceClosed {
                process: id,
                start,
                end,
            });
        }
    }

    fn finish(&mut self, now: SimTime, events: &mut Vec<SchedEvent>) {
        if let Some(id) = self.ctx.current {
            self.close_interval(id, now, events);
            self.ctx.clear_current();
        }
        self.phase = Phase::Completed;
        events.push(SchedEvent::SimulationCompleted { at: now });
        tracing::info!("Simulation completed at {:.3}", now);
    }

    fn report(&self, events: Vec<SchedEvent>) -> TickReport {
        let running = self.ctx.current;
        TickReport {
            now: self.ctx.clock.now(),
            running,
            progress: running.map(|id| self.ctx.process(id).progress()),
            events,
            completed: self.phase == Phase::Completed,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn now(&self) -> SimTime {
        self.ctx.clock.now()
    }

    pub fn current(&self) -> Option<ProcessId> {
        self.ctx.current
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

impl<S: Scheduler> Default for PreemptiveScheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}
