use super::process::ProcessDescriptor;
use crate::{
    config::RaceConfig,
    core::{PreemptiveScheduler, ProcessId, SchedEvent, SimTime, TickReport},
    error::SimError,
    gantt::{GanttChart, GanttChartRenderer, GanttEntry, GanttRecorder},
    scheduler::{PriorityScheduler, Scheduler},
};

/// Outcome bookkeeping for one process, filled in from engine events.
#[derive(Debug, Clone)]
pub struct ProcessInstance {
    pub descriptor: ProcessDescriptor,
    pub id: ProcessId,
    pub first_run: Option<SimTime>,
    pub completion_time: Option<SimTime>,
}

impl ProcessInstance {
    /// Time from arrival to first dispatch.
    pub fn response_time(&self) -> Option<SimTime> {
        self.first_run.map(|t| t - self.descriptor.arrival_time)
    }

    /// Time from arrival to completion.
    pub fn turnaround_time(&self) -> Option<SimTime> {
        self.completion_time
            .map(|t| t - self.descriptor.arrival_time)
    }

    /// Time spent admitted but off the CPU.
    pub fn waiting_time(&self) -> Option<SimTime> {
        self.turnaround_time()
            .map(|t| (t - self.descriptor.burst_time).max(0.0))
    }
}

/// One race: an engine, its timeline recorder and the chart renderer.
///
/// The host owns the race and steps it once per frame; stopping the race is
/// simply not calling [`Race::step`] again.
pub struct Race<S: Scheduler = PriorityScheduler> {
    pub core: PreemptiveScheduler<S>,
    pub processes: Vec<ProcessInstance>,
    recorder: GanttRecorder,
    renderer: GanttChartRenderer,
    tick_delta: SimTime,
}

impl<S: Scheduler> Race<S> {
    pub fn new(descriptors: Vec<ProcessDescriptor>, config: &RaceConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut core = PreemptiveScheduler::<S>::with_epsilon(config.completion_epsilon);
        core.initialize(&descriptors)?;

        let processes = descriptors
            .into_iter()
            .zip(core.ctx.order.iter().copied())
            .map(|(descriptor, id)| ProcessInstance {
                descriptor,
                id,
                first_run: None,
                completion_time: None,
            })
            .collect();

        Ok(Self {
            core,
            processes,
            recorder: GanttRecorder::new(),
            renderer: GanttChartRenderer::from_config(&config.chart),
            tick_delta: config.tick_delta,
        })
    }

    /// Advance the race by `delta` simulated seconds.
    pub fn step(&mut self, delta: SimTime) -> Result<TickReport, SimError> {
        let report = self.core.tick(delta)?;
        for event in &report.events {
            self.apply(event);
        }
        Ok(report)
    }

    fn apply(&mut self, event: &SchedEvent) {
        match *event {
            SchedEvent::Dispatched { process, at } => {
                let instance = self.instance_mut(process);
                instance.first_run.get_or_insert(at);
            }
            SchedEvent::SliceClosed {
                process,
                start,
                end,
            } => {
                let name = self.core.ctx.process(process).name.clone();
                self.recorder.append(GanttEntry::new(name, start, end));
            }
            SchedEvent::Completed { process, at } => {
                self.instance_mut(process).completion_time = Some(at);
            }
            _ => {}
        }
    }

    fn instance_mut(&mut self, id: ProcessId) -> &mut ProcessInstance {
        let index = self.core.ctx.process(id).index;
        &mut self.processes[index]
    }

    /// Step with the configured delta until the race completes.
    pub fn run_to_completion(&mut self) -> Result<GanttChart, SimError> {
        while !self.is_complete() {
            let report = self.step(self.tick_delta)?;
            for event in &report.events {
                tracing::trace!("t={:.3} {:?}", report.now, event);
            }
        }
        self.chart()
    }

    pub fn is_complete(&self) -> bool {
        self.core.is_complete()
    }

    pub fn now(&self) -> SimTime {
        self.core.now()
    }

    /// Progress fraction of every process, in input order.
    pub fn progress(&self) -> Vec<(&str, f64)> {
        self.core
            .ctx
            .iter()
            .map(|p| (p.name.as_str(), p.progress()))
            .collect()
    }

    /// Simulated time at which the last process finished.
    pub fn completion_time(&self) -> Option<SimTime> {
        self.is_complete().then(|| self.recorder.total_duration())
    }

    pub fn timeline(&self) -> &GanttRecorder {
        &self.recorder
    }

    pub fn chart(&self) -> Result<GanttChart, SimError> {
        self.renderer
            .render(self.recorder.entries(), self.recorder.total_duration())
    }

    pub fn processes_map<T, F>(&self, f: F) -> impl Iterator<Item = T>
    where
        F: Fn(&ProcessInstance) -> Option<T>,
    {
        self.processes.iter().filter_map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(descriptors: Vec<ProcessDescriptor>) -> Race {
        Race::new(descriptors, &RaceConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RaceConfig {
            tick_delta: -1.0,
            ..RaceConfig::default()
        };
        let result: Result<Race, _> =
            Race::new(vec![ProcessDescriptor::new("P1", 0.0, 1.0, 1.0)], &config);
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_instances_track_outcomes() {
        let mut race = race(vec![
            ProcessDescriptor::new("P1", 0.0, 5.0, 2.0),
            ProcessDescriptor::new("P2", 2.0, 3.0, 1.0),
        ]);

        while !race.is_complete() {
            race.step(0.5).unwrap();
        }

        let p1 = &race.processes[0];
        assert_eq!(p1.response_time(), Some(0.0));
        assert_eq!(p1.turnaround_time(), Some(8.0));
        assert_eq!(p1.waiting_time(), Some(3.0));

        let p2 = &race.processes[1];
        assert_eq!(p2.response_time(), Some(0.0));
        assert_eq!(p2.turnaround_time(), Some(3.0));
        assert_eq!(p2.waiting_time(), Some(0.0));

        assert_eq!(race.completion_time(), Some(8.0));
        let turnarounds: Vec<_> = race.processes_map(|p| p.turnaround_time()).collect();
        assert_eq!(turnarounds, vec![8.0, 3.0]);
    }

    #[test]
    fn test_progress_reports_every_process() {
        let mut race = race(vec![
            ProcessDescriptor::new("A", 0.0, 4.0, 1.0),
            ProcessDescriptor::new("B", 0.0, 2.0, 2.0),
        ]);

        race.step(1.0).unwrap();
        assert_eq!(race.progress(), vec![("A", 0.25), ("B", 0.0)]);
        assert_eq!(race.completion_time(), None);
    }

    #[test]
    fn test_run_to_completion_renders_chart() {
        let mut race = race(vec![ProcessDescriptor::new("solo", 0.0, 1.0, 1.0)]);
        let chart = race.run_to_completion().unwrap();

        assert!(race.is_complete());
        assert_eq!(chart.rows().len(), 1);
        assert_eq!(chart.entries().len(), 1);
        assert!((chart.entries()[0].end - 1.0).abs() < 1e-9);
    }
}
