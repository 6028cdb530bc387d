use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use super::clock::{SchedulingClock, SimTime};
use crate::sim::ProcessDescriptor;

new_key_type! {
    pub struct ProcessId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    // Not yet arrived
    Pending,
    Ready,
    Executing,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRuntimeState {
    pub id: ProcessId,
    // Position in the descriptor list; breaks priority ties
    pub index: usize,
    pub name: String,
    pub arrival_time: SimTime,
    pub burst_time: SimTime,
    pub priority: f64,
    pub state: ProcessState,
    pub remaining: SimTime,
    pub second_accumulator: SimTime,
    // Whole-second countdown shown next to a car, independent of `remaining`
    pub display_seconds: SimTime,
    pub first_run: Option<SimTime>,
    pub completion_time: Option<SimTime>,
}

impl ProcessRuntimeState {
    /// Admitted and unfinished. This does not mean the process holds the CPU.
    pub fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Ready | ProcessState::Executing)
    }

    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }

    /// Fraction of the burst already served, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        ((self.burst_time - self.remaining) / self.burst_time).clamp(0.0, 1.0)
    }

    /// Apply `span` seconds of service that do not finish the process.
    pub fn consume(&mut self, span: SimTime) {
        debug_assert!(span >= 0.0, "negative service span {span}");
        self.remaining = (self.remaining - span).max(0.0);
        self.second_accumulator += span;
        if self.second_accumulator >= 1.0 {
            let secs = self.second_accumulator.floor();
            self.display_seconds = (self.display_seconds - secs).max(0.0);
            self.second_accumulator -= secs;
        }
    }
}

#[derive(Debug)]
pub struct SimCtx {
    pub clock: SchedulingClock,
    pub processes: SlotMap<ProcessId, ProcessRuntimeState>,
    // Descriptor order
    pub order: Vec<ProcessId>,
    pub by_name: FxHashMap<String, ProcessId>,
    pub current: Option<ProcessId>,
    pub last_switch: SimTime,

    // Sorted by (arrival_time, index); admission walks it with a cursor
    arrivals: Vec<ProcessId>,
    arrival_cursor: usize,
}

impl SimCtx {
    pub fn new() -> Self {
        Self {
            clock: SchedulingClock::new(),
            processes: SlotMap::with_key(),
            order: Vec::new(),
            by_name: FxHashMap::default(),
            current: None,
            last_switch: 0.0,
            arrivals: Vec::new(),
            arrival_cursor: 0,
        }
    }

    /// Drop all state and rebuild it from `descriptors`.
    pub fn load(&mut self, descriptors: &[ProcessDescriptor]) {
        self.clear();
        self.processes.reserve(descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            let id = self.create_process(index, descriptor);
            self.order.push(id);
            self.by_name.insert(descriptor.name.clone(), id);
        }

        let mut arrivals = self.order.clone();
        arrivals.sort_by(|&a, &b| {
            let (a, b) = (&self.processes[a], &self.processes[b]);
            a.arrival_time
                .total_cmp(&b.arrival_time)
                .then_with(|| a.index.cmp(&b.index))
        });
        self.arrivals = arrivals;
    }

    pub fn clear(&mut self) {
        self.clock.reset();
        self.processes.clear();
        self.order.clear();
        self.by_name.clear();
        self.current = None;
        self.last_switch = 0.0;
        self.arrivals.clear();
        self.arrival_cursor = 0;
    }

    fn create_process(&mut self, index: usize, descriptor: &ProcessDescriptor) -> ProcessId {
        self.processes.insert_with_key(|id| ProcessRuntimeState {
            id,
            index,
            name: descriptor.name.clone(),
            arrival_time: descriptor.arrival_time,
            burst_time: descriptor.burst_time,
            priority: descriptor.priority,
            state: ProcessState::Pending,
            remaining: descriptor.burst_time,
            second_accumulator: 0.0,
            display_seconds: descriptor.burst_time,
            first_run: None,
            completion_time: None,
        })
    }

    pub fn process(&self, id: ProcessId) -> &ProcessRuntimeState {
        &self.processes[id]
    }

    pub fn process_mut(&mut self, id: ProcessId) -> &mut ProcessRuntimeState {
        &mut self.processes[id]
    }

    pub fn lookup(&self, name: &str) -> Option<&ProcessRuntimeState> {
        self.by_name.get(name).map(|&id| &self.processes[id])
    }

    /// Processes in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = &ProcessRuntimeState> + '_ {
        self.order.iter().map(|&id| &self.processes[id])
    }

    /// Admit every pending process whose arrival time is at or before `now`.
    pub fn admit_due(&mut self, now: SimTime) -> Vec<ProcessId> {
        let mut admitted = Vec::new();
        while let Some(&id) = self.arrivals.get(self.arrival_cursor) {
            let process = &mut self.processes[id];
            if process.arrival_time > now {
                break;
            }
            debug_assert_eq!(process.state, ProcessState::Pending);
            process.state = ProcessState::Ready;
            admitted.push(id);
            self.arrival_cursor += 1;
        }
        admitted
    }

    /// Arrival time of the next process still waiting for admission.
    pub fn next_arrival(&self) -> Option<SimTime> {
        self.arrivals
            .get(self.arrival_cursor)
            .map(|&id| self.processes[id].arrival_time)
    }

    pub fn set_executing(&mut self, id: ProcessId, now: SimTime) {
        debug_assert!(
            self.current.is_none(),
            "process {:?} already executing",
            self.current
        );
        let process = &mut self.processes[id];
        debug_assert_eq!(process.state, ProcessState::Ready);
        process.state = ProcessState::Executing;
        process.first_run.get_or_insert(now);
        self.current = Some(id);
        self.last_switch = now;
    }

    /// Take the CPU away from the current process, returning it to the ready set.
    pub fn clear_current(&mut self) -> Option<ProcessId> {
        let id = self.current.take()?;
        let process = &mut self.processes[id];
        if process.state == ProcessState::Executing {
            process.state = ProcessState::Ready;
        }
        Some(id)
    }

    pub fn mark_completed(&mut self, id: ProcessId, completion_time: SimTime) {
        let process = &mut self.processes[id];
        debug_assert_eq!(
            process.state,
            ProcessState::Executing,
            "process {} must be executing before it completes",
            process.name
        );
        process.state = ProcessState::Completed;
        process.remaining = 0.0;
        process.display_seconds = 0.0;
        process.completion_time = Some(completion_time);
        if self.current == Some(id) {
            self.current = None;
        }
    }

    pub fn all_completed(&self) -> bool {
        self.processes.values().all(|p| p.remaining <= 0.0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(descriptors: &[ProcessDescriptor]) -> SimCtx {
        let mut ctx = SimCtx::new();
        ctx.load(descriptors);
        ctx
    }

    #[test]
    fn test_load_builds_runtime_state() {
        let ctx = ctx(&[
            ProcessDescriptor::new("P1", 2.0, 5.0, 1.0),
            ProcessDescriptor::new("P2", 0.0, 3.0, 2.0),
        ]);

        assert_eq!(ctx.len(), 2);
        let p1 = ctx.lookup("P1").unwrap();
        assert_eq!(p1.index, 0);
        assert_eq!(p1.remaining, 5.0);
        assert_eq!(p1.state, ProcessState::Pending);
        assert!(!p1.is_running());
        assert_eq!(ctx.next_arrival(), Some(0.0));
    }

    #[test]
    fn test_admission_follows_arrival_order() {
        let mut ctx = ctx(&[
            ProcessDescriptor::new("late", 3.0, 1.0, 1.0),
            ProcessDescriptor::new("early", 1.0, 1.0, 1.0),
            ProcessDescriptor::new("also-early", 1.0, 1.0, 1.0),
        ]);

        assert!(ctx.admit_due(0.5).is_empty());
        let admitted: Vec<_> = ctx
            .admit_due(1.0)
            .into_iter()
            .map(|id| ctx.process(id).name.clone())
            .collect();
        assert_eq!(admitted, vec!["early", "also-early"]);
        assert_eq!(ctx.next_arrival(), Some(3.0));
        assert!(ctx.lookup("early").unwrap().is_running());

        assert_eq!(ctx.admit_due(10.0).len(), 1);
        assert_eq!(ctx.next_arrival(), None);
    }

    #[test]
    fn test_consume_rolls_whole_seconds() {
        let mut ctx = ctx(&[ProcessDescriptor::new("P1", 0.0, 5.0, 1.0)]);
        let id = ctx.order[0];
        let process = ctx.process_mut(id);

        process.consume(0.75);
        assert_eq!(process.display_seconds, 5.0);
        process.consume(0.5);
        assert_eq!(process.display_seconds, 4.0);
        assert!((process.second_accumulator - 0.25).abs() < 1e-12);
        assert!((process.remaining - 3.75).abs() < 1e-12);
        assert!((process.progress() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_complete_clears_current() {
        let mut ctx = ctx(&[ProcessDescriptor::new("P1", 0.0, 1.0, 1.0)]);
        let id = ctx.admit_due(0.0)[0];
        ctx.set_executing(id, 0.0);
        assert_eq!(ctx.current, Some(id));

        ctx.mark_completed(id, 1.0);
        assert_eq!(ctx.current, None);
        assert!(ctx.all_completed());
        assert_eq!(ctx.process(id).completion_time, Some(1.0));
        assert!(!ctx.process(id).is_running());
    }
}
