use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;

use super::{ProcessId, Scheduler, SimCtx};

/// Ready queue rank: numerically lower priority first, then admission order.
///
/// Equal priorities never preempt each other; the process admitted first
/// keeps the CPU.
#[derive(Debug, Clone, Copy)]
pub struct ReadyRank {
    pub priority: f64,
    pub seq: u64,
}

// KeyedPriorityQueue is a max-heap, so the better rank must compare greater
impl Ord for ReadyRank {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ReadyRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ReadyRank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReadyRank {}

/// Preemptive priority policy backed by a keyed ready queue.
///
/// The queue holds every admitted, unfinished process including the one on
/// the CPU, so the head is always the process that should be executing.
#[derive(Debug)]
pub struct PriorityScheduler {
    ready: KeyedPriorityQueue<ProcessId, ReadyRank>,
    // Admissions so far; simultaneous arrivals are admitted in input order
    admitted: u64,
}

impl Scheduler for PriorityScheduler {
    fn init(_ctx: &mut SimCtx) -> Self {
        Self {
            ready: KeyedPriorityQueue::new(),
            admitted: 0,
        }
    }

    fn reset(&mut self, _ctx: &mut SimCtx) {
        self.ready = KeyedPriorityQueue::new();
        self.admitted = 0;
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId) {
        let state = ctx.process(process);
        debug_assert!(
            state.is_running(),
            "process {} enqueued before admission",
            state.name
        );
        let replaced = self.ready.push(
            process,
            ReadyRank {
                priority: state.priority,
                seq: self.admitted,
            },
        );
        self.admitted += 1;
        debug_assert!(replaced.is_none(), "process {} enqueued twice", state.name);
    }

    fn pick_next(&mut self, _ctx: &SimCtx) -> Option<ProcessId> {
        self.ready.peek().map(|(&id, _)| id)
    }

    fn retire(&mut self, _ctx: &mut SimCtx, process: ProcessId) {
        self.ready.remove(&process);
    }

    fn queued(&self) -> usize {
        self.ready.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ProcessDescriptor;

    fn admitted(descriptors: &[ProcessDescriptor]) -> (SimCtx, PriorityScheduler) {
        let mut ctx = SimCtx::new();
        ctx.load(descriptors);
        let mut scheduler = PriorityScheduler::init(&mut ctx);
        for id in ctx.admit_due(f64::MAX) {
            scheduler.enqueue(&mut ctx, id);
        }
        (ctx, scheduler)
    }

    fn picked(ctx: &SimCtx, scheduler: &mut PriorityScheduler) -> Option<String> {
        scheduler
            .pick_next(ctx)
            .map(|id| ctx.process(id).name.clone())
    }

    #[test]
    fn test_lowest_priority_value_wins() {
        let (ctx, mut scheduler) = admitted(&[
            ProcessDescriptor::new("low", 0.0, 1.0, 3.0),
            ProcessDescriptor::new("high", 0.0, 1.0, 1.0),
            ProcessDescriptor::new("mid", 0.0, 1.0, 2.0),
        ]);

        assert_eq!(scheduler.queued(), 3);
        assert_eq!(picked(&ctx, &mut scheduler).as_deref(), Some("high"));
    }

    #[test]
    fn test_ties_follow_input_order() {
        let (mut ctx, mut scheduler) = admitted(&[
            ProcessDescriptor::new("first", 0.0, 1.0, 1.0),
            ProcessDescriptor::new("second", 0.0, 1.0, 1.0),
            ProcessDescriptor::new("third", 0.0, 1.0, 1.0),
        ]);

        assert_eq!(picked(&ctx, &mut scheduler).as_deref(), Some("first"));
        let first = ctx.by_name["first"];
        scheduler.retire(&mut ctx, first);
        assert_eq!(picked(&ctx, &mut scheduler).as_deref(), Some("second"));
    }

    #[test]
    fn test_ties_follow_admission_order_not_input_order() {
        let mut ctx = SimCtx::new();
        ctx.load(&[
            ProcessDescriptor::new("late", 2.0, 1.0, 1.0),
            ProcessDescriptor::new("early", 0.0, 1.0, 1.0),
        ]);
        let mut scheduler = PriorityScheduler::init(&mut ctx);

        for id in ctx.admit_due(0.0) {
            scheduler.enqueue(&mut ctx, id);
        }
        assert_eq!(picked(&ctx, &mut scheduler).as_deref(), Some("early"));

        for id in ctx.admit_due(2.0) {
            scheduler.enqueue(&mut ctx, id);
        }
        assert_eq!(scheduler.queued(), 2);
        assert_eq!(picked(&ctx, &mut scheduler).as_deref(), Some("early"));
    }

    #[test]
    fn test_negative_and_fractional_priorities() {
        let (ctx, mut scheduler) = admitted(&[
            ProcessDescriptor::new("a", 0.0, 1.0, 0.5),
            ProcessDescriptor::new("b", 0.0, 1.0, -2.0),
            ProcessDescriptor::new("c", 0.0, 1.0, 0.25),
        ]);

        assert_eq!(picked(&ctx, &mut scheduler).as_deref(), Some("b"));
    }

    #[test]
    fn test_retire_and_reset_empty_the_queue() {
        let (mut ctx, mut scheduler) = admitted(&[ProcessDescriptor::new("only", 0.0, 1.0, 1.0)]);

        let only = ctx.by_name["only"];
        scheduler.retire(&mut ctx, only);
        assert_eq!(scheduler.pick_next(&ctx), None);

        let (mut ctx, mut scheduler) = admitted(&[
            ProcessDescriptor::new("a", 0.0, 1.0, 1.0),
            ProcessDescriptor::new("b", 0.0, 1.0, 1.0),
        ]);
        scheduler.reset(&mut ctx);
        assert_eq!(scheduler.queued(), 0);
    }
}
