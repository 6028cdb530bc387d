pub mod priq;

use crate::core::state::{ProcessId, SimCtx};
pub use priq::PriorityScheduler;

/// Selection policy consulted by the engine at every decision point.
///
/// The engine owns time and progress; a policy only keeps the set of
/// admitted, unfinished processes in the order it wants them to run.
pub trait Scheduler {
    fn init(ctx: &mut SimCtx) -> Self;

    /// Forget every queued process before a new race.
    fn reset(&mut self, ctx: &mut SimCtx);

    /// A process was admitted and can compete for the CPU.
    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId);

    /// The process that should hold the CPU right now, if any.
    fn pick_next(&mut self, ctx: &SimCtx) -> Option<ProcessId>;

    /// A process finished and must never be picked again.
    fn retire(&mut self, ctx: &mut SimCtx, process: ProcessId);

    fn queued(&self) -> usize;
}
