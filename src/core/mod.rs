pub mod clock;
pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use clock::{SchedulingClock, SimTime};
pub use driver::{Phase, PreemptiveScheduler, TickReport};
pub use event::SchedEvent;
pub use state::{ProcessId, ProcessRuntimeState, ProcessState, SimCtx};
