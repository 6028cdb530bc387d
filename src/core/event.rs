use crate::core::{ProcessId, SimTime};

#[derive(Debug, Clone, PartialEq)]
pub enum SchedEvent {
    Admitted {
        process: ProcessId,
        at: SimTime,
    },
    // Process took the CPU and opened a timeline interval
    Dispatched {
        process: ProcessId,
        at: SimTime,
    },
    Preempted {
        process: ProcessId,
        by: ProcessId,
        at: SimTime,
    },
    // A closed, non-empty execution interval
    SliceClosed {
        process: ProcessId,
        start: SimTime,
        end: SimTime,
    },
    Completed {
        process: ProcessId,
        at: SimTime,
    },
    // No admitted work between `from` and `to`
    CpuIdle {
        from: SimTime,
        to: SimTime,
    },
    SimulationCompleted {
        at: SimTime,
    },
}
