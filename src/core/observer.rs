use super::state::{ProcessState, SimCtx};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        let executing = ctx
            .processes
            .values()
            .filter(|p| p.state == ProcessState::Executing)
            .count();
        debug_assert!(
            executing <= 1,
            "{executing} processes executing at t={}",
            ctx.clock.now()
        );

        if let Some(id) = ctx.current {
            let process = ctx.process(id);
            debug_assert_eq!(
                process.state,
                ProcessState::Executing,
                "current process {} must be Executing",
                process.name
            );
            debug_assert!(
                ctx.last_switch <= ctx.clock.now(),
                "open interval for {} starts in the future",
                process.name
            );
        } else {
            debug_assert_eq!(executing, 0, "executing process without ctx.current");
        }

        for process in ctx.processes.values() {
            debug_assert!(
                process.remaining >= 0.0 && process.remaining <= process.burst_time,
                "process {} remaining {} outside [0, {}]",
                process.name,
                process.remaining,
                process.burst_time
            );
            debug_assert!(
                (0.0..1.0).contains(&process.second_accumulator),
                "process {} second accumulator {} outside [0, 1)",
                process.name,
                process.second_accumulator
            );
            if process.is_completed() {
                debug_assert_eq!(
                    process.remaining, 0.0,
                    "completed process {} has remaining service",
                    process.name
                );
            }
            if process.state == ProcessState::Pending {
                debug_assert!(
                    process.arrival_time > ctx.clock.now(),
                    "process {} arrived at {} but was never admitted",
                    process.name,
                    process.arrival_time
                );
            }
        }
    }
}
