/// Simulated seconds.
pub type SimTime = f64;

/// Monotonic simulation time source. Advancing it is its only effect.
#[derive(Debug, Clone, Default)]
pub struct SchedulingClock {
    now: SimTime,
    ticks: u64,
}

impl SchedulingClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `delta` and return the new time.
    pub fn advance(&mut self, delta: SimTime) -> SimTime {
        debug_assert!(delta >= 0.0, "clock cannot run backwards ({delta})");
        self.now += delta;
        self.ticks = self.ticks.saturating_add(1);
        self.now
    }

    pub fn reset(&mut self) {
        self.now = 0.0;
        self.ticks = 0;
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
