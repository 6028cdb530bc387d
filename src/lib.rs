//! # sched-race
//!
//! Preemptive priority scheduling simulator that runs processes as a race.
//!
//! A host loop owns a [`Race`], calls [`Race::step`] once per frame with the
//! elapsed simulated time, moves its visual markers from the reported
//! progress, and renders the recorded Gantt timeline once the race completes.

pub mod config;
pub mod core;
pub mod error;
pub mod gantt;
pub mod scheduler;
pub mod sim;


pub use config::{ChartConfig, RaceConfig};
pub use crate::core::{PreemptiveScheduler, SchedEvent, TickReport};
pub use error::{InputError, SimError};
pub use gantt::{GanttChart, GanttChartRenderer, GanttEntry, GanttRecorder};
pub use scheduler::Scheduler;
pub use sim::{ProcessDescriptor, Race, SimulationRequest};

/// Default number of columns in a rendered strip
pub const DEFAULT_CHART_WIDTH: usize = 50;

/// Default label padding in a rendered chart
pub const DEFAULT_LABEL_WIDTH: usize = 10;

pub const DEFAULT_ACTIVE_SYMBOL: char = '#';
pub const DEFAULT_IDLE_SYMBOL: char = '=';

/// Default host step (one 60 Hz frame)
pub const DEFAULT_TICK_DELTA: f64 = 1.0 / 60.0;

/// Remaining service at or below this counts as finished
pub const DEFAULT_COMPLETION_EPSILON: f64 = 1e-9;
