//! Error types for the race simulator

use thiserror::Error;

/// Errors that can occur while setting up, stepping or rendering a race
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Unsupported scheduling algorithm: only preemptive priority is available")]
    UnsupportedAlgorithm,

    #[error("Nothing to render: recorded timeline has zero duration")]
    DegenerateRender,

    #[error("Simulation has not been initialized")]
    NotStarted,

    #[error("Tick delta must be finite and non-negative, got {0}")]
    InvalidDelta(f64),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors related to process definitions and parsed requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Process list is empty")]
    EmptyProcessList,

    #[error("Process at position {index} has an empty name")]
    EmptyName { index: usize },

    #[error("Process name {name} is used more than once")]
    DuplicateName { name: String },

    #[error("Process {name} has invalid arrival time {value}")]
    InvalidArrival { name: String, value: f64 },

    #[error("Process {name} has invalid burst time {value}")]
    InvalidBurst { name: String, value: f64 },

    #[error("Process {name} has invalid priority {value}")]
    InvalidPriority { name: String, value: f64 },

    #[error("Could not find a {field} list in the request")]
    MissingList { field: &'static str },

    #[error(
        "List lengths differ: {arrivals} arrival times, {bursts} burst times, {priorities} priorities"
    )]
    MismatchedLengths {
        arrivals: usize,
        bursts: usize,
        priorities: usize,
    },
}

impl SimError {
    /// True for errors the caller should treat as "nothing to display"
    pub fn is_degenerate(&self) -> bool {
        matches!(self, SimError::DegenerateRender)
    }
}
