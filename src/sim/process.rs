use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::SimTime;
use crate::error::InputError;

/// Immutable definition of one racing process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    pub name: String,
    pub arrival_time: SimTime,
    pub burst_time: SimTime,
    // Lower value runs first
    pub priority: f64,
}

impl ProcessDescriptor {
    pub fn new(
        name: impl Into<String>,
        arrival_time: SimTime,
        burst_time: SimTime,
        priority: f64,
    ) -> Self {
        Self {
            name: name.into(),
            arrival_time,
            burst_time,
            priority,
        }
    }

    pub fn validate(&self, index: usize) -> Result<(), InputError> {
        if self.name.trim().is_empty() {
            return Err(InputError::EmptyName { index });
        }
        if !(self.arrival_time.is_finite() && self.arrival_time >= 0.0) {
            return Err(InputError::InvalidArrival {
                name: self.name.clone(),
                value: self.arrival_time,
            });
        }
        if !(self.burst_time.is_finite() && self.burst_time > 0.0) {
            return Err(InputError::InvalidBurst {
                name: self.name.clone(),
                value: self.burst_time,
            });
        }
        if !self.priority.is_finite() {
            return Err(InputError::InvalidPriority {
                name: self.name.clone(),
                value: self.priority,
            });
        }
        Ok(())
    }
}

/// Check a whole process set before it reaches the engine.
pub fn validate_descriptors(descriptors: &[ProcessDescriptor]) -> Result<(), InputError> {
    if descriptors.is_empty() {
        return Err(InputError::EmptyProcessList);
    }

    let mut seen = FxHashSet::default();
    for (index, descriptor) in descriptors.iter().enumerate() {
        descriptor.validate(index)?;
        if !seen.insert(descriptor.name.as_str()) {
            return Err(InputError::DuplicateName {
                name: descriptor.name.clone(),
            });
        }
    }
    Ok(())
}
