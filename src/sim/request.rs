//! Boundary parser for structured scheduling requests such as:
//!
//! ```text
//! Simulate preemptive priority scheduling.
//! Arrival times: 0,1,2
//! Burst times: 5,3,4
//! Priorities: 1,2,1
//! ```

use super::process::{ProcessDescriptor, validate_descriptors};
use crate::error::{InputError, SimError};

/// Three equal-length lists describing a process set.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub arrivals: Vec<f64>,
    pub bursts: Vec<f64>,
    pub priorities: Vec<f64>,
}

impl SimulationRequest {
    /// Parse a request naming the algorithm and the three lists.
    pub fn parse(text: &str) -> Result<Self, SimError> {
        if !names_preemptive_priority(text) {
            tracing::warn!("Rejected request for an unsupported scheduling algorithm");
            return Err(SimError::UnsupportedAlgorithm);
        }

        let lower = text.to_ascii_lowercase();
        let arrivals = numbers_after(&lower, &["arrival times", "arrival time"], "arrival time")?;
        let bursts = numbers_after(&lower, &["burst times", "burst time"], "burst time")?;
        let priorities = numbers_after(&lower, &["priorities", "priority"], "priority")?;

        Self::from_lists(arrivals, bursts, priorities)
    }

    pub fn from_lists(
        arrivals: Vec<f64>,
        bursts: Vec<f64>,
        priorities: Vec<f64>,
    ) -> Result<Self, SimError> {
        if arrivals.len() != bursts.len() || arrivals.len() != priorities.len() {
            return Err(InputError::MismatchedLengths {
                arrivals: arrivals.len(),
                bursts: bursts.len(),
                priorities: priorities.len(),
            }
            .into());
        }
        Ok(Self {
            arrivals,
            bursts,
            priorities,
        })
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Validated descriptors named `P1..Pn` in list order.
    pub fn descriptors(&self) -> Result<Vec<ProcessDescriptor>, SimError> {
        let descriptors: Vec<_> = self
            .arrivals
            .iter()
            .zip(&self.bursts)
            .zip(&self.priorities)
            .enumerate()
            .map(|(i, ((&arrival, &burst), &priority))| {
                ProcessDescriptor::new(format!("P{}", i + 1), arrival, burst, priority)
            })
            .collect();

        validate_descriptors(&descriptors)?;
        Ok(descriptors)
    }
}

// "preemptive" directly followed by "priority", ignoring case and punctuation
fn names_preemptive_priority(text: &str) -> bool {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_ascii_lowercase()
        })
        .collect();

    words
        .windows(2)
        .any(|pair| pair[0] == "preemptive" && pair[1] == "priority")
}

fn numbers_after(
    lower: &str,
    keywords: &[&str],
    field: &'static str,
) -> Result<Vec<f64>, InputError> {
    for keyword in keywords {
        for (pos, _) in lower.match_indices(keyword) {
            let Some(rest) = lower[pos + keyword.len()..].trim_start().strip_prefix(':') else {
                continue;
            };

            let end = rest
                .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ',' || c.is_whitespace()))
                .unwrap_or(rest.len());
            let values = rest[..end]
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::parse::<f64>)
                .collect::<Result<Vec<_>, _>>();

            return match values {
                Ok(values) if !values.is_empty() => Ok(values),
                _ => Err(InputError::MissingList { field }),
            };
        }
    }
    Err(InputError::MissingList { field })
}
