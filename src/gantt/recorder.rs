use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::SimTime;

/// One interval during which `process` held the CPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttEntry {
    pub process: String,
    pub start: SimTime,
    pub end: SimTime,
}

impl GanttEntry {
    pub fn new(process: impl Into<String>, start: SimTime, end: SimTime) -> Self {
        Self {
            process: process.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> SimTime {
        self.end - self.start
    }
}

/// Append-only execution timeline.
#[derive(Debug, Clone, Default)]
pub struct GanttRecorder {
    entries: Vec<GanttEntry>,
}

impl GanttRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an interval. Empty or inverted intervals are ignored; returns
    /// whether the entry was kept.
    pub fn append(&mut self, entry: GanttEntry) -> bool {
        // Also rejects NaN bounds
        if entry.end.partial_cmp(&entry.start) != Some(Ordering::Greater) {
            return false;
        }
        debug_assert!(
            self.entries
                .last()
                .is_none_or(|last| last.start <= entry.start),
            "entry for {} starts at {} before the previous entry",
            entry.process,
            entry.start
        );
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[GanttEntry] {
        &self.entries
    }

    /// Latest end time, or zero when nothing was recorded.
    pub fn total_duration(&self) -> SimTime {
        self.entries.iter().map(|e| e.end).fold(0.0, f64::max)
    }

    /// Sum of all intervals recorded for `process`.
    pub fn busy_time(&self, process: &str) -> SimTime {
        self.entries
            .iter()
            .filter(|e| e.process == process)
            .map(GanttEntry::duration)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
