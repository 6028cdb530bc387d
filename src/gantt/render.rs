use std::fmt;

use rustc_hash::FxHashMap;

use super::recorder::GanttEntry;
use crate::config::ChartConfig;
use crate::core::SimTime;
use crate::error::SimError;

/// Projects a timeline onto one fixed-width text strip per process.
#[derive(Debug, Clone)]
pub struct GanttChartRenderer {
    width: usize,
    active_symbol: char,
    idle_symbol: char,
    label_width: usize,
}

impl GanttChartRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            ..Self::from_config(&ChartConfig::default())
        }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            active_symbol: config.active_symbol,
            idle_symbol: config.idle_symbol,
            label_width: config.label_width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render `entries` against a timeline of `total_duration` seconds.
    ///
    /// An entry covers columns `floor(start / total * width)` up to, but not
    /// including, `ceil(end / total * width) - 1`. Dropping the last column
    /// keeps adjacent intervals from bleeding into each other.
    pub fn render(
        &self,
        entries: &[GanttEntry],
        total_duration: SimTime,
    ) -> Result<GanttChart, SimError> {
        if !(total_duration.is_finite() && total_duration > 0.0) {
            return Err(SimError::DegenerateRender);
        }

        let mut rows: Vec<(String, Vec<char>)> = Vec::new();
        let mut row_of: FxHashMap<&str, usize> = FxHashMap::default();

        for entry in entries {
            let row = *row_of.entry(entry.process.as_str()).or_insert_with(|| {
                rows.push((entry.process.clone(), vec![self.idle_symbol; self.width]));
                rows.len() - 1
            });

            let (start, end) = self.columns(entry, total_duration);
            for cell in &mut rows[row].1[start..end] {
                *cell = self.active_symbol;
            }
        }

        Ok(GanttChart {
            rows: rows
                .into_iter()
                .map(|(name, cells)| (name, cells.into_iter().collect()))
                .collect(),
            entries: entries.to_vec(),
            label_width: self.label_width,
        })
    }

    // Active column range for `entry`, clipped to the strip
    fn columns(&self, entry: &GanttEntry, total_duration: SimTime) -> (usize, usize) {
        let scale = self.width as f64 / total_duration;
        let start = (entry.start * scale).floor().max(0.0) as usize;
        let end = ((entry.end * scale).ceil().max(0.0) as usize)
            .saturating_sub(1)
            .min(self.width);
        (start.min(end), end)
    }
}

impl Default for GanttChartRenderer {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

/// Rendered strips in first-appearance order plus the raw timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttChart {
    rows: Vec<(String, String)>,
    entries: Vec<GanttEntry>,
    label_width: usize,
}

impl GanttChart {
    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    pub fn strip(&self, process: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(name, _)| name == process)
            .map(|(_, strip)| strip.as_str())
    }

    pub fn entries(&self) -> &[GanttEntry] {
        &self.entries
    }

    /// One `name: start to end` line per entry.
    pub fn timeline(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .map(|e| format!("{}: {:.2}s to {:.2}s", e.process, e.start, e.end))
    }
}

impl fmt::Display for GanttChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, strip) in &self.rows {
            writeln!(f, "{:<width$}: {}", name, strip, width = self.label_width)?;
        }
        Ok(())
    }
}
