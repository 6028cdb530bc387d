pub mod recorder;
pub mod render;

pub use recorder::{GanttEntry, GanttRecorder};
pub use render::{GanttChart, GanttChartRenderer};
