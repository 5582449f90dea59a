//! Batch orchestration: tree walking, path mapping, outcome accounting.

mod batch;
mod scan;
mod types;

pub use batch::{BatchRunner, RunnerError};
pub use scan::{collect_sources, output_path_for};
pub use types::RunSummary;
