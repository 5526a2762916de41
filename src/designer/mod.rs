mod designer;
mod generation;
mod report;
mod state;

pub use designer::PartitionDesigner;
pub use report::DesignReport;
pub use state::{CancelToken, DesignerState, GenerationReport, Termination};
