use serde::{Deserialize, Serialize};

use crate::{
    config::DesignerConfig,
    designer::{DesignerState, Termination},
    partition::PartitionSnapshot,
};

/// Everything worth keeping from a run, in a serializable form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub config: DesignerConfig,
    /// RNG seed actually used, so the run can be replayed.
    pub seed: u64,
    pub state: DesignerState,
    pub termination: Option<Termination>,
    pub iterations: usize,
    pub elapsed_secs: f64,
    pub best: PartitionSnapshot,
    /// Best score before each generation.
    pub score_history: Vec<f64>,
}
