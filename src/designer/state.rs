use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::partition::PartitionSnapshot;

/// Where the designer is in its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesignerState {
    Uninitialized,
    PopulationGenerated,
    ParentsComposed,
    ParentsEvaluated,
    ParentsSelected,
    OffspringCrossed,
    OffspringMutated,
    OffspringComposed,
    OffspringEvaluated,
    NextGenerationSelected,
    /// Stopped after too many generations without improvement.
    Converged,
    /// Stopped at the generation cap.
    IterationCapped,
    /// Stopped by cancellation or the wall-clock limit.
    Interrupted,
}

impl DesignerState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, DesignerState::Converged | DesignerState::IterationCapped | DesignerState::Interrupted)
    }

    /// True when a new generation may start.
    #[inline]
    pub fn is_ready_for_step(self) -> bool {
        matches!(self, DesignerState::ParentsEvaluated | DesignerState::NextGenerationSelected)
    }
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    IterationCap,
    NoImprovement,
    Cancelled,
    TimeLimit,
}

impl Termination {
    /// Terminal designer state for this reason.
    pub fn state(self) -> DesignerState {
        match self {
            Termination::IterationCap => DesignerState::IterationCapped,
            Termination::NoImprovement => DesignerState::Converged,
            Termination::Cancelled | Termination::TimeLimit => DesignerState::Interrupted,
        }
    }
}

/// Cloneable flag for stopping a running `fit` from another thread.
/// Checked between generations.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed) }

    #[inline] pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

/// Progress summary handed to the `fit_with` observer after each generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    /// Generations completed so far (1-based for the report of the first one).
    pub iteration: usize,
    /// Best-ever score after this generation.
    pub best_score: f64,
    /// Whether this generation strictly improved the best score.
    pub improved: bool,
    /// Number of offspring produced by crossover.
    pub offspring: usize,
    /// Generations since the last improvement.
    pub stale_iterations: usize,
    /// Set at the periodic progress points and on notable improvements.
    pub checkpoint: bool,
    /// Best partition so far, filled in at checkpoints only.
    pub best_snapshot: Option<PartitionSnapshot>,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(DesignerState::Converged.is_terminal());
        assert!(DesignerState::Interrupted.is_terminal());
        assert!(!DesignerState::NextGenerationSelected.is_terminal());
        assert!(DesignerState::ParentsEvaluated.is_ready_for_step());
        assert!(!DesignerState::OffspringMutated.is_ready_for_step());
        assert_eq!(Termination::TimeLimit.state(), DesignerState::Interrupted);
        assert_eq!(Termination::NoImprovement.state(), DesignerState::Converged);
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn termination_serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Termination::NoImprovement).unwrap(), "\"no_improvement\"");
    }
}
