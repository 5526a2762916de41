mod crossover;
mod fitness;
mod partition;
mod problem;
mod seeds;
mod snapshot;

pub use fitness::{Deviation, Fitness};
pub use partition::{PARALLEL_DECODE_THRESHOLD, Partition};
pub use problem::ZoningProblem;
pub use seeds::MAX_SAMPLING_ATTEMPTS;
pub use snapshot::{PartitionSnapshot, ZoneSnapshot};
