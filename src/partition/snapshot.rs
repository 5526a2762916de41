use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::partition::Partition;

/// Read-only summary of one evaluated zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub seed: [f64; 2],
    pub population: f64,
    pub cost: f64,
    pub unconnected: usize,
    /// District codes in decode order.
    pub districts: Vec<String>,
}

/// Read-only summary of an evaluated partition, suitable for reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    pub score: f64,
    pub zones: Vec<ZoneSnapshot>,
}

impl Partition {
    /// Summarize the partition. Fails with `NotReady` before `evaluate`.
    pub fn snapshot(&self) -> Result<PartitionSnapshot> {
        let table = self.problem.table();
        let score = self.score()?;
        let zones = self.zones.iter()
            .map(|zone| -> Result<ZoneSnapshot> { Ok(ZoneSnapshot {
                seed: [zone.seed().x(), zone.seed().y()],
                population: zone.value(),
                cost: zone.cost()?,
                unconnected: zone.unconnected()?,
                districts: zone.districts().iter()
                    .map(|entry| table.unit(entry.unit as usize).code().to_string())
                    .collect(),
            }) })
            .collect::<Result<Vec<_>>>()?;

        Ok(PartitionSnapshot { score, zones })
    }
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;
    use crate::{DesignError, testing::grid_problem};

    #[test]
    fn summarizes_evaluated_partition() {
        let genotype = vec![Point::new(1.0, 1.9), Point::new(1.0, 0.1)];
        let mut partition = Partition::from_genotype(grid_problem(2), genotype).unwrap();
        partition.compose_partition().unwrap();
        assert!(matches!(
            partition.snapshot().unwrap_err().downcast_ref::<DesignError>(),
            Some(DesignError::NotReady(_))
        ));

        partition.evaluate().unwrap();
        let snapshot = partition.snapshot().unwrap();
        assert_eq!(snapshot.zones.len(), 2);
        assert_eq!(snapshot.zones[0].districts, ["A", "B"]);
        assert_eq!(snapshot.zones[1].districts, ["C", "D"]);
        assert_eq!(snapshot.zones[1].seed, [1.0, 0.1]);
        assert_eq!(snapshot.zones[0].population, 200.0);
        assert_eq!(snapshot.zones[0].cost, 0.5);
        assert_eq!(snapshot.score, partition.score().unwrap());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["zones"][1]["unconnected"], 0);
    }
}
