use ahash::AHashMap;
use anyhow::Result;
use geo::Point;

use crate::{
    error::{DesignError, invalid_state},
    map::UnitTable,
};

/// Connectivity cost of a zone whose districts share no in-zone border.
pub const MAX_CONNECTIVITY_COST: f64 = 1.0;

/// One district assigned to a zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistrictEntry {
    /// Index of the district in the `UnitTable`.
    pub unit: u32,
    pub population: f64,
    /// Euclidean distance from the district centroid to the zone seed.
    pub distance: f64,
}

/// The districts captured by one genotype seed.
///
/// Built empty during decode, filled by `add_district`, then finalized once by
/// `calc_cost`. After that the zone is read-only.
#[derive(Clone, Debug)]
pub struct Zone {
    seed: Point<f64>,
    districts: Vec<DistrictEntry>,
    position: AHashMap<u32, u32>, // unit -> index into `districts`
    value: f64,
    cost: Option<f64>,
    unconnected: Option<usize>,
}

impl Zone {
    /// Create an empty zone around a seed point.
    pub fn new(seed: Point<f64>) -> Self {
        Self {
            seed,
            districts: Vec::new(),
            position: AHashMap::new(),
            value: 0.0,
            cost: None,
            unconnected: None,
        }
    }

    #[inline] pub fn seed(&self) -> Point<f64> { self.seed }

    /// Total population of the zone.
    #[inline] pub fn value(&self) -> f64 { self.value }

    #[inline] pub fn district_count(&self) -> usize { self.districts.len() }

    #[inline] pub fn districts(&self) -> &[DistrictEntry] { &self.districts }

    #[inline] pub fn contains(&self, unit: usize) -> bool { self.position.contains_key(&(unit as u32)) }

    #[inline] pub fn is_evaluated(&self) -> bool { self.cost.is_some() }

    /// Mean in-zone adjacency cost; available after `calc_cost`.
    pub fn cost(&self) -> Result<f64> {
        Ok(self.cost.ok_or(DesignError::NotReady("zone connectivity cost"))?)
    }

    /// Connected components beyond the first; available after `calc_cost`.
    pub fn unconnected(&self) -> Result<usize> {
        Ok(self.unconnected.ok_or(DesignError::NotReady("zone unconnected parts"))?)
    }

    /// Append a district to the zone.
    pub fn add_district(&mut self, unit: usize, population: f64, distance: f64) -> Result<()> {
        if self.is_evaluated() { invalid_state!("cannot add district {unit} to an evaluated zone") }
        if self.contains(unit) { invalid_state!("district {unit} is already in this zone") }

        self.position.insert(unit as u32, self.districts.len() as u32);
        self.districts.push(DistrictEntry { unit: unit as u32, population, distance });
        self.value += population;
        Ok(())
    }

    /// Compute the connectivity cost and the number of unconnected parts.
    ///
    /// Zones with at most one district get `singleton_cost` and no unconnected
    /// parts. Otherwise the cost is the mean neighbour cost over all in-zone
    /// adjacent pairs, or `MAX_CONNECTIVITY_COST` if there are none.
    pub fn calc_cost(&mut self, table: &UnitTable, singleton_cost: f64) {
        if self.districts.len() <= 1 {
            self.cost = Some(singleton_cost);
            self.unconnected = Some(0);
            return;
        }

        let graph = table.graph();
        let (total_cost, pairs) = self.districts.iter()
            .flat_map(|entry| graph.edges_with_weights(entry.unit as usize))
            .filter(|&(v, _)| self.contains(v))
            .fold((0.0, 0usize), |(sum, n), (_, cost)| (sum + cost, n + 1));

        self.cost = Some(if pairs > 0 { total_cost / pairs as f64 } else { MAX_CONNECTIVITY_COST });
        self.unconnected = Some(self.count_components(table) - 1);
    }

    /// Count connected components of the in-zone adjacency subgraph.
    /// Traversal starts from districts in insertion order and uses an explicit stack.
    fn count_components(&self, table: &UnitTable) -> usize {
        let graph = table.graph();
        let mut visited = vec![false; self.districts.len()];
        let mut stack = Vec::new();
        let mut components = 0;

        for start in 0..self.districts.len() {
            if visited[start] { continue }
            components += 1;
            visited[start] = true;
            stack.push(start);

            while let Some(i) = stack.pop() {
                for v in graph.edges(self.districts[i].unit as usize) {
                    if let Some(&j) = self.position.get(&(v as u32)) {
                        if !visited[j as usize] {
                            visited[j as usize] = true;
                            stack.push(j as usize);
                        }
                    }
                }
            }
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::UnitRecord;

    /// 2x2 grid, A B / C D, orthogonal neighbours only, cost 0.5 each.
    fn grid() -> UnitTable {
        UnitTable::new(vec![
            UnitRecord::new("A", 100.0, (0.0, 1.0), [("B", 0.5), ("C", 0.5)]),
            UnitRecord::new("B", 100.0, (1.0, 1.0), [("A", 0.5), ("D", 0.5)]),
            UnitRecord::new("C", 100.0, (0.0, 0.0), [("A", 0.5), ("D", 0.5)]),
            UnitRecord::new("D", 100.0, (1.0, 0.0), [("B", 0.5), ("C", 0.5)]),
        ]).unwrap()
    }

    fn zone_of(table: &UnitTable, codes: &[&str]) -> Zone {
        let mut zone = Zone::new(Point::new(0.0, 0.0));
        for code in codes {
            let i = table.index_of(code).unwrap();
            zone.add_district(i, table.unit(i).population(), 0.0).unwrap();
        }
        zone
    }

    #[test]
    fn accumulates_population() {
        let table = grid();
        let zone = zone_of(&table, &["A", "B", "D"]);
        assert_eq!(zone.value(), 300.0);
        assert_eq!(zone.district_count(), 3);
        assert!(zone.contains(3));
        assert!(!zone.contains(2));
    }

    #[test]
    fn adjacent_pair_has_mean_cost() {
        let table = grid();
        for pair in [["A", "B"], ["C", "D"]] {
            let mut zone = zone_of(&table, &pair);
            zone.calc_cost(&table, 0.8);
            assert_eq!(zone.cost().unwrap(), 0.5);
            assert_eq!(zone.unconnected().unwrap(), 0);
        }
    }

    #[test]
    fn non_adjacent_pair_gets_max_cost() {
        let table = grid();
        for pair in [["A", "D"], ["B", "C"]] {
            let mut zone = zone_of(&table, &pair);
            zone.calc_cost(&table, 0.8);
            assert_eq!(zone.cost().unwrap(), MAX_CONNECTIVITY_COST);
            assert_eq!(zone.unconnected().unwrap(), 1);
        }
    }

    #[test]
    fn singleton_and_empty_zones_use_fixed_cost() {
        let table = grid();

        let mut single = zone_of(&table, &["C"]);
        single.calc_cost(&table, 0.8);
        assert_eq!(single.cost().unwrap(), 0.8);
        assert_eq!(single.unconnected().unwrap(), 0);

        let mut empty = zone_of(&table, &[]);
        empty.calc_cost(&table, 0.8);
        assert_eq!(empty.cost().unwrap(), 0.8);
        assert_eq!(empty.unconnected().unwrap(), 0);
        assert_eq!(empty.value(), 0.0);
    }

    #[test]
    fn whole_grid_is_one_component() {
        let table = grid();
        let mut zone = zone_of(&table, &["D", "A", "C", "B"]);
        zone.calc_cost(&table, 0.8);
        assert_eq!(zone.cost().unwrap(), 0.5);
        assert_eq!(zone.unconnected().unwrap(), 0);
    }

    #[test]
    fn mixed_costs_are_averaged_over_in_zone_pairs() {
        let table = UnitTable::new(vec![
            UnitRecord::new("A", 1.0, (0.0, 0.0), [("B", 0.2), ("C", 0.6)]),
            UnitRecord::new("B", 1.0, (1.0, 0.0), [("A", 0.2)]),
            UnitRecord::new("C", 1.0, (2.0, 0.0), [("A", 0.6)]),
            UnitRecord::new("D", 1.0, (9.0, 9.0), []),
        ]).unwrap();

        // A-B twice (0.2), A-C twice (0.6): mean 0.4; D is isolated.
        let mut zone = zone_of(&table, &["A", "B", "C", "D"]);
        zone.calc_cost(&table, 0.8);
        assert!((zone.cost().unwrap() - 0.4).abs() < 1e-12);
        assert_eq!(zone.unconnected().unwrap(), 1);
    }

    #[test]
    fn calc_cost_is_idempotent() {
        let table = grid();
        let mut zone = zone_of(&table, &["A", "D", "B"]);
        zone.calc_cost(&table, 0.8);
        let first = (zone.cost().unwrap(), zone.unconnected().unwrap());
        zone.calc_cost(&table, 0.8);
        assert_eq!((zone.cost().unwrap(), zone.unconnected().unwrap()), first);
    }

    #[test]
    fn reading_before_calc_cost_is_not_ready() {
        let table = grid();
        let zone = zone_of(&table, &["A", "B"]);
        assert_eq!(
            zone.cost().unwrap_err().downcast_ref::<DesignError>(),
            Some(&DesignError::NotReady("zone connectivity cost"))
        );
        assert!(matches!(
            zone.unconnected().unwrap_err().downcast_ref::<DesignError>(),
            Some(DesignError::NotReady(_))
        ));
    }

    #[test]
    fn duplicate_or_late_add_is_invalid_state() {
        let table = grid();
        let mut zone = zone_of(&table, &["A"]);
        let err = zone.add_district(0, 100.0, 0.0).unwrap_err();
        assert!(matches!(err.downcast_ref::<DesignError>(), Some(DesignError::InvalidState(_))));

        zone.calc_cost(&table, 0.8);
        let err = zone.add_district(1, 100.0, 0.0).unwrap_err();
        assert!(matches!(err.downcast_ref::<DesignError>(), Some(DesignError::InvalidState(_))));
    }
}
