use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use anyhow::Result;
use geo::Point;

use crate::{
    error::invalid_input,
    graph::Graph,
    map::{SpatialUnit, UnitRecord},
};

/// The immutable per-run table of districts and their adjacency graph.
///
/// Codes are interned to contiguous `u32` indices in input order; the graph,
/// zones and partitions all refer to districts by that index.
#[derive(Clone, Debug)]
pub struct UnitTable {
    units: Vec<SpatialUnit>,
    index: AHashMap<Arc<str>, u32>,
    graph: Graph,
    total_population: f64,
}

impl UnitTable {
    /// Validate district records and build the table.
    ///
    /// Rejects empty input, duplicate codes, negative or non-finite
    /// populations, non-finite centroids, self references, unknown or repeated
    /// neighbour codes and costs outside `[0, 1]`. Neighbour lists are stored sorted
    /// ascending by cost.
    pub fn new(records: Vec<UnitRecord>) -> Result<Self> {
        if records.is_empty() { invalid_input!("district table is empty") }

        let mut index = AHashMap::with_capacity(records.len());
        let mut units = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if record.code.is_empty() { invalid_input!("district at row {i} has an empty code") }
            if !(record.population.is_finite() && record.population >= 0.0) {
                invalid_input!("district '{}' has invalid population {}", record.code, record.population)
            }
            let [x, y] = record.centroid;
            if !(x.is_finite() && y.is_finite()) {
                invalid_input!("district '{}' has a non-finite centroid", record.code)
            }

            let code: Arc<str> = Arc::from(record.code.as_str());
            if index.insert(code.clone(), i as u32).is_some() {
                invalid_input!("district code '{}' appears more than once", record.code)
            }
            units.push(SpatialUnit { code, population: record.population, centroid: Point::new(x, y) });
        }

        let mut edges = Vec::with_capacity(records.len());
        let mut edge_weights = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let mut neighbors = Vec::with_capacity(record.neighbors.len());
            let mut listed = AHashSet::with_capacity(record.neighbors.len());
            for neighbor in &record.neighbors {
                let Some(&j) = index.get(neighbor.code.as_str()) else {
                    invalid_input!("district '{}' lists unknown neighbour '{}'", record.code, neighbor.code)
                };
                if j as usize == i { invalid_input!("district '{}' lists itself as a neighbour", record.code) }
                if !listed.insert(j) {
                    invalid_input!("district '{}' lists neighbour '{}' more than once", record.code, neighbor.code)
                }
                if !(0.0..=1.0).contains(&neighbor.cost) {
                    invalid_input!("neighbour cost {} -> {} is {}, expected a value in [0, 1]",
                        record.code, neighbor.code, neighbor.cost)
                }
                neighbors.push((j, neighbor.cost));
            }
            neighbors.sort_by(|a, b| a.1.total_cmp(&b.1));

            let (targets, costs): (Vec<u32>, Vec<f64>) = neighbors.into_iter().unzip();
            edges.push(targets);
            edge_weights.push(costs);
        }

        let total_population = units.iter().map(|unit| unit.population).sum();
        let graph = Graph::new(units.len(), &edges, &edge_weights);
        debug_assert_eq!(graph.node_count(), units.len());

        Ok(Self {
            graph,
            units,
            index,
            total_population,
        })
    }

    /// Get the number of districts.
    #[inline] pub fn len(&self) -> usize { self.units.len() }

    /// Check if the table has no districts (never true for a constructed table).
    #[inline] pub fn is_empty(&self) -> bool { self.units.is_empty() }

    /// Get a district by index.
    #[inline] pub fn unit(&self, idx: usize) -> &SpatialUnit { &self.units[idx] }

    /// Get all districts in index order.
    #[inline] pub fn units(&self) -> &[SpatialUnit] { &self.units }

    /// Look up a district index by code.
    #[inline]
    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.index.get(code).map(|&i| i as usize)
    }

    /// Sum of all district populations.
    #[inline] pub fn total_population(&self) -> f64 { self.total_population }

    /// Get the adjacency graph.
    #[inline] pub(crate) fn graph(&self) -> &Graph { &self.graph }

    /// Number of directed neighbour entries over all districts.
    #[inline] pub fn link_count(&self) -> usize { self.graph.edge_count() }

    /// Number of neighbours listed by a district.
    #[inline] pub fn degree(&self, idx: usize) -> usize { self.graph.degree(idx) }

    /// Count neighbour entries `u -> v` without a matching `v -> u` entry of equal cost.
    pub fn asymmetric_links(&self) -> usize {
        (0..self.len())
            .flat_map(|u| self.graph.edges_with_weights(u).map(move |(v, cost)| (u, v, cost)))
            .filter(|&(u, v, cost)| self.graph.edge_weight(v, u) != Some(cost))
            .count()
    }

    /// Neighbours of a district with their costs, ascending by cost.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.graph.edges_with_weights(idx).map(|(j, cost)| (self.units[j].code(), cost))
    }
}
