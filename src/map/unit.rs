use std::sync::Arc;

use geo::Point;
use serde::{Deserialize, Serialize};

/// One adjacency entry of a district record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub code: String,
    /// Connection cost in `[0, 1]`; lower means a longer shared border.
    pub cost: f64,
}

/// A district as delivered by the data preparation step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub code: String,
    pub population: f64,
    pub centroid: [f64; 2],
    #[serde(default)]
    pub neighbors: Vec<Neighbor>,
}

impl UnitRecord {
    pub fn new<'a>(
        code: impl Into<String>,
        population: f64,
        centroid: (f64, f64),
        neighbors: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Self {
        Self {
            code: code.into(),
            population,
            centroid: [centroid.0, centroid.1],
            neighbors: neighbors.into_iter()
                .map(|(code, cost)| Neighbor { code: code.to_string(), cost })
                .collect(),
        }
    }
}

/// An immutable district inside a `UnitTable`. Adjacency lives in the table's graph.
#[derive(Clone, Debug)]
pub struct SpatialUnit {
    pub(crate) code: Arc<str>,
    pub(crate) population: f64,
    pub(crate) centroid: Point<f64>,
}

impl SpatialUnit {
    #[inline] pub fn code(&self) -> &str { &self.code }

    #[inline] pub fn population(&self) -> f64 { self.population }

    #[inline] pub fn centroid(&self) -> Point<f64> { self.centroid }
}
