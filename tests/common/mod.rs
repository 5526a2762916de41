// Shared fixtures for the integration tests.
#![allow(dead_code)]

use zonedesign::{
    DesignerConfig, UnitRecord,
    geo::{Coord, MultiPolygon, Rect},
};

/// `cols` x `rows` unit squares with rook adjacency at cost 0.5.
pub fn lattice(cols: usize, rows: usize, population: impl Fn(usize, usize) -> f64) -> Vec<UnitRecord> {
    let code = |c: usize, r: usize| format!("{c:02}{r:02}");
    let mut records = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let mut neighbors = Vec::new();
            if c > 0 { neighbors.push(code(c - 1, r)) }
            if c + 1 < cols { neighbors.push(code(c + 1, r)) }
            if r > 0 { neighbors.push(code(c, r - 1)) }
            if r + 1 < rows { neighbors.push(code(c, r + 1)) }
            records.push(UnitRecord::new(
                code(c, r),
                population(c, r),
                (c as f64 + 0.5, r as f64 + 0.5),
                neighbors.iter().map(|n| (n.as_str(), 0.5)),
            ));
        }
    }
    records
}

pub fn rect(width: f64, height: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: width, y: height }).to_polygon()])
}

pub fn config(num_zones: usize, seed: u64) -> DesignerConfig {
    DesignerConfig {
        num_zones,
        population_cardinality: 20,
        max_iterations: 40,
        no_improvement_iterations: 40,
        seed: Some(seed),
        ..Default::default()
    }
}
