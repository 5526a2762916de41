//! Small in-code fixtures shared by unit tests.

use std::sync::Arc;

use geo::{Coord, Rect};

use crate::{
    config::DesignerConfig,
    map::{SeedRegion, UnitRecord, UnitTable},
    partition::ZoningProblem,
};

/// 2x2 grid, A B / C D, unit squares, orthogonal neighbours at cost 0.5.
pub(crate) fn grid_records() -> Vec<UnitRecord> {
    vec![
        UnitRecord::new("A", 100.0, (0.5, 1.5), [("B", 0.5), ("C", 0.5)]),
        UnitRecord::new("B", 100.0, (1.5, 1.5), [("A", 0.5), ("D", 0.5)]),
        UnitRecord::new("C", 100.0, (0.5, 0.5), [("A", 0.5), ("D", 0.5)]),
        UnitRecord::new("D", 100.0, (1.5, 0.5), [("B", 0.5), ("C", 0.5)]),
    ]
}

/// A `cols` x `rows` grid of unit squares with rook adjacency at cost 0.5.
pub(crate) fn lattice_records(cols: usize, rows: usize, population: f64) -> Vec<UnitRecord> {
    let code = |c: usize, r: usize| format!("{c}-{r}");
    let mut records = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            let mut neighbors = Vec::new();
            if c > 0 { neighbors.push(code(c - 1, r)) }
            if c + 1 < cols { neighbors.push(code(c + 1, r)) }
            if r > 0 { neighbors.push(code(c, r - 1)) }
            if r + 1 < rows { neighbors.push(code(c, r + 1)) }
            records.push(UnitRecord::new(
                code(c, r),
                population,
                (c as f64 + 0.5, r as f64 + 0.5),
                neighbors.iter().map(|n| (n.as_str(), 0.5)),
            ));
        }
    }
    records
}

pub(crate) fn rect_region(width: f64, height: f64) -> SeedRegion {
    SeedRegion::from_rect(Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: width, y: height }))
        .expect("fixture region is valid")
}

pub(crate) fn problem(records: Vec<UnitRecord>, region: SeedRegion, num_zones: usize) -> Arc<ZoningProblem> {
    let table = UnitTable::new(records).expect("fixture records are valid");
    let config = DesignerConfig { num_zones, ..Default::default() };
    Arc::new(ZoningProblem::new(table, region, &config).expect("fixture problem is valid"))
}

pub(crate) fn grid_problem(num_zones: usize) -> Arc<ZoningProblem> {
    problem(grid_records(), rect_region(2.0, 2.0), num_zones)
}
