mod region;
mod table;
mod unit;

pub use region::SeedRegion;
pub use table::UnitTable;
pub use unit::{Neighbor, SpatialUnit, UnitRecord};
