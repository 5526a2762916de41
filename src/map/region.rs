use anyhow::Result;
use geo::{Area, BoundingRect, Contains, LineString, MultiPolygon, Point, Rect};
use rand::Rng;

use crate::error::invalid_input;

/// The area where zone seeds may be placed: the union of all district footprints.
#[derive(Clone, Debug)]
pub struct SeedRegion {
    shape: MultiPolygon<f64>,
    bounds: Rect<f64>,
}

impl SeedRegion {
    /// Validate a region geometry and cache its bounding box.
    ///
    /// The geometry must have at least one polygon, every ring must be closed
    /// with at least four finite coordinates, and the total area must be positive.
    pub fn new(shape: MultiPolygon<f64>) -> Result<Self> {
        if shape.0.is_empty() { invalid_input!("seed region has no polygons") }

        fn check_ring(ring: &LineString<f64>, which: &str, polygon: usize) -> Result<()> {
            if ring.0.len() < 4 {
                invalid_input!("seed region polygon {polygon}: {which} ring has {} coordinates, expected at least 4", ring.0.len())
            }
            if !ring.is_closed() { invalid_input!("seed region polygon {polygon}: {which} ring is not closed") }
            if ring.coords().any(|c| !(c.x.is_finite() && c.y.is_finite())) {
                invalid_input!("seed region polygon {polygon}: {which} ring has a non-finite coordinate")
            }
            Ok(())
        }

        for (i, polygon) in shape.0.iter().enumerate() {
            check_ring(polygon.exterior(), "exterior", i)?;
            for hole in polygon.interiors() { check_ring(hole, "interior", i)? }
        }

        let area = shape.unsigned_area();
        if !(area.is_finite() && area > 0.0) { invalid_input!("seed region has zero area") }

        let Some(bounds) = shape.bounding_rect() else { invalid_input!("seed region has no bounding box") };

        Ok(Self { shape, bounds })
    }

    /// Build a rectangular region; handy for synthetic inputs.
    pub fn from_rect(rect: Rect<f64>) -> Result<Self> {
        Self::new(MultiPolygon(vec![rect.to_polygon()]))
    }

    /// Get the region geometry.
    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.shape }

    /// Get the bounding rectangle of the region.
    #[inline] pub fn bounds(&self) -> Rect<f64> { self.bounds }

    /// Check whether a point lies strictly inside the region.
    #[inline] pub fn contains(&self, point: &Point<f64>) -> bool { self.shape.contains(point) }

    /// Draw a uniformly random point from the bounding rectangle (may fall outside the region).
    pub(crate) fn sample_in_bounds<R: Rng + ?Sized>(&self, rng: &mut R) -> Point<f64> {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        Point::new(rng.random_range(min.x..=max.x), rng.random_range(min.y..=max.y))
    }
}
