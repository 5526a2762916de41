use anyhow::Result;

use crate::zone::Zone;

/// Quadratic penalty on a zone's population relative to the mean target.
///
/// `penalty(r) = a·r² + b·r + c` with `penalty(1) = 0` and
/// `penalty(1 ± margin) = 1`, where `r = value / mean_target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deviation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Deviation {
    /// Fit the parabola through `(1 - margin, 1)`, `(1, 0)` and `(1 + margin, 1)`.
    pub fn from_margin(margin: f64) -> Self {
        let a = 1.0 / (margin * margin);
        Self { a, b: -2.0 * a, c: a }
    }

    #[inline]
    pub fn penalty(&self, ratio: f64) -> f64 {
        (self.a * ratio + self.b) * ratio + self.c
    }
}

/// Weights of the per-zone fitness terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fitness {
    pub mean_target: f64,
    pub deviation: Deviation,
    pub cost_weight: f64,
    pub unconnected_weight: f64,
    pub singleton_cost: f64,
}

impl Fitness {
    /// Score contribution of one evaluated zone. Lower is better.
    pub fn zone_score(&self, zone: &Zone) -> Result<f64> {
        let ratio = zone.value() / self.mean_target;
        Ok(self.deviation.penalty(ratio)
            + self.cost_weight * zone.cost()?
            + self.unconnected_weight * zone.unconnected()? as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parabola_hits_its_anchor_points() {
        for margin in [0.05, 0.2, 0.5] {
            let dev = Deviation::from_margin(margin);
            assert!(dev.penalty(1.0).abs() < 1e-9);
            assert!((dev.penalty(1.0 - margin) - 1.0).abs() < 1e-9);
            assert!((dev.penalty(1.0 + margin) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn default_margin_coefficients() {
        let dev = Deviation::from_margin(0.2);
        assert!((dev.a - 25.0).abs() < 1e-9);
        assert!((dev.b + 50.0).abs() < 1e-9);
        assert!((dev.c - 25.0).abs() < 1e-9);
    }

    #[test]
    fn penalty_grows_away_from_target() {
        let dev = Deviation::from_margin(0.2);
        assert!(dev.penalty(0.9) < dev.penalty(0.7));
        assert!(dev.penalty(1.1) < dev.penalty(1.5));
        assert!(dev.penalty(0.0) > 1.0);
    }
}
