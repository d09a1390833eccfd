use serde::{Deserialize, Serialize};

/// Unit context for a routing call: how many micrometers one grid unit
/// spans. Passed explicitly into the float entry points instead of living
/// in ambient global state, so routing stays reentrant and testable in
/// isolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Micrometers per grid unit.
    pub dbu: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Grid { dbu: 0.001 }
    }
}

impl Grid {
    pub fn new(dbu: f64) -> Grid {
        Grid { dbu }
    }

    /// Converts a micrometer quantity to grid units, rounding to the
    /// nearest unit.
    pub fn to_units(&self, um: f64) -> i64 {
        (um / self.dbu).round() as i64
    }

    pub fn to_um(&self, units: i64) -> f64 {
        units as f64 * self.dbu
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_micrometers_to_units() {
        let grid = Grid::default();
        assert_eq!(grid.to_units(5.0), 5000);
        assert_eq!(grid.to_units(0.0005), 1);
    }

    #[test]
    fn roundtrips_units() {
        let grid = Grid::new(0.005);
        assert_eq!(grid.to_units(grid.to_um(1234)), 1234);
    }
}
