pub const LITERS_PER_GALLON: f64 = 3.785411784;
pub const SQUARE_METERS_PER_SQUARE_FOOT: f64 = 0.09290304;
pub const DEFAULT_PRECISION: u32 = 4;

/// Scale factors applied when a region reports in imperial units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitFactors {
    pub liters_per_gallon: f64,
    pub square_meters_per_square_foot: f64,
    /// Decimal places kept after conversion.
    pub precision: u32,
}

impl Default for UnitFactors {
    fn default() -> Self {
        Self {
            liters_per_gallon: LITERS_PER_GALLON,
            square_meters_per_square_foot: SQUARE_METERS_PER_SQUARE_FOOT,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl UnitFactors {
    pub fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.precision as i32);
        (value * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_configured_precision() {
        let factors = UnitFactors::default();
        assert_eq!(factors.round(100.0 * SQUARE_METERS_PER_SQUARE_FOOT), 9.2903);
        assert_eq!(factors.round(10.0 * LITERS_PER_GALLON), 37.8541);

        let coarse = UnitFactors {
            precision: 1,
            ..UnitFactors::default()
        };
        assert_eq!(coarse.round(37.85411784), 37.9);
    }
}
