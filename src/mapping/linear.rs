//! Linear curve implementation

use super::{Curve, POSITION_MAX};

/// Linear interpolation between slider position and volume
#[derive(Debug, Clone)]
pub struct LinearCurve {
    name: String,
    min: f64,
    max: f64,
}

impl LinearCurve {
    /// Create a new linear curve
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        let (min, max) = if max < min { (max, min) } else { (min, max) };

        Self {
            name: name.into(),
            min,
            max,
        }
    }
}

impl Curve for LinearCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn min(&self) -> f64 {
        self.min
    }

    fn max(&self) -> f64 {
        self.max
    }

    fn to_volume(&self, position: f64) -> f64 {
        let normalized = position.clamp(0.0, POSITION_MAX) / POSITION_MAX;
        let volume = self.min + normalized * (self.max - self.min);

        self.clamp_volume(volume)
    }

    fn to_position(&self, volume: f64) -> f64 {
        let range = self.max - self.min;
        if range < f64::EPSILON {
            return 0.0;
        }

        let normalized = (self.clamp_volume(volume) - self.min) / range;
        (normalized * POSITION_MAX).clamp(0.0, POSITION_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_curve_basic() {
        let curve = LinearCurve::new("test", 0.0, 2.0);

        assert_eq!(curve.to_volume(0.0), 0.0);
        assert_eq!(curve.to_volume(50.0), 1.0);
        assert_eq!(curve.to_volume(100.0), 2.0);
    }

    #[test]
    fn test_linear_curve_inverse() {
        let curve = LinearCurve::new("test", 0.0, 2.0);

        assert_eq!(curve.to_position(0.0), 0.0);
        assert_eq!(curve.to_position(1.0), 50.0);
        assert_eq!(curve.to_position(2.0), 100.0);
    }

    #[test]
    fn test_linear_curve_offset_range() {
        let curve = LinearCurve::new("test", 1.0, 3.0);

        assert_eq!(curve.to_volume(25.0), 1.5);
        assert_eq!(curve.to_position(2.5), 75.0);
    }

    #[test]
    fn test_linear_curve_clamped() {
        let curve = LinearCurve::new("test", 0.0, 2.0);

        // Values outside the domain are clamped
        assert_eq!(curve.to_volume(-50.0), 0.0);
        assert_eq!(curve.to_volume(150.0), 2.0);
        assert_eq!(curve.to_position(5.0), 100.0);
    }

    #[test]
    fn test_linear_curve_empty_range() {
        let curve = LinearCurve::new("test", 1.0, 1.0);

        assert_eq!(curve.to_volume(40.0), 1.0);
        assert_eq!(curve.to_position(1.0), 0.0);
    }
}
