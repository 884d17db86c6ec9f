//! Power-law curve implementation
//!
//! Maps a linear slider position onto a volume range using
//! `volume = (position * mult) ^ e + min`, so that perceived loudness
//! changes roughly linearly while the slider moves.
//!
//! Use cases:
//! - Master volume sliders whose range extends well past unity gain
//! - Any control that needs fine resolution near the bottom of its range

use super::{Curve, POSITION_MAX};

/// Power-law curve between a slider position and a volume range
///
/// With `delta = max - min` and exponent `e`:
///
///   forward: mult = delta^(1/e) / 100,  volume   = (position * mult)^e + min
///   inverse: mult = 100 / delta^(1/e),  position = (volume - min)^(1/e) * mult
///
/// An exponent of 1 degenerates to a linear map.
#[derive(Debug, Clone)]
pub struct PowerCurve {
    name: String,
    min: f64,
    max: f64,
    exponent: f64,
}

impl PowerCurve {
    /// Create a new power curve
    ///
    /// Bounds given in the wrong order are swapped, and the exponent is
    /// kept strictly positive.
    pub fn new(name: impl Into<String>, min: f64, max: f64, exponent: f64) -> Self {
        let (min, max) = if max < min { (max, min) } else { (min, max) };

        Self {
            name: name.into(),
            min,
            max,
            exponent: exponent.max(0.001),
        }
    }

    /// Get the curve exponent
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Span of the volume range raised to 1/e
    fn root_delta(&self) -> f64 {
        (self.max - self.min).powf(self.exponent.recip())
    }
}

impl Curve for PowerCurve {
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
        let position = position.clamp(0.0, POSITION_MAX);
        let mult = self.root_delta() / POSITION_MAX;
        let volume = (position * mult).powf(self.exponent) + self.min;

        self.clamp_volume(volume)
    }

    fn to_position(&self, volume: f64) -> f64 {
        let root_delta = self.root_delta();
        if root_delta < f64::EPSILON {
            // Empty range: every volume sits at the bottom of the slider
            return 0.0;
        }

        let offset = self.clamp_volume(volume) - self.min;
        let mult = POSITION_MAX / root_delta;
        let position = offset.powf(self.exponent.recip()) * mult;

        position.clamp(0.0, POSITION_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{quantize, LinearCurve};

    fn cubic() -> PowerCurve {
        PowerCurve::new("cubic", 0.125, 8.0, 3.0)
    }

    #[test]
    fn test_power_curve_endpoints() {
        let curve = cubic();

        assert!((curve.to_volume(0.0) - 0.125).abs() < 1e-9);
        assert!((curve.to_volume(100.0) - 8.0).abs() < 1e-9);
        assert!(curve.to_position(0.125).abs() < 1e-9);
        assert!((curve.to_position(8.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_power_curve_midpoint() {
        // (50 * 7.875^(1/3) / 100)^3 + 0.125 = 7.875 / 8 + 0.125
        let at_50 = cubic().to_volume(50.0);
        assert!((at_50 - 1.109375).abs() < 1e-9, "Expected 1.109375, got {}", at_50);
    }

    #[test]
    fn test_power_curve_shape() {
        // The curve spends most of the slider below the linear midpoint
        let curve = PowerCurve::new("quadratic", 0.0, 5.0, 2.0);
        let at_50 = curve.to_volume(50.0);

        assert!((at_50 - 1.25).abs() < 1e-9, "Expected 1.25, got {}", at_50);
        assert!(at_50 < 2.5);
    }

    #[test]
    fn test_power_curve_round_trip() {
        for curve in [cubic(), PowerCurve::new("quadratic", 0.0, 5.0, 2.0)] {
            for position in 0..=100u8 {
                let volume = curve.to_volume(position as f64);
                let back = quantize(curve.to_position(volume));
                assert_eq!(back, position, "{} at {}", curve.name(), position);
            }
        }
    }

    #[test]
    fn test_power_curve_monotonic() {
        let curves: Vec<Box<dyn Curve>> = vec![
            Box::new(cubic()),
            Box::new(PowerCurve::new("quadratic", 0.0, 5.0, 2.0)),
            Box::new(LinearCurve::new("linear", 0.0, 2.0)),
        ];

        for curve in &curves {
            let mut previous = curve.to_position(curve.min());

            for step in 1..=1000 {
                let volume = curve.min() + (curve.max() - curve.min()) * step as f64 / 1000.0;
                let position = curve.to_position(volume);
                assert!(position >= previous, "{} not monotonic at {}", curve.name(), volume);
                assert!((0.0..=100.0).contains(&position));
                previous = position;
            }
        }
    }

    #[test]
    fn test_power_curve_linear_exponent() {
        let curve = PowerCurve::new("linear", 0.0, 2.0, 1.0);

        assert!((curve.to_volume(50.0) - 1.0).abs() < 1e-9);
        assert!((curve.to_position(1.5) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_power_curve_out_of_domain() {
        let curve = cubic();

        assert_eq!(curve.to_volume(-10.0), 0.125);
        assert!((curve.to_volume(250.0) - 8.0).abs() < 1e-9);
        assert_eq!(curve.to_position(0.0), 0.0);
        assert!((curve.to_position(20.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_power_curve_empty_range() {
        let curve = PowerCurve::new("empty", 1.0, 1.0, 3.0);

        assert_eq!(curve.to_volume(50.0), 1.0);
        assert_eq!(curve.to_position(1.0), 0.0);
    }

    #[test]
    fn test_power_curve_swapped_bounds() {
        let curve = PowerCurve::new("swapped", 8.0, 0.125, 3.0);

        assert_eq!(curve.min(), 0.125);
        assert_eq!(curve.max(), 8.0);
    }
}
