//! The master volume value edited by the panel

use crate::config::CurveConfig;
use crate::mapping::{clamp_step, quantize, Curve};

/// Current master volume together with its curve and reset target
///
/// The value always lies inside the curve's range.
pub struct VolumeSetting {
    curve: Box<dyn Curve>,
    default: f32,
    value: f32,
}

impl VolumeSetting {
    /// Create a setting, clamping `initial` into the curve's range
    pub fn new(curve: Box<dyn Curve>, default: f32, initial: f32) -> Self {
        debug_assert!(
            curve.contains(default as f64),
            "default volume {} outside {}..={}",
            default,
            curve.min(),
            curve.max()
        );

        let mut setting = Self {
            default: 0.0,
            value: 0.0,
            curve,
        };
        setting.default = setting.clamp(default);
        setting.value = setting.clamp(initial);
        setting
    }

    /// Create a setting from the curve configuration
    pub fn from_config(config: &CurveConfig, initial: f32) -> Self {
        Self::new(config.build(), config.default as f32, initial)
    }

    /// Get the current volume
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Get the reset target
    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Get the curve
    pub fn curve(&self) -> &dyn Curve {
        self.curve.as_ref()
    }

    /// Get the slider step matching the current volume
    pub fn position(&self) -> u8 {
        quantize(self.curve.to_position(self.value as f64))
    }

    /// Move to a slider step and return the new volume
    pub fn set_position(&mut self, step: u8) -> f32 {
        let step = clamp_step(step);
        self.value = self.clamp(self.curve.to_volume(step as f64) as f32);
        self.value
    }

    /// Set the volume directly, clamped into range
    pub fn set_value(&mut self, value: f32) -> f32 {
        self.value = self.clamp(value);
        self.value
    }

    /// Restore the default volume
    pub fn reset(&mut self) -> f32 {
        self.value = self.default;
        self.value
    }

    /// Check whether a volume lies inside the configured range
    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min() && value <= self.max()
    }

    fn min(&self) -> f32 {
        self.curve.min() as f32
    }

    fn max(&self) -> f32 {
        self.curve.max() as f32
    }

    fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.max(self.min()).min(self.max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MasterVolumeConfig, Preset};

    fn cubic(initial: f32) -> VolumeSetting {
        VolumeSetting::from_config(&MasterVolumeConfig::preset(Preset::Cubic).curve, initial)
    }

    #[test]
    fn test_setting_clamps_initial() {
        assert_eq!(cubic(0.0).value(), 0.125);
        assert_eq!(cubic(12.0).value(), 8.0);
        assert_eq!(cubic(2.0).value(), 2.0);
        assert_eq!(cubic(f32::NAN).value(), 1.0);
    }

    #[test]
    fn test_setting_positions() {
        let mut setting = cubic(1.0);

        assert_eq!(setting.set_position(0), 0.125);
        assert_eq!(setting.position(), 0);

        assert_eq!(setting.set_position(100), 8.0);
        assert_eq!(setting.position(), 100);

        let at_50 = setting.set_position(50);
        assert!((at_50 - 1.109375).abs() < 1e-6);
        assert_eq!(setting.position(), 50);
    }

    #[test]
    fn test_setting_clamps_step() {
        let mut setting = cubic(1.0);

        assert_eq!(setting.set_position(255), 8.0);
        assert_eq!(setting.position(), 100);
    }

    #[test]
    fn test_setting_stays_in_range() {
        let mut setting = cubic(1.0);

        for step in 0..=u8::MAX {
            let value = setting.set_position(step);
            assert!(setting.contains(value), "step {} gave {}", step, value);
        }
    }

    #[test]
    fn test_setting_reset() {
        let mut setting = cubic(5.0);

        assert_eq!(setting.reset(), 1.0);
        assert_eq!(setting.value(), setting.default_value());
    }

    #[test]
    fn test_setting_set_value() {
        let mut setting = cubic(1.0);

        assert_eq!(setting.set_value(-1.0), 0.125);
        assert_eq!(setting.set_value(3.0), 3.0);
    }

    #[test]
    fn test_setting_round_trip_is_exact() {
        for preset in [Preset::Linear, Preset::Quadratic, Preset::Cubic] {
            let config = MasterVolumeConfig::preset(preset);
            let mut setting = VolumeSetting::from_config(&config.curve, 1.0);

            for step in 0..=100u8 {
                let value = setting.set_position(step);
                assert_eq!(setting.position(), step, "{:?} step {}", preset, step);

                // Reopened from the stored value
                let reopened = VolumeSetting::from_config(&config.curve, value);
                assert_eq!(reopened.position(), step, "{:?} reopened at step {}", preset, step);
            }
        }
    }
}
