//! Curve trait shared by the slider mappings

/// Bidirectional mapping between a slider position and a volume
///
/// Positions live in `0.0..=100.0`; volumes live in `min()..=max()`.
pub trait Curve: Send + Sync {
    /// Get the name of this curve
    fn name(&self) -> &str;

    /// Lower volume bound (position 0)
    fn min(&self) -> f64;

    /// Upper volume bound (position 100)
    fn max(&self) -> f64;

    /// Map a slider position to a volume
    fn to_volume(&self, position: f64) -> f64;

    /// Map a volume back to a slider position
    fn to_position(&self, volume: f64) -> f64;

    /// Clamp a volume into this curve's range
    fn clamp_volume(&self, volume: f64) -> f64 {
        volume.max(self.min()).min(self.max())
    }

    /// Check whether a volume lies inside this curve's range
    fn contains(&self, volume: f64) -> bool {
        volume >= self.min() && volume <= self.max()
    }
}
