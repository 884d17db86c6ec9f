//! Slider quantization
//!
//! The slider reports 8-bit positions in `0..=100`. Curve positions are
//! truncated to that grid, which gives the slider its 101 discrete steps.

/// Highest slider position
pub const POSITION_MAX: f64 = 100.0;

/// Highest slider step
pub const STEP_MAX: u8 = 100;

/// Absorbs float error so an exact step is not truncated to the one below
///
/// Sized for volumes stored as `f32`: near the bottom of the cubic range a
/// single `f32` rounding moves the position by up to about 3.2e-4 steps.
const TRUNCATE_EPSILON: f64 = 5e-4;

/// Truncate a curve position to a slider step
///
/// NaN maps to 0; anything past the ends is clamped.
pub fn quantize(position: f64) -> u8 {
    if position.is_nan() {
        return 0;
    }

    (position + TRUNCATE_EPSILON).clamp(0.0, POSITION_MAX) as u8
}

/// Clamp a raw 8-bit slider value to a valid step
pub fn clamp_step(step: u8) -> u8 {
    step.min(STEP_MAX)
}
