//! Slider curves
//!
//! Maps the linear 0..=100 slider position onto a volume range and back.

mod linear;
mod mapper;
mod power;
mod quantize;

pub use linear::LinearCurve;
pub use mapper::Curve;
pub use power::PowerCurve;
pub use quantize::{clamp_step, quantize, POSITION_MAX, STEP_MAX};
