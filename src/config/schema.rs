//! Configuration schema definitions

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::mapping::{Curve, LinearCurve, PowerCurve};

/// Default location of the persisted volume record
pub const DEFAULT_STORE_PATH: &str = "/config/MasterVolume/config.bin";

/// Main configuration for the master volume panel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterVolumeConfig {
    /// Slider curve and volume range
    #[serde(default)]
    pub curve: CurveConfig,

    /// Persistence of the last volume
    #[serde(default)]
    pub storage: StorageConfig,

    /// Output target switching
    #[serde(default)]
    pub output: OutputConfig,
}

impl MasterVolumeConfig {
    /// Build the settings of one of the released panel revisions
    pub fn preset(preset: Preset) -> Self {
        let (kind, min, max, exponent, persist) = match preset {
            Preset::Linear => (CurveKind::Linear, 0.0, 2.0, 1.0, false),
            Preset::Quadratic => (CurveKind::Power, 0.0, 5.0, 2.0, false),
            Preset::Cubic => (CurveKind::Power, 0.125, 8.0, 3.0, true),
        };

        Self {
            curve: CurveConfig {
                kind,
                min,
                max,
                exponent,
                default: default_volume(),
            },
            storage: StorageConfig {
                enabled: persist,
                path: default_store_path(),
            },
            output: OutputConfig {
                force_speaker: persist,
                ..OutputConfig::default()
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let curve = &self.curve;

        if !curve.min.is_finite() || !curve.max.is_finite() {
            bail!("Volume bounds must be finite numbers");
        }
        if curve.min < 0.0 {
            bail!("Minimum volume must not be negative");
        }
        if curve.max <= curve.min {
            bail!("Maximum volume must be greater than the minimum ({})", curve.min);
        }
        if !curve.exponent.is_finite() || curve.exponent <= 0.0 {
            bail!("Curve exponent must be a positive number");
        }
        if !curve.default.is_finite() || curve.default < curve.min || curve.default > curve.max {
            bail!(
                "Default volume {} must lie between {} and {}",
                curve.default,
                curve.min,
                curve.max
            );
        }
        if self.storage.enabled && self.storage.path.as_os_str().is_empty() {
            bail!("Storage path must not be empty when persistence is enabled");
        }

        Ok(())
    }
}

/// Released panel revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Linear slider over 0..2
    Linear,
    /// Squared slider over 0..5
    Quadratic,
    /// Cubed slider over 0.125..8 with persistence and speaker switch
    Cubic,
}

/// Slider curve configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Curve type
    #[serde(default)]
    pub kind: CurveKind,

    /// Volume at slider position 0 (default: 0.125)
    #[serde(default = "default_min")]
    pub min: f64,

    /// Volume at slider position 100 (default: 8.0)
    #[serde(default = "default_max")]
    pub max: f64,

    /// Curve steepness for power curves (default: 3)
    #[serde(default = "default_exponent")]
    pub exponent: f64,

    /// Volume restored by the reset button (default: 1.0)
    #[serde(default = "default_volume")]
    pub default: f64,
}

impl CurveConfig {
    /// Build the configured curve
    pub fn build(&self) -> Box<dyn Curve> {
        match self.kind {
            CurveKind::Linear => Box::new(LinearCurve::new("linear", self.min, self.max)),
            CurveKind::Power => Box::new(PowerCurve::new("power", self.min, self.max, self.exponent)),
        }
    }
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            kind: CurveKind::default(),
            min: default_min(),
            max: default_max(),
            exponent: default_exponent(),
            default: default_volume(),
        }
    }
}

fn default_min() -> f64 { 0.125 }
fn default_max() -> f64 { 8.0 }
fn default_exponent() -> f64 { 3.0 }
fn default_volume() -> f64 { 1.0 }

/// Types of slider curves
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Straight interpolation
    Linear,
    /// Power law (default)
    #[default]
    Power,
}

/// Volume persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Whether the last volume is saved when the panel closes
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Path of the 4-byte volume record
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_store_path(),
        }
    }
}

fn default_enabled() -> bool { true }
fn default_store_path() -> PathBuf { PathBuf::from(DEFAULT_STORE_PATH) }

/// Output target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Show the button that forces output to the speakers
    #[serde(default = "default_enabled")]
    pub force_speaker: bool,

    /// Fade-out time handed to the audio service, in nanoseconds
    #[serde(default = "default_fade_ns")]
    pub fade_out_ns: u64,

    /// Fade-in time handed to the audio service, in nanoseconds
    #[serde(default = "default_fade_ns")]
    pub fade_in_ns: u64,
}

impl OutputConfig {
    pub fn fade_out(&self) -> Duration {
        Duration::from_nanos(self.fade_out_ns)
    }

    pub fn fade_in(&self) -> Duration {
        Duration::from_nanos(self.fade_in_ns)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            force_speaker: default_enabled(),
            fade_out_ns: default_fade_ns(),
            fade_in_ns: default_fade_ns(),
        }
    }
}

fn default_fade_ns() -> u64 { 10_000_000 }
