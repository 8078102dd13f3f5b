use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::AmideError;

/// Linearly spaced angle sweep in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AngleRange {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CutoffConfig {
    pub enabled: bool,
    /// Distance in Å beyond which the dipole coupling is zeroed.
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpectrumRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

/// Free parameters of one SFG run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SfgConfig {
    pub pdb_file: String,
    /// Uniform site frequency in cm⁻¹.
    pub center_freq: f64,
    /// Number of coupled amide units taken from the structure.
    pub site_count: usize,
    /// Replication count of the whole site set.
    pub layers: usize,

    pub tilt: AngleRange,
    pub twist: AngleRange,

    pub coupling_cutoff: CutoffConfig,
    /// Lorentzian half width in cm⁻¹.
    pub width: f64,
    pub spectrum: SpectrumRange,

    pub rotation_database: String,
    pub spectra_folder: String,
    pub spectra_prefix: String,

    #[serde(default)]
    pub dump_chi_tensors: bool,
}

impl SfgConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AmideError> {
        let file = File::open(path)?;

        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Rejects out-of-range parameters before any sweep work starts.
    pub fn validate(&self) -> Result<(), AmideError> {
        let fail = |reason: &str| Err(AmideError::Config(reason.to_string()));

        if self.center_freq <= 0. {
            return fail("center_freq must be positive");
        }
        if self.site_count == 0 {
            return fail("site_count must be at least 1");
        }
        if self.layers == 0 {
            return fail("layers must be at least 1");
        }

        validate_angles(&self.tilt, "tilt", 180.)?;
        validate_angles(&self.twist, "twist", 360.)?;

        if self.coupling_cutoff.enabled && self.coupling_cutoff.distance < 5. {
            return fail("cutoff distance must be at least 5 Å");
        }
        if self.width <= 0. {
            return fail("width must be positive");
        }
        if self.spectrum.start <= 0. {
            return fail("spectrum start must be positive");
        }
        if self.spectrum.end < self.spectrum.start {
            return fail("spectrum end must not precede its start");
        }
        if self.spectrum.step <= 0. {
            return fail("spectrum step must be positive");
        }

        Ok(())
    }
}

fn validate_angles(range: &AngleRange, name: &str, max: f64) -> Result<(), AmideError> {
    let fail = |reason: String| Err(AmideError::Config(reason));

    if range.start < 0. || range.start > max {
        return fail(format!("{name} start must be within [0, {max}]"));
    }
    if range.end < range.start || range.end > max {
        return fail(format!("{name} end must be within [start, {max}]"));
    }
    if range.points == 0 {
        return fail(format!("{name} points must be at least 1"));
    }
    if range.start == range.end && range.points != 1 {
        return fail(format!("{name} points must be 1 for a single angle"));
    }

    Ok(())
}
