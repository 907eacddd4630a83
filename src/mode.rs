//! Photonic mode state
//!
//! The universal interchange value between components and across the
//! circuit boundary.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Telecom C-band reference wavelength used for probe modes (nm).
pub const PROBE_WAVELENGTH_NM: f64 = 1550.0;

/// Polarization label of an optical mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarization {
    Horizontal,
    Vertical,
    Diagonal,
}

impl Polarization {
    /// Conventional single-letter label ("H", "V", "D").
    pub fn label(&self) -> &'static str {
        match self {
            Polarization::Horizontal => "H",
            Polarization::Vertical => "V",
            Polarization::Diagonal => "D",
        }
    }
}

/// Instantaneous state of a single optical mode.
///
/// `phase` is carried explicitly rather than derived from the amplitude
/// argument: components that accumulate phase as a running quantity (see
/// `PhaseShifter`) keep the two deliberately distinct, so the type accepts
/// any combination.
///
/// Modes are never mutated in place; every transformation produces fresh
/// records.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhotonicMode {
    pub mode_id: String,
    /// Optical frequency in Hz.
    pub frequency: f64,
    pub polarization: Polarization,
    pub amplitude: Complex64,
    /// Phase in radians.
    pub phase: f64,
}

impl PhotonicMode {
    pub fn new(
        mode_id: impl Into<String>,
        frequency: f64,
        polarization: Polarization,
        amplitude: Complex64,
        phase: f64,
    ) -> Self {
        Self {
            mode_id: mode_id.into(),
            frequency,
            polarization,
            amplitude,
            phase,
        }
    }

    /// Empty-port placeholder: zero amplitude, zero frequency, horizontal.
    pub fn vacuum(mode_id: impl Into<String>) -> Self {
        Self::new(
            mode_id,
            0.0,
            Polarization::Horizontal,
            Complex64::new(0.0, 0.0),
            0.0,
        )
    }

    /// Unit-amplitude probe at the telecom reference wavelength.
    pub fn unit(mode_id: impl Into<String>) -> Self {
        Self::new(
            mode_id,
            SPEED_OF_LIGHT / (PROBE_WAVELENGTH_NM * 1e-9),
            Polarization::Horizontal,
            Complex64::new(1.0, 0.0),
            0.0,
        )
    }

    /// Construct a mode from a vacuum wavelength in nanometres.
    pub fn from_wavelength_nm(
        mode_id: impl Into<String>,
        wavelength_nm: f64,
        polarization: Polarization,
        amplitude: Complex64,
    ) -> Self {
        let frequency = SPEED_OF_LIGHT / (wavelength_nm * 1e-9);
        let phase = amplitude.arg();
        Self::new(mode_id, frequency, polarization, amplitude, phase)
    }

    /// Optical intensity |amplitude|².
    pub fn intensity(&self) -> f64 {
        self.amplitude.norm_sqr()
    }
}
