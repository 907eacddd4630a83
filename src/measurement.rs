//! Measurement utilities

use num_complex::Complex64;

use crate::mode::PhotonicMode;

/// Local oscillator amplitude used for homodyne detection. Strong relative
/// to any signal this simulator produces.
pub const LOCAL_OSCILLATOR_AMPLITUDE: f64 = 100.0;

/// Homodyne measurement of a photonic mode.
///
/// Mixes the signal with a strong local oscillator at the given phase and
/// returns the (amplitude, phase) of the interfered field. Real homodyne
/// detection is balanced; this models the single-detector form.
pub fn homodyne_measurement(mode: &PhotonicMode, local_oscillator_phase: f64) -> (f64, f64) {
    let lo_field = Complex64::from_polar(LOCAL_OSCILLATOR_AMPLITUDE, local_oscillator_phase);
    let total_field = mode.amplitude + lo_field;
    (total_field.norm(), total_field.arg())
}
