//! Photonic circuit components
//!
//! Modal transformation elements: each component consumes a set of named
//! input modes and produces a set of named output modes through a fixed
//! linear transfer matrix.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use std::any::Any;
use std::collections::HashMap;

use crate::error::PhotonicError;
use crate::mode::PhotonicMode;

/// Capability interface for circuit components.
///
/// Components own their port names and transfer matrix; wiring between
/// components lives only in the circuit. Implementations are pure: applying
/// a transformation reads the inputs and the fixed parameters, nothing else.
pub trait PhotonicComponent: Send + Sync {
    fn name(&self) -> &str;

    /// Declared input port names, in matrix row order.
    fn input_ports(&self) -> &'static [&'static str];

    /// Declared output port names, in matrix row order.
    fn output_ports(&self) -> &'static [&'static str];

    /// The linear operator mapping input amplitudes to output amplitudes.
    fn transfer_matrix(&self) -> &Array2<Complex64>;

    /// Apply the transformation to a named-input-mode mapping.
    ///
    /// Ports absent from `inputs` are treated as vacuum (zero amplitude).
    fn apply_transformation(
        &self,
        inputs: &HashMap<String, PhotonicMode>,
    ) -> HashMap<String, PhotonicMode>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Two-port beam splitter.
///
/// Splits input light between two output ports with the given reflectivity.
/// The transfer matrix is fixed at construction; changing reflectivity means
/// constructing a new component.
#[derive(Clone, Debug)]
pub struct BeamSplitter {
    name: String,
    reflectivity: f64,
    transmissivity: f64,
    phase_difference: f64,
    matrix: Array2<Complex64>,
}

const BS_INPUT_PORTS: &[&str] = &["input1", "input2"];
const BS_OUTPUT_PORTS: &[&str] = &["output1", "output2"];

impl BeamSplitter {
    /// Create a beam splitter with reflectivity `r ∈ [0, 1]` and a phase
    /// difference between the reflected and transmitted beams.
    pub fn new(
        name: impl Into<String>,
        reflectivity: f64,
        phase_difference: f64,
    ) -> Result<Self, PhotonicError> {
        if !(0.0..=1.0).contains(&reflectivity) {
            return Err(PhotonicError::ReflectivityOutOfRange {
                value: reflectivity,
            });
        }
        let transmissivity = 1.0 - reflectivity;
        let matrix = Self::compute_matrix(reflectivity, transmissivity, phase_difference);
        Ok(Self {
            name: name.into(),
            reflectivity,
            transmissivity,
            phase_difference,
            matrix,
        })
    }

    /// Balanced 50/50 splitter with no phase difference.
    pub fn balanced(name: impl Into<String>) -> Self {
        // 0.5 is always in range
        Self::new(name, 0.5, 0.0).unwrap()
    }

    #[inline]
    fn compute_matrix(reflectivity: f64, transmissivity: f64, phi: f64) -> Array2<Complex64> {
        let r = reflectivity.sqrt();
        let t = transmissivity.sqrt();
        let exp_phi = Complex64::from_polar(1.0, phi);

        Array2::from_shape_vec(
            (2, 2),
            vec![
                Complex64::new(r, 0.0),
                t * exp_phi,
                t * exp_phi,
                Complex64::new(-r, 0.0),
            ],
        )
        .unwrap()
    }

    pub fn reflectivity(&self) -> f64 {
        self.reflectivity
    }

    pub fn transmissivity(&self) -> f64 {
        self.transmissivity
    }

    pub fn phase_difference(&self) -> f64 {
        self.phase_difference
    }
}

impl PhotonicComponent for BeamSplitter {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_ports(&self) -> &'static [&'static str] {
        BS_INPUT_PORTS
    }

    fn output_ports(&self) -> &'static [&'static str] {
        BS_OUTPUT_PORTS
    }

    fn transfer_matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    fn apply_transformation(
        &self,
        inputs: &HashMap<String, PhotonicMode>,
    ) -> HashMap<String, PhotonicMode> {
        let amp = |port: &str| {
            inputs
                .get(port)
                .map(|m| m.amplitude)
                .unwrap_or_else(|| Complex64::new(0.0, 0.0))
        };
        let input_vector = Array1::from_vec(vec![amp("input1"), amp("input2")]);
        let output_vector = self.matrix.dot(&input_vector);

        // Frequency and polarization follow input port 1. Input 2's values
        // are dropped; the component does not model frequency mixing.
        let reference = inputs
            .get("input1")
            .cloned()
            .unwrap_or_else(|| PhotonicMode::vacuum("input1"));

        BS_OUTPUT_PORTS
            .iter()
            .enumerate()
            .map(|(i, port)| {
                let amplitude = output_vector[i];
                let mode = PhotonicMode::new(
                    *port,
                    reference.frequency,
                    reference.polarization,
                    amplitude,
                    amplitude.arg(),
                );
                (port.to_string(), mode)
            })
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Single-mode phase shifter.
///
/// Rotates the amplitude by e^{iθ} and adds θ to the carried phase. The
/// carried phase accumulates additively and is not re-derived from the new
/// amplitude argument, so the two can diverge across repeated compositions.
#[derive(Clone, Debug)]
pub struct PhaseShifter {
    name: String,
    phase_shift: f64,
    matrix: Array2<Complex64>,
}

const PS_INPUT_PORTS: &[&str] = &["input"];
const PS_OUTPUT_PORTS: &[&str] = &["output"];

impl PhaseShifter {
    pub fn new(name: impl Into<String>, phase_shift: f64) -> Self {
        let matrix = Self::compute_matrix(phase_shift);
        Self {
            name: name.into(),
            phase_shift,
            matrix,
        }
    }

    #[inline]
    fn compute_matrix(phase_shift: f64) -> Array2<Complex64> {
        Array2::from_shape_vec((1, 1), vec![Complex64::from_polar(1.0, phase_shift)]).unwrap()
    }

    /// Replace the phase shift, re-deriving the cached transfer matrix.
    ///
    /// Parameter and matrix change together behind `&mut self`; no reader
    /// can observe one without the other.
    pub fn set_phase(&mut self, phase_shift: f64) {
        self.phase_shift = phase_shift;
        self.matrix = Self::compute_matrix(phase_shift);
    }

    pub fn phase_shift(&self) -> f64 {
        self.phase_shift
    }
}

impl PhotonicComponent for PhaseShifter {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_ports(&self) -> &'static [&'static str] {
        PS_INPUT_PORTS
    }

    fn output_ports(&self) -> &'static [&'static str] {
        PS_OUTPUT_PORTS
    }

    fn transfer_matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    fn apply_transformation(
        &self,
        inputs: &HashMap<String, PhotonicMode>,
    ) -> HashMap<String, PhotonicMode> {
        let input = inputs
            .get("input")
            .cloned()
            .unwrap_or_else(|| PhotonicMode::vacuum("input"));

        let amplitude = input.amplitude * Complex64::from_polar(1.0, self.phase_shift);
        let output = PhotonicMode::new(
            "output",
            input.frequency,
            input.polarization,
            amplitude,
            input.phase + self.phase_shift,
        );

        let mut outputs = HashMap::with_capacity(1);
        outputs.insert("output".to_string(), output);
        outputs
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Polarization;
    use std::f64::consts::PI;

    fn mode(id: &str, amplitude: Complex64) -> PhotonicMode {
        PhotonicMode::new(id, 5.6e14, Polarization::Horizontal, amplitude, 0.0)
    }

    #[test]
    fn test_reflectivity_validation() {
        assert!(BeamSplitter::new("bad", -0.1, 0.0).is_err());
        assert!(BeamSplitter::new("bad", 1.5, 0.0).is_err());
        assert!(BeamSplitter::new("edge", 0.0, 0.0).is_ok());
        assert!(BeamSplitter::new("edge", 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_parameter_accessors() {
        let bs = BeamSplitter::new("bs", 0.3, PI / 4.0).unwrap();
        assert_eq!(bs.reflectivity(), 0.3);
        assert!((bs.transmissivity() - 0.7).abs() < 1e-12);
        assert_eq!(bs.phase_difference(), PI / 4.0);
    }

    #[test]
    fn test_balanced_splitter_is_unitary() {
        let bs = BeamSplitter::balanced("bs");
        let m = bs.transfer_matrix();
        let m_h = m.t().mapv(|x| x.conj());
        let product = m.dot(&m_h);

        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product[[i, j]].norm() - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_balanced_splitter_energy_conservation() {
        let bs = BeamSplitter::balanced("bs");
        let mut inputs = HashMap::new();
        inputs.insert("input1".to_string(), mode("input1", Complex64::new(0.6, 0.3)));
        inputs.insert("input2".to_string(), mode("input2", Complex64::new(-0.2, 0.7)));

        let in_power: f64 = inputs.values().map(|m| m.intensity()).sum();
        let outputs = bs.apply_transformation(&inputs);
        let out_power: f64 = outputs.values().map(|m| m.intensity()).sum();

        assert!((in_power - out_power).abs() < 1e-12);
    }

    #[test]
    fn test_zero_reflectivity_swaps_inputs() {
        let bs = BeamSplitter::new("bs", 0.0, 0.0).unwrap();
        let a = Complex64::new(0.8, 0.1);
        let b = Complex64::new(-0.3, 0.4);
        let mut inputs = HashMap::new();
        inputs.insert("input1".to_string(), mode("input1", a));
        inputs.insert("input2".to_string(), mode("input2", b));

        let outputs = bs.apply_transformation(&inputs);
        assert!((outputs["output1"].amplitude - b).norm() < 1e-12);
        assert!((outputs["output2"].amplitude - a).norm() < 1e-12);
    }

    #[test]
    fn test_full_reflectivity_sign_convention() {
        let bs = BeamSplitter::new("bs", 1.0, 0.0).unwrap();
        let a = Complex64::new(0.8, 0.1);
        let b = Complex64::new(-0.3, 0.4);
        let mut inputs = HashMap::new();
        inputs.insert("input1".to_string(), mode("input1", a));
        inputs.insert("input2".to_string(), mode("input2", b));

        let outputs = bs.apply_transformation(&inputs);
        assert!((outputs["output1"].amplitude - a).norm() < 1e-12);
        assert!((outputs["output2"].amplitude + b).norm() < 1e-12);
    }

    #[test]
    fn test_missing_input_treated_as_vacuum() {
        let bs = BeamSplitter::balanced("bs");
        let mut inputs = HashMap::new();
        inputs.insert("input1".to_string(), mode("input1", Complex64::new(1.0, 0.0)));

        let outputs = bs.apply_transformation(&inputs);
        let half = 0.5_f64.sqrt();
        assert!((outputs["output1"].amplitude.norm() - half).abs() < 1e-12);
        assert!((outputs["output2"].amplitude.norm() - half).abs() < 1e-12);
    }

    #[test]
    fn test_splitter_copies_input1_frequency_and_polarization() {
        let bs = BeamSplitter::balanced("bs");
        let mut inputs = HashMap::new();
        inputs.insert(
            "input1".to_string(),
            PhotonicMode::new(
                "input1",
                2.0e14,
                Polarization::Vertical,
                Complex64::new(1.0, 0.0),
                0.0,
            ),
        );
        inputs.insert(
            "input2".to_string(),
            PhotonicMode::new(
                "input2",
                9.0e14,
                Polarization::Diagonal,
                Complex64::new(0.5, 0.0),
                0.0,
            ),
        );

        let outputs = bs.apply_transformation(&inputs);
        for port in ["output1", "output2"] {
            assert_eq!(outputs[port].frequency, 2.0e14);
            assert_eq!(outputs[port].polarization, Polarization::Vertical);
        }
    }

    #[test]
    fn test_phase_shifter_rotates_amplitude() {
        let ps = PhaseShifter::new("ps", PI / 2.0);
        let mut inputs = HashMap::new();
        inputs.insert("input".to_string(), mode("input", Complex64::new(1.0, 0.0)));

        let outputs = ps.apply_transformation(&inputs);
        let out = &outputs["output"];
        assert!((out.amplitude - Complex64::new(0.0, 1.0)).norm() < 1e-12);
        assert!((out.phase - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_phase_shifter_round_trip() {
        for k in 0..8 {
            let theta = k as f64 * PI / 4.0;
            let forward = PhaseShifter::new("fwd", theta);
            let backward = PhaseShifter::new("bwd", -theta);

            let original = Complex64::new(0.6, -0.4);
            let mut inputs = HashMap::new();
            inputs.insert("input".to_string(), mode("input", original));

            let mid = forward.apply_transformation(&inputs);
            let mut second = HashMap::new();
            second.insert("input".to_string(), mid["output"].clone());
            let restored = backward.apply_transformation(&second);

            assert!((restored["output"].amplitude - original).norm() < 1e-12);
            assert!(restored["output"].phase.abs() < 1e-12);
        }
    }

    #[test]
    fn test_phase_accumulates_additively() {
        // Carried phase is a running sum, distinct from the amplitude
        // argument: start with a mode whose phase field disagrees with
        // arg(amplitude) and check both tracks separately.
        let ps = PhaseShifter::new("ps", 0.75);
        let mut inputs = HashMap::new();
        inputs.insert(
            "input".to_string(),
            PhotonicMode::new(
                "input",
                5.6e14,
                Polarization::Horizontal,
                Complex64::new(1.0, 0.0),
                0.5,
            ),
        );

        let outputs = ps.apply_transformation(&inputs);
        let out = &outputs["output"];
        assert!((out.phase - 1.25).abs() < 1e-12);
        assert!((out.amplitude.arg() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_set_phase_updates_matrix_atomically() {
        let mut ps = PhaseShifter::new("ps", 0.0);
        ps.set_phase(PI);

        assert_eq!(ps.phase_shift(), PI);
        let matrix_entry = ps.transfer_matrix()[[0, 0]];
        assert!((matrix_entry - Complex64::from_polar(1.0, PI)).norm() < 1e-12);

        // The very next transformation must see the new phase.
        let mut inputs = HashMap::new();
        inputs.insert("input".to_string(), mode("input", Complex64::new(1.0, 0.0)));
        let outputs = ps.apply_transformation(&inputs);
        assert!((outputs["output"].amplitude - Complex64::new(-1.0, 0.0)).norm() < 1e-10);
    }
}
