//! Mach-Zehnder interferometer
//!
//! A pre-wired two-splitter circuit with a tunable internal phase arm.

use std::collections::HashMap;

use crate::circuit::PhotonicCircuit;
use crate::components::{BeamSplitter, PhaseShifter};
use crate::error::PhotonicError;
use crate::mode::PhotonicMode;

/// Two beam splitters (50/50 by default) around a phase shifter:
///
/// ```text
/// input1 ──┐            ┌── PS ──┐            ┌── output1
///          │ BS1        │        │ BS2        │
/// input2 ──┘            └────────┘            └── output2
/// ```
///
/// Exposes the same `simulate` contract as a plain circuit. For a unit
/// amplitude on `input1` and vacuum on `input2`, the output intensities
/// trace cos²(θ/2) and sin²(θ/2) as the internal phase θ is swept.
pub struct MachZehnderCircuit {
    circuit: PhotonicCircuit,
}

impl MachZehnderCircuit {
    /// Balanced interferometer: both splitters 50/50 with no phase difference.
    pub fn new(name: impl Into<String>, phase_shift: f64) -> Result<Self, PhotonicError> {
        Self::with_splitters(name, phase_shift, 0.5, 0.0)
    }

    /// Interferometer with both splitters sharing the given reflectivity and
    /// phase difference. Unbalanced splitters reduce fringe visibility: the
    /// dark port no longer reaches zero.
    pub fn with_splitters(
        name: impl Into<String>,
        phase_shift: f64,
        reflectivity: f64,
        phase_difference: f64,
    ) -> Result<Self, PhotonicError> {
        let mut circuit = PhotonicCircuit::new(name);

        circuit.add_component(BeamSplitter::new("BS1", reflectivity, phase_difference)?);
        circuit.add_component(BeamSplitter::new("BS2", reflectivity, phase_difference)?);
        circuit.add_component(PhaseShifter::new("PS", phase_shift));

        circuit.connect("BS1", "output1", "PS", "input")?;
        circuit.connect("PS", "output", "BS2", "input1")?;
        circuit.connect("BS1", "output2", "BS2", "input2")?;

        circuit.set_inputs(&["input1", "input2"]);
        circuit.set_outputs(&["output1", "output2"]);

        Ok(Self { circuit })
    }

    /// Retune the internal phase shifter.
    pub fn set_phase_shift(&mut self, phase_shift: f64) {
        if let Some(ps) = self
            .circuit
            .component_mut("PS")
            .and_then(|c| c.as_any_mut().downcast_mut::<PhaseShifter>())
        {
            ps.set_phase(phase_shift);
        }
    }

    pub fn phase_shift(&self) -> f64 {
        self.circuit
            .component("PS")
            .and_then(|c| c.as_any().downcast_ref::<PhaseShifter>())
            .map(|ps| ps.phase_shift())
            .unwrap_or(0.0)
    }

    pub fn simulate(
        &self,
        input_modes: &HashMap<String, PhotonicMode>,
    ) -> Result<HashMap<String, PhotonicMode>, PhotonicError> {
        self.circuit.simulate(input_modes)
    }

    pub fn circuit(&self) -> &PhotonicCircuit {
        &self.circuit
    }
}
