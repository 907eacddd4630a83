//! Photonflow: linear-optics circuit simulation
//!
//! Beam splitters and phase shifters wired into a directed signal-flow
//! graph, evaluated by dependency-driven fixed-point propagation.

pub mod circuit;
pub mod components;
pub mod error;
pub mod interferometer;
pub mod measurement;
pub mod mode;

pub use circuit::{PhotonicCircuit, PortKey};
pub use components::{BeamSplitter, PhaseShifter, PhotonicComponent};
pub use error::PhotonicError;
pub use interferometer::MachZehnderCircuit;
pub use measurement::{homodyne_measurement, LOCAL_OSCILLATOR_AMPLITUDE};
pub use mode::{PhotonicMode, Polarization, SPEED_OF_LIGHT};
