//! Error taxonomy for circuit construction and simulation.

use thiserror::Error;

use crate::circuit::PortKey;

#[derive(Debug, Error)]
pub enum PhotonicError {
    #[error("beam splitter reflectivity must lie in [0, 1], got {value}")]
    ReflectivityOutOfRange { value: f64 },

    #[error("no component named {component:?} in circuit")]
    UnknownComponent { component: String },

    #[error("component {component:?} has no {direction} port named {port:?}")]
    UnknownPort {
        component: String,
        direction: &'static str,
        port: String,
    },

    #[error("output {output} is already wired to {existing}")]
    SourceAlreadyWired { output: PortKey, existing: PortKey },

    #[error("input {input} is already driven by {existing}")]
    InputAlreadyDriven { input: PortKey, existing: PortKey },

    #[error("simulation stalled; components with unresolved inputs: {stuck:?}")]
    UnresolvableGraph { stuck: Vec<String> },

    #[error("no component exposes an output port named {name:?}")]
    UnknownOutput { name: String },
}
