//! Mach-Zehnder fringe sweep demo.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::debug;
use photonflow::{homodyne_measurement, MachZehnderCircuit, PhotonicMode};
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sweep",
    about = "Sweep the Mach-Zehnder internal phase and print the interference fringe"
)]
struct Cli {
    /// Number of phase steps across [0, 2pi]
    #[arg(long, default_value_t = 16)]
    steps: usize,

    /// Reflectivity of both splitters
    #[arg(long, default_value_t = 0.5)]
    reflectivity: f64,

    /// Phase difference of both splitters (radians)
    #[arg(long, default_value_t = 0.0)]
    phase_difference: f64,

    /// Local oscillator phase for the homodyne readout (radians)
    #[arg(long, default_value_t = 0.0)]
    lo_phase: f64,

    /// Write the sweep records to this path as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,

    #[arg(long)]
    debug: bool,
}

#[derive(Serialize)]
struct SweepRecord {
    phase_shift: f64,
    intensity1: f64,
    intensity2: f64,
    homodyne_amplitude: f64,
    homodyne_phase: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let steps = cli.steps.max(1);
    let mut mzi = MachZehnderCircuit::with_splitters(
        "fringe_sweep",
        0.0,
        cli.reflectivity,
        cli.phase_difference,
    )?;

    println!("{}", "=".repeat(60));
    println!(
        "Mach-Zehnder fringe sweep ({} steps, r = {})",
        steps, cli.reflectivity
    );
    println!(
        "inputs: {} | outputs: {}",
        mzi.circuit().input_names().join(", "),
        mzi.circuit().output_names().join(", ")
    );
    println!("{}", "=".repeat(60));
    println!(
        "{:>10} {:>12} {:>12} {:>14}",
        "theta", "I(out1)", "I(out2)", "homodyne amp"
    );

    let mut records = Vec::with_capacity(steps + 1);
    for k in 0..=steps {
        let theta = 2.0 * PI * k as f64 / steps as f64;
        mzi.set_phase_shift(theta);

        let mut inputs = HashMap::new();
        inputs.insert("input1".to_string(), PhotonicMode::unit("input1"));
        inputs.insert("input2".to_string(), PhotonicMode::vacuum("input2"));

        let outputs = mzi.simulate(&inputs)?;
        let out1 = &outputs["output1"];
        let out2 = &outputs["output2"];
        let (homodyne_amplitude, homodyne_phase) = homodyne_measurement(out1, cli.lo_phase);
        debug!(
            "theta={theta:.4} out1={} out2={} pol={}",
            out1.amplitude,
            out2.amplitude,
            out1.polarization.label()
        );

        println!(
            "{:>10.4} {:>12.6} {:>12.6} {:>14.6}",
            theta,
            out1.intensity(),
            out2.intensity(),
            homodyne_amplitude
        );

        records.push(SweepRecord {
            phase_shift: theta,
            intensity1: out1.intensity(),
            intensity2: out2.intensity(),
            homodyne_amplitude,
            homodyne_phase,
        });
    }

    if let Some(path) = cli.json_out {
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {} records to {}", records.len(), path.display());
    }

    Ok(())
}
