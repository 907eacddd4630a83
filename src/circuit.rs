//! Photonic circuit wiring and evaluation engine
//!
//! A circuit owns named components and a directed wiring map between their
//! ports. Evaluation is dependency-driven fixed-point propagation: each
//! component fires once all of its inputs are resolvable, until every
//! component has fired or no further progress is possible.

use log::{debug, warn};
use ndarray::Array2;
use num_complex::Complex64;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::components::PhotonicComponent;
use crate::error::PhotonicError;
use crate::mode::PhotonicMode;

/// Qualified port address within a circuit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PortKey {
    pub component: String,
    pub port: String,
}

impl PortKey {
    pub fn new(component: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for PortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.port)
    }
}

/// A composable network of photonic components.
///
/// Assembled once via `add_component`/`connect`/`set_inputs`/`set_outputs`,
/// then simulated any number of times; `simulate` takes `&self` and keeps
/// its working state private to the call, so a frozen circuit can be shared
/// across threads.
pub struct PhotonicCircuit {
    pub name: String,
    components: HashMap<String, Box<dyn PhotonicComponent>>,
    /// Registration order; evaluation scans and output tie-breaks follow it.
    order: Vec<String>,
    /// Directed wiring, source port -> target port. A source drives at most
    /// one edge.
    wires: HashMap<PortKey, PortKey>,
    /// Reverse map, target port -> source port.
    feeds: HashMap<PortKey, PortKey>,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl PhotonicCircuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: HashMap::new(),
            order: Vec::new(),
            wires: HashMap::new(),
            feeds: HashMap::new(),
            input_names: Vec::new(),
            output_names: Vec::new(),
        }
    }

    /// Register a component under its own name.
    ///
    /// Re-adding a name replaces the prior entry but keeps its registration
    /// slot, so evaluation order is unaffected.
    pub fn add_component(&mut self, component: impl PhotonicComponent + 'static) {
        let name = component.name().to_string();
        if self.components.contains_key(&name) {
            warn!("circuit {:?}: overwriting component {:?}", self.name, name);
        } else {
            self.order.push(name.clone());
        }
        self.components.insert(name, Box::new(component));
    }

    /// Wire an output port of one component into an input port of another.
    ///
    /// Both endpoints must exist, the source must not already drive an edge,
    /// and the target must not already be driven. Acyclicity is not checked
    /// here; a cycle surfaces at simulate time as `UnresolvableGraph`.
    pub fn connect(
        &mut self,
        from_component: &str,
        from_port: &str,
        to_component: &str,
        to_port: &str,
    ) -> Result<(), PhotonicError> {
        self.check_port(from_component, from_port, "output")?;
        self.check_port(to_component, to_port, "input")?;

        let source = PortKey::new(from_component, from_port);
        let target = PortKey::new(to_component, to_port);

        if let Some(existing) = self.wires.get(&source) {
            return Err(PhotonicError::SourceAlreadyWired {
                output: source,
                existing: existing.clone(),
            });
        }
        if let Some(existing) = self.feeds.get(&target) {
            return Err(PhotonicError::InputAlreadyDriven {
                input: target,
                existing: existing.clone(),
            });
        }

        debug!("circuit {:?}: wired {} -> {}", self.name, source, target);
        self.feeds.insert(target.clone(), source.clone());
        self.wires.insert(source, target);
        Ok(())
    }

    fn check_port(
        &self,
        component: &str,
        port: &str,
        direction: &'static str,
    ) -> Result<(), PhotonicError> {
        let comp = self
            .components
            .get(component)
            .ok_or_else(|| PhotonicError::UnknownComponent {
                component: component.to_string(),
            })?;
        let ports = if direction == "output" {
            comp.output_ports()
        } else {
            comp.input_ports()
        };
        if !ports.contains(&port) {
            return Err(PhotonicError::UnknownPort {
                component: component.to_string(),
                direction,
                port: port.to_string(),
            });
        }
        Ok(())
    }

    /// Declare the circuit-level input mode names.
    pub fn set_inputs(&mut self, names: &[&str]) {
        self.input_names = names.iter().map(|n| n.to_string()).collect();
    }

    /// Declare the circuit-level output mode names.
    pub fn set_outputs(&mut self, names: &[&str]) {
        self.output_names = names.iter().map(|n| n.to_string()).collect();
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn component(&self, name: &str) -> Option<&dyn PhotonicComponent> {
        self.components.get(name).map(|c| c.as_ref())
    }

    pub fn component_mut(&mut self, name: &str) -> Option<&mut (dyn PhotonicComponent + '_)> {
        self.components
            .get_mut(name)
            .map(|c| &mut **c as &mut dyn PhotonicComponent)
    }

    /// Evaluate the circuit for one assignment of input modes.
    ///
    /// A component's input port is resolvable if an edge feeds it and the
    /// source mode is already stored, or if the port name is a declared
    /// circuit input the caller supplied. Components fire exactly once;
    /// a full pass without progress aborts with `UnresolvableGraph` naming
    /// the stuck components.
    ///
    /// When several components expose an output port matching a declared
    /// output name, ports that are not a wiring source win (they are
    /// dangling circuit boundaries), then the earliest-registered component.
    pub fn simulate(
        &self,
        input_modes: &HashMap<String, PhotonicMode>,
    ) -> Result<HashMap<String, PhotonicMode>, PhotonicError> {
        let mut resolved: HashMap<PortKey, PhotonicMode> = HashMap::new();
        let mut processed: HashSet<&str> = HashSet::new();
        let mut pass = 0;

        while processed.len() < self.order.len() {
            let mut progressed = false;
            pass += 1;

            for name in &self.order {
                if processed.contains(name.as_str()) {
                    continue;
                }
                let component = &self.components[name];

                let Some(gathered) = self.gather_inputs(name, component.as_ref(), &resolved, input_modes)
                else {
                    continue;
                };

                let outputs = component.apply_transformation(&gathered);
                for (port, mode) in outputs {
                    resolved.insert(PortKey::new(name.clone(), port), mode);
                }
                processed.insert(name.as_str());
                progressed = true;
                debug!("circuit {:?}: pass {}: fired {:?}", self.name, pass, name);
            }

            if !progressed {
                let stuck: Vec<String> = self
                    .order
                    .iter()
                    .filter(|n| !processed.contains(n.as_str()))
                    .cloned()
                    .collect();
                return Err(PhotonicError::UnresolvableGraph { stuck });
            }
        }

        let mut outputs = HashMap::with_capacity(self.output_names.len());
        for output_name in &self.output_names {
            let key = self
                .locate_output(output_name)
                .ok_or_else(|| PhotonicError::UnknownOutput {
                    name: output_name.clone(),
                })?;
            let mode = resolved
                .get(&key)
                .cloned()
                .ok_or_else(|| PhotonicError::UnknownOutput {
                    name: output_name.clone(),
                })?;
            outputs.insert(output_name.clone(), mode);
        }
        Ok(outputs)
    }

    /// Collect the input modes for one component, or `None` if any port is
    /// not yet resolvable. Wired sources take precedence over circuit inputs.
    fn gather_inputs(
        &self,
        name: &str,
        component: &dyn PhotonicComponent,
        resolved: &HashMap<PortKey, PhotonicMode>,
        input_modes: &HashMap<String, PhotonicMode>,
    ) -> Option<HashMap<String, PhotonicMode>> {
        let mut gathered = HashMap::with_capacity(component.input_ports().len());
        for port in component.input_ports() {
            let target = PortKey::new(name, *port);
            if let Some(source) = self.feeds.get(&target) {
                gathered.insert(port.to_string(), resolved.get(source)?.clone());
            } else if self.input_names.iter().any(|n| n == port) {
                gathered.insert(port.to_string(), input_modes.get(*port)?.clone());
            } else {
                return None;
            }
        }
        Some(gathered)
    }

    fn locate_output(&self, output_name: &str) -> Option<PortKey> {
        let mut fallback = None;
        for name in &self.order {
            let component = &self.components[name];
            for port in component.output_ports() {
                if *port != output_name {
                    continue;
                }
                let key = PortKey::new(name.clone(), *port);
                if !self.wires.contains_key(&key) {
                    return Some(key);
                }
                if fallback.is_none() {
                    fallback = Some(key);
                }
            }
        }
        fallback
    }

    /// Extract the circuit-level transfer matrix by probing each declared
    /// input with a unit-amplitude mode while the others carry vacuum.
    ///
    /// Rows follow the declared output names, columns the declared inputs.
    pub fn transfer_matrix(&self) -> Result<Array2<Complex64>, PhotonicError> {
        let n_in = self.input_names.len();
        let n_out = self.output_names.len();
        let mut matrix = Array2::zeros((n_out, n_in));

        for (j, probe_name) in self.input_names.iter().enumerate() {
            let mut inputs = HashMap::with_capacity(n_in);
            for name in &self.input_names {
                let mode = if name == probe_name {
                    PhotonicMode::unit(name.clone())
                } else {
                    PhotonicMode::vacuum(name.clone())
                };
                inputs.insert(name.clone(), mode);
            }

            let outputs = self.simulate(&inputs)?;
            for (i, output_name) in self.output_names.iter().enumerate() {
                matrix[[i, j]] = outputs[output_name].amplitude;
            }
        }
        Ok(matrix)
    }

    /// Check whether the circuit-level transfer matrix is unitary.
    pub fn is_unitary(&self, tolerance: f64) -> Result<bool, PhotonicError> {
        let u = self.transfer_matrix()?;
        let (rows, cols) = u.dim();
        if rows != cols {
            return Ok(false);
        }

        let u_h = u.t().mapv(|x| x.conj());
        let product = u.dot(&u_h);

        for i in 0..rows {
            for j in 0..rows {
                let expected = if i == j { 1.0 } else { 0.0 };
                if (product[[i, j]].norm() - expected).abs() > tolerance {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
