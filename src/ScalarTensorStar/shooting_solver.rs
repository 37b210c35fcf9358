//! Shooting method for the central value of the scalar field.
//!
//! The boundary value problem "phi regular at the centre, phi -> 0 far away" is replaced by
//! a sequence of initial value problems. Each trial fixes phi(r_0) = phi_trial, integrates the
//! whole grid and looks at the sign of phi at the last grid point reached: a positive value
//! means the trial was too large, anything else too small. The bracket is halved until the
//! field at the end of the grid has decayed below the precision, or the iteration budget is
//! spent. The error is only refreshed by trials whose pressure reached vacuum; the last trial
//! is always returned together with a `converged` flag.
use crate::EOS::eos_interpolation::PressureToDensity;
use crate::ScalarTensorStar::ode_stepper::DormandPrince45;
use crate::ScalarTensorStar::radial_grid::RadialGrid;
use crate::ScalarTensorStar::scalar_tensor_ode::{
    PRESSURE, SCALAR_FIELD, ScalarTensorSystem, StarState, initial_state,
};
use crate::star_config::{ShootingConfig, StarConfig};
use crate::star_error::StarError;
use log::{debug, warn};

/// States of one trial on the grid. A diverged trial ends at the last finite grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub states: Vec<StarState>,
    /// (radius, reason) when the integration stopped before the end of the grid
    pub divergence: Option<(f64, String)>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.divergence.is_some()
    }

    pub fn last_state(&self) -> Option<&StarState> {
        self.states.last()
    }

    /// One component of the state along the trajectory.
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.states.iter().map(|y| y[index]).collect()
    }
}

/// Record of one bisection iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct BisectionStep {
    pub iteration: usize,
    /// bracket before the update
    pub bracket_before: (f64, f64),
    pub phi_trial: f64,
    /// bracket after the update
    pub bracket_after: (f64, f64),
    /// phi at the last grid point reached
    pub terminal_phi: f64,
    pub terminal_pressure: f64,
    pub surface_reached: bool,
    pub diverged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingOutcome {
    pub central_pressure: f64,
    /// central scalar field of the returned trajectory
    pub phi_trial: f64,
    pub trajectory: Trajectory,
    pub iterations: usize,
    pub error: f64,
    pub converged: bool,
    pub bracket: (f64, f64),
    pub history: Vec<BisectionStep>,
}

pub struct ShootingSolver<'a, E: PressureToDensity> {
    eos: &'a E,
    grid: &'a RadialGrid,
    shooting: ShootingConfig,
    stepper: DormandPrince45,
    surface_pressure: f64,
}

impl<'a, E: PressureToDensity> ShootingSolver<'a, E> {
    pub fn new(eos: &'a E, grid: &'a RadialGrid, config: &StarConfig) -> Self {
        Self {
            eos,
            grid,
            shooting: config.shooting.clone(),
            stepper: DormandPrince45::new(&config.stepper),
            surface_pressure: config.surface_pressure,
        }
    }

    pub fn grid(&self) -> &RadialGrid {
        self.grid
    }

    /// Integrates the field equations over the grid for one central scalar field value.
    pub fn integrate_trial(&self, central_pressure: f64, phi_trial: f64) -> Trajectory {
        let system = ScalarTensorSystem::new(self.eos);
        let runaway = self.shooting.phi_runaway;
        let solution = self.stepper.integrate_on_mesh(
            &system,
            self.grid.radii(),
            initial_state(central_pressure, phi_trial),
            |_, y| {
                let phi = y[SCALAR_FIELD];
                if phi.abs() > runaway {
                    Some(format!("scalar field runaway, |phi| = {:e}", phi.abs()))
                } else {
                    None
                }
            },
        );
        let reached = solution.states.len();
        let divergence = solution.divergence.map(|e| match e {
            StarError::IntegrationDiverged { radius, reason } => (radius, reason),
            other => (self.grid.radii()[reached - 1], other.to_string()),
        });
        Trajectory {
            states: solution.states,
            divergence,
        }
    }

    /// Bisection on the central scalar field for one central pressure.
    pub fn solve(&self, central_pressure: f64) -> Result<ShootingOutcome, StarError> {
        if !(central_pressure > 0.0) || !central_pressure.is_finite() {
            return Err(StarError::InvalidCentralPressure(central_pressure));
        }
        let precision = self.shooting.precision;
        let max_iter = self.shooting.max_iter;
        let (mut phi_a, mut phi_b) = (self.shooting.phi_lower, self.shooting.phi_upper);
        let mut error = 1.0;
        let mut iterations = 0;
        let mut history = Vec::new();
        let (phi_trial, trajectory) = loop {
            let phi_trial = 0.5 * (phi_a + phi_b);
            let trajectory = self.integrate_trial(central_pressure, phi_trial);
            let last = trajectory
                .last_state()
                .ok_or_else(|| StarError::IntegrationDiverged {
                    radius: self.grid.first(),
                    reason: "empty trajectory".to_string(),
                })?;
            let (terminal_phi, terminal_pressure) = (last[SCALAR_FIELD], last[PRESSURE]);
            let surface_reached = terminal_pressure <= self.surface_pressure;
            if surface_reached {
                error = terminal_phi.abs();
            }
            let bracket_before = (phi_a, phi_b);
            if terminal_phi > 0.0 {
                phi_b = phi_trial;
            } else {
                phi_a = phi_trial;
            }
            iterations += 1;
            debug!(
                "P_c = {:e}, iteration {}: phi_trial = {:.12}, phi(end) = {:e}, P(end) = {:e}, error = {:e}{}",
                central_pressure,
                iterations,
                phi_trial,
                terminal_phi,
                terminal_pressure,
                error,
                match &trajectory.divergence {
                    Some((r, reason)) => format!(", diverged at r = {:.4}: {}", r, reason),
                    None => String::new(),
                }
            );
            history.push(BisectionStep {
                iteration: iterations,
                bracket_before,
                phi_trial,
                bracket_after: (phi_a, phi_b),
                terminal_phi,
                terminal_pressure,
                surface_reached,
                diverged: trajectory.is_truncated(),
            });
            if !(error > precision && iterations < max_iter) {
                break (phi_trial, trajectory);
            }
        };
        let converged = error <= precision;
        if !converged {
            warn!(
                "P_c = {:e}: shooting stopped after {} iterations with error {:e} > {:e}, keeping the last trial phi = {:.12}",
                central_pressure, iterations, error, precision, phi_trial
            );
        }
        Ok(ShootingOutcome {
            central_pressure,
            phi_trial,
            trajectory,
            iterations,
            error,
            converged,
            bracket: (phi_a, phi_b),
            history,
        })
    }
}
