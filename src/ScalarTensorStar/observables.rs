use crate::ScalarTensorStar::radial_grid::RadialGrid;
use crate::ScalarTensorStar::scalar_tensor_ode::{LAMBDA, PRESSURE, SCALAR_GRADIENT};
use crate::ScalarTensorStar::shooting_solver::{ShootingOutcome, Trajectory};
use crate::star_config::StarConfig;
use crate::star_error::StarError;

/// Macroscopic quantities read off a trajectory at the stellar surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StarObservables {
    pub surface_index: usize,
    /// km
    pub radius: f64,
    /// solar masses
    pub mass: f64,
    pub scalar_charge: f64,
}

/// First grid index whose pressure is at or below `surface_pressure`.
pub fn find_surface(trajectory: &Trajectory, surface_pressure: f64) -> Option<usize> {
    trajectory
        .states
        .iter()
        .position(|y| y[PRESSURE] <= surface_pressure)
}

/// Surface radius, mass R(1 - e^{-2 lambda})/(2 * 1.47) and scalar charge g/(c * 1.47).
pub fn extract_observables(
    trajectory: &Trajectory,
    grid: &RadialGrid,
    config: &StarConfig,
    central_pressure: f64,
) -> Result<StarObservables, StarError> {
    let surface_index = find_surface(trajectory, config.surface_pressure).ok_or_else(|| {
        StarError::SurfaceNotFound {
            central_pressure,
            last_pressure: trajectory
                .last_state()
                .map(|y| y[PRESSURE])
                .unwrap_or(central_pressure),
        }
    })?;
    let state = &trajectory.states[surface_index];
    let radius = grid.radii()[surface_index];
    let mass = radius * (1.0 - (-2.0 * state[LAMBDA]).exp()) / (2.0 * config.km_per_solar_mass);
    let scalar_charge = state[SCALAR_GRADIENT] / (config.light_speed * config.km_per_solar_mass);
    Ok(StarObservables {
        surface_index,
        radius,
        mass,
        scalar_charge,
    })
}

impl ShootingOutcome {
    pub fn observables(
        &self,
        grid: &RadialGrid,
        config: &StarConfig,
    ) -> Result<StarObservables, StarError> {
        extract_observables(&self.trajectory, grid, config, self.central_pressure)
    }
}
