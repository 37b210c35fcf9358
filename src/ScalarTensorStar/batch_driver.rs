use crate::EOS::eos_interpolation::PressureToDensity;
use crate::ScalarTensorStar::radial_grid::RadialGrid;
use crate::ScalarTensorStar::shooting_solver::{ShootingOutcome, ShootingSolver};
use crate::star_config::StarConfig;
use crate::star_error::StarError;
use log::{info, warn};
use rayon::prelude::*;
use std::time::Instant;

/// Observables of one star plus the shooting diagnostics that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// km^-2
    pub central_pressure: f64,
    /// km
    pub radius: f64,
    /// solar masses
    pub mass: f64,
    pub scalar_charge: f64,
    pub converged: bool,
    pub iterations: usize,
    pub error: f64,
    pub phi_trial: f64,
}

/// One entry of the sequence; `index` is the 1-based position of the central pressure.
#[derive(Debug)]
pub struct SequencePoint {
    pub index: usize,
    pub central_pressure: f64,
    pub result: Result<ResultRecord, StarError>,
}

/// Ordered results of a central-pressure sweep. Failed pressures stay in place as gaps.
#[derive(Debug, Default)]
pub struct StarSequence {
    pub points: Vec<SequencePoint>,
}

impl StarSequence {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// successful records in central-pressure order
    pub fn records(&self) -> Vec<&ResultRecord> {
        self.points
            .iter()
            .filter_map(|p| p.result.as_ref().ok())
            .collect()
    }

    pub fn failures(&self) -> Vec<&SequencePoint> {
        self.points.iter().filter(|p| p.result.is_err()).collect()
    }

    pub fn converged_count(&self) -> usize {
        self.records().iter().filter(|r| r.converged).count()
    }

    pub fn non_converged_count(&self) -> usize {
        self.records().iter().filter(|r| !r.converged).count()
    }

    pub fn radii(&self) -> Vec<f64> {
        self.records().iter().map(|r| r.radius).collect()
    }

    pub fn masses(&self) -> Vec<f64> {
        self.records().iter().map(|r| r.mass).collect()
    }

    pub fn charges(&self) -> Vec<f64> {
        self.records().iter().map(|r| r.scalar_charge).collect()
    }

    /// record with the largest mass
    pub fn maximum_mass(&self) -> Option<&ResultRecord> {
        self.records()
            .into_iter()
            .max_by(|a, b| a.mass.total_cmp(&b.mass))
    }
}

/// Runs the shooting solver over a list of central pressures with one shared EOS and grid.
pub struct BatchDriver<'a, E: PressureToDensity + Sync> {
    eos: &'a E,
    config: &'a StarConfig,
    grid: RadialGrid,
}

impl<'a, E: PressureToDensity + Sync> BatchDriver<'a, E> {
    pub fn new(eos: &'a E, config: &'a StarConfig) -> Result<Self, StarError> {
        config.validate()?;
        let grid = RadialGrid::build(&config.grid)?;
        info!(
            "radial grid: {} points from {} to {:.3} km",
            grid.len(),
            grid.first(),
            grid.last()
        );
        Ok(Self { eos, config, grid })
    }

    pub fn grid(&self) -> &RadialGrid {
        &self.grid
    }

    pub fn config(&self) -> &StarConfig {
        self.config
    }

    pub fn solver(&self) -> ShootingSolver<'_, E> {
        ShootingSolver::new(self.eos, &self.grid, self.config)
    }

    /// Shooting outcome for one central pressure, trajectory included.
    pub fn solve_outcome(&self, central_pressure: f64) -> Result<ShootingOutcome, StarError> {
        self.solver().solve(central_pressure)
    }

    pub fn record_from(&self, outcome: &ShootingOutcome) -> Result<ResultRecord, StarError> {
        let observables = outcome.observables(&self.grid, self.config)?;
        Ok(ResultRecord {
            central_pressure: outcome.central_pressure,
            radius: observables.radius,
            mass: observables.mass,
            scalar_charge: observables.scalar_charge,
            converged: outcome.converged,
            iterations: outcome.iterations,
            error: outcome.error,
            phi_trial: outcome.phi_trial,
        })
    }

    pub fn solve_star(&self, central_pressure: f64) -> Result<ResultRecord, StarError> {
        let outcome = self.solve_outcome(central_pressure)?;
        self.record_from(&outcome)
    }

    /// The configured sweep P_c(j), j = 1..=n_pressures.
    pub fn run(&self) -> StarSequence {
        self.run_pressures(&self.config.central_pressures())
    }

    pub fn run_pressures(&self, pressures: &[f64]) -> StarSequence {
        let begin = Instant::now();
        info!(
            "computing {} stars ({})",
            pressures.len(),
            if self.config.batch.parallel {
                "parallel"
            } else {
                "sequential"
            }
        );
        let solve_point = |(i, &central_pressure): (usize, &f64)| {
            let result = self.solve_star(central_pressure);
            match &result {
                Ok(record) => info!(
                    "star {}: P_c = {:e}, R = {:.4} km, M = {:.5} M_sun, charge = {:e}, iterations = {}{}",
                    i + 1,
                    central_pressure,
                    record.radius,
                    record.mass,
                    record.scalar_charge,
                    record.iterations,
                    if record.converged { "" } else { " (not converged)" }
                ),
                Err(e) => warn!("star {}: P_c = {:e} skipped: {}", i + 1, central_pressure, e),
            }
            SequencePoint {
                index: i + 1,
                central_pressure,
                result,
            }
        };
        let points: Vec<SequencePoint> = if self.config.batch.parallel {
            pressures.par_iter().enumerate().map(solve_point).collect()
        } else {
            pressures.iter().enumerate().map(solve_point).collect()
        };
        let sequence = StarSequence { points };
        info!(
            "sequence done in {:.2?}: {} converged, {} not converged, {} gaps",
            begin.elapsed(),
            sequence.converged_count(),
            sequence.non_converged_count(),
            sequence.failures().len()
        );
        sequence
    }
}
