//! # Star Configuration Module
//!
//! ## Purpose
//! Holds every constant the stellar-sequence computation depends on: unit conversions,
//! the vacuum threshold, the radial grid layout, the shooting parameters, the tolerances
//! of the adaptive stepper and the central-pressure sweep. One immutable `StarConfig` is
//! built at startup and handed by reference to every component.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "pressure_unit": 1.3152e-6,
//!   "km_per_solar_mass": 1.47,
//!   "light_speed": 299792.0,
//!   "surface_pressure": 1e-10,
//!   "grid": { "r_start": 0.005, "fine_step": 0.005, "coarse_step": 0.016,
//!             "switch_index": 4001, "n_points": 13900 },
//!   "shooting": { "phi_lower": 0.0, "phi_upper": 1.0, "precision": 5e-4,
//!                 "max_iter": 60, "phi_runaway": 1000.0 },
//!   "stepper": { "rtol": 1e-8, "atol": 1e-14, "min_step": 1e-12, "max_substeps": 100000 },
//!   "batch": { "n_pressures": 499, "pressure_step": 5.0, "parallel": false }
//! }
//! ```
//! Missing sections fall back to the defaults above.
//!
//! ## Usage
//! ```rust, ignore
//! let config = StarConfig::load("star_config.json")?; // defaults if the file is absent
//! let pressures = config.central_pressures();         // 499 values in km^-2
//! ```
use crate::star_error::StarError;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// MeV/fm^3 -> km^-2
pub const MEV_FM3_TO_KM2: f64 = 1.3152e-6;
/// G*M_sun/c^2 in km
pub const KM_PER_SOLAR_MASS: f64 = 1.47;
/// km/s
pub const LIGHT_SPEED: f64 = 2.99792e5;
/// pressure below which the star is considered to have reached vacuum, km^-2
pub const SURFACE_PRESSURE: f64 = 1e-10;

/// Layout of the radial grid: fine steps up to `switch_index`, coarse steps after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// first radius, km (must be > 0: the equations are singular at the origin)
    pub r_start: f64,
    /// step for grid indices 1..switch_index, km
    pub fine_step: f64,
    /// step for grid indices switch_index.., km
    pub coarse_step: f64,
    /// first index reached with a coarse step
    pub switch_index: usize,
    /// total number of grid points
    pub n_points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            r_start: 0.005,
            fine_step: 0.005,
            coarse_step: 0.016,
            switch_index: 4001,
            n_points: 13900,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), StarError> {
        if !(self.r_start > 0.0) || !self.r_start.is_finite() {
            return Err(StarError::InvalidGrid(format!(
                "grid must start at a positive radius, got {}",
                self.r_start
            )));
        }
        if !(self.fine_step > 0.0) || !(self.coarse_step > 0.0) {
            return Err(StarError::InvalidGrid(format!(
                "grid steps must be positive, got fine = {}, coarse = {}",
                self.fine_step, self.coarse_step
            )));
        }
        if !self.fine_step.is_finite() || !self.coarse_step.is_finite() {
            return Err(StarError::InvalidGrid("grid steps must be finite".to_string()));
        }
        if self.n_points < 2 {
            return Err(StarError::InvalidGrid(format!(
                "grid needs at least 2 points, got {}",
                self.n_points
            )));
        }
        if self.switch_index == 0 || self.switch_index > self.n_points {
            return Err(StarError::InvalidGrid(format!(
                "switch index {} must lie in 1..={}",
                self.switch_index, self.n_points
            )));
        }
        Ok(())
    }
}

/// Bisection parameters of the shooting method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingConfig {
    /// initial lower bound of the central scalar field
    pub phi_lower: f64,
    /// initial upper bound of the central scalar field
    pub phi_upper: f64,
    /// |phi| at the end of the grid accepted as "decayed"
    pub precision: f64,
    pub max_iter: usize,
    /// a trial is stopped once |phi| exceeds this value
    pub phi_runaway: f64,
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            phi_lower: 0.0,
            phi_upper: 1.0,
            precision: 5e-4,
            max_iter: 60,
            phi_runaway: 1e3,
        }
    }
}

/// Tolerances of the adaptive Dormand-Prince stepper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    pub rtol: f64,
    pub atol: f64,
    pub min_step: f64,
    /// substep budget per grid interval
    pub max_substeps: usize,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-14,
            min_step: 1e-12,
            max_substeps: 100_000,
        }
    }
}

/// Central-pressure sweep: P_c(j) = j * pressure_step * pressure_unit, j = 1..=n_pressures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub n_pressures: usize,
    /// MeV/fm^3
    pub pressure_step: f64,
    /// solve the central pressures on the rayon thread pool
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            n_pressures: 499,
            pressure_step: 5.0,
            parallel: false,
        }
    }
}

/// Immutable configuration passed to every component of the computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub pressure_unit: f64,
    pub km_per_solar_mass: f64,
    pub light_speed: f64,
    pub surface_pressure: f64,
    pub grid: GridConfig,
    pub shooting: ShootingConfig,
    pub stepper: StepperConfig,
    pub batch: BatchConfig,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            pressure_unit: MEV_FM3_TO_KM2,
            km_per_solar_mass: KM_PER_SOLAR_MASS,
            light_speed: LIGHT_SPEED,
            surface_pressure: SURFACE_PRESSURE,
            grid: GridConfig::default(),
            shooting: ShootingConfig::default(),
            stepper: StepperConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl StarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file. An absent file gives the defaults;
    /// a present but invalid one is an error.
    pub fn load(config_file: &str) -> Result<Self, StarError> {
        if !Path::new(config_file).exists() {
            info!(
                "configuration file '{}' not found, using default configuration",
                config_file
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(config_file)?;
        let config: StarConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("configuration loaded from '{}'", config_file);
        Ok(config)
    }

    pub fn save(&self, config_file: &str) -> Result<(), StarError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_file, content)?;
        info!("configuration saved to '{}'", config_file);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), StarError> {
        let positive = [
            ("pressure_unit", self.pressure_unit),
            ("km_per_solar_mass", self.km_per_solar_mass),
            ("light_speed", self.light_speed),
            ("surface_pressure", self.surface_pressure),
            ("shooting.precision", self.shooting.precision),
            ("shooting.phi_runaway", self.shooting.phi_runaway),
            ("stepper.rtol", self.stepper.rtol),
            ("stepper.atol", self.stepper.atol),
            ("stepper.min_step", self.stepper.min_step),
            ("batch.pressure_step", self.batch.pressure_step),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(StarError::InvalidConfiguration(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !(self.shooting.phi_lower < self.shooting.phi_upper) {
            return Err(StarError::InvalidConfiguration(format!(
                "empty scalar field bracket [{}, {}]",
                self.shooting.phi_lower, self.shooting.phi_upper
            )));
        }
        if self.shooting.max_iter == 0 {
            return Err(StarError::InvalidConfiguration(
                "shooting.max_iter must be at least 1".to_string(),
            ));
        }
        if self.stepper.max_substeps == 0 {
            return Err(StarError::InvalidConfiguration(
                "stepper.max_substeps must be at least 1".to_string(),
            ));
        }
        self.grid.validate()
    }

    /// Central pressure of the j-th star (1-based), km^-2.
    pub fn central_pressure(&self, j: usize) -> f64 {
        j as f64 * self.batch.pressure_step * self.pressure_unit
    }

    pub fn central_pressures(&self) -> Vec<f64> {
        (1..=self.batch.n_pressures)
            .map(|j| self.central_pressure(j))
            .collect()
    }
}
