use crate::star_error::StarError;
use enum_dispatch::enum_dispatch;

/// Capability of mapping pressure to energy density (both in km^-2).
///
/// Implementors must be monotone non-decreasing in pressure and finite for P >= 0.
#[enum_dispatch]
pub trait PressureToDensity {
    fn energy_density(&self, pressure: f64) -> f64;
}

/// Tabulated equation of state, sorted by strictly increasing pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct EosTable {
    pressures: Vec<f64>,
    densities: Vec<f64>,
    /// lowest density / lowest pressure, slope used below the table
    low_pressure_ratio: f64,
}

impl EosTable {
    /// Builds a table from (pressure, energy density) rows already in internal units.
    /// Rows are sorted by pressure; the table is rejected if it has fewer than two rows,
    /// repeated pressures, non-finite entries, a non-positive lowest pressure or a density
    /// that decreases with pressure.
    pub fn new(mut rows: Vec<(f64, f64)>) -> Result<Self, StarError> {
        if rows.len() < 2 {
            return Err(StarError::InvalidEos(format!(
                "at least 2 rows are required, got {}",
                rows.len()
            )));
        }
        if let Some((p, e)) = rows
            .iter()
            .find(|(p, e)| !p.is_finite() || !e.is_finite())
        {
            return Err(StarError::InvalidEos(format!(
                "non-finite entry ({}, {})",
                p, e
            )));
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        for pair in rows.windows(2) {
            let (p0, e0) = pair[0];
            let (p1, e1) = pair[1];
            if p1 <= p0 {
                return Err(StarError::InvalidEos(format!("repeated pressure {}", p0)));
            }
            if e1 < e0 {
                return Err(StarError::InvalidEos(format!(
                    "energy density decreases from {} to {} between pressures {} and {}",
                    e0, e1, p0, p1
                )));
            }
        }
        let (p_low, e_low) = rows[0];
        if p_low <= 0.0 {
            return Err(StarError::InvalidEos(format!(
                "lowest pressure must be positive, got {}",
                p_low
            )));
        }
        if e_low < 0.0 {
            return Err(StarError::InvalidEos(format!(
                "energy density must be non-negative, got {}",
                e_low
            )));
        }

        let (pressures, densities): (Vec<f64>, Vec<f64>) = rows.into_iter().unzip();
        Ok(Self {
            low_pressure_ratio: e_low / p_low,
            pressures,
            densities,
        })
    }

    /// Builds a table from raw rows (e.g. MeV/fm^3) multiplying both columns by `unit`.
    pub fn from_raw(rows: Vec<(f64, f64)>, unit: f64) -> Result<Self, StarError> {
        if !(unit > 0.0) || !unit.is_finite() {
            return Err(StarError::InvalidEos(format!(
                "unit conversion factor must be positive, got {}",
                unit
            )));
        }
        Self::new(
            rows.into_iter()
                .map(|(p, e)| (p * unit, e * unit))
                .collect(),
        )
    }

    pub fn low_pressure_ratio(&self) -> f64 {
        self.low_pressure_ratio
    }

    pub fn pressure_range(&self) -> (f64, f64) {
        (self.pressures[0], self.pressures[self.pressures.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.pressures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressures.is_empty()
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    /// index i of the segment [p_i, p_{i+1}] used for `pressure`; the last segment is
    /// reused above the table
    fn segment(&self, pressure: f64) -> usize {
        let upper = self.pressures.partition_point(|&p| p <= pressure);
        upper.saturating_sub(1).min(self.pressures.len() - 2)
    }
}

impl PressureToDensity for EosTable {
    fn energy_density(&self, pressure: f64) -> f64 {
        if pressure <= self.pressures[0] {
            return self.low_pressure_ratio * pressure;
        }
        let i = self.segment(pressure);
        let (p0, p1) = (self.pressures[i], self.pressures[i + 1]);
        let (e0, e1) = (self.densities[i], self.densities[i + 1]);
        e0 + (pressure - p0) * (e1 - e0) / (p1 - p0)
    }
}

/// Analytic polytrope ε = (P/K)^(1/Γ).
#[derive(Debug, Clone, PartialEq)]
pub struct Polytrope {
    k: f64,
    gamma: f64,
}

impl Polytrope {
    pub fn new(k: f64, gamma: f64) -> Result<Self, StarError> {
        if !(k > 0.0) || !k.is_finite() {
            return Err(StarError::InvalidEos(format!(
                "polytropic constant must be positive, got {}",
                k
            )));
        }
        if !(gamma > 1.0) || !gamma.is_finite() {
            return Err(StarError::InvalidEos(format!(
                "polytropic exponent must exceed 1, got {}",
                gamma
            )));
        }
        Ok(Self { k, gamma })
    }

    /// Polytrope passing through (pressure, energy_density).
    pub fn through_point(pressure: f64, energy_density: f64, gamma: f64) -> Result<Self, StarError> {
        if !(pressure > 0.0) || !(energy_density > 0.0) {
            return Err(StarError::InvalidEos(format!(
                "reference point ({}, {}) must be positive",
                pressure, energy_density
            )));
        }
        Self::new(pressure / energy_density.powf(gamma), gamma)
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// `n_rows` (pressure, energy density) rows, log-spaced in pressure over [p_min, p_max].
    pub fn sample(&self, p_min: f64, p_max: f64, n_rows: usize) -> Result<Vec<(f64, f64)>, StarError> {
        if !(p_min > 0.0) || !(p_max > p_min) || n_rows < 2 {
            return Err(StarError::InvalidEos(format!(
                "cannot sample {} rows over [{}, {}]",
                n_rows, p_min, p_max
            )));
        }
        let (log_min, log_max) = (p_min.log10(), p_max.log10());
        let step = (log_max - log_min) / (n_rows - 1) as f64;
        Ok((0..n_rows)
            .map(|i| {
                let p = 10f64.powf(log_min + i as f64 * step);
                (p, self.energy_density(p))
            })
            .collect())
    }
}

impl PressureToDensity for Polytrope {
    fn energy_density(&self, pressure: f64) -> f64 {
        if pressure <= 0.0 {
            return 0.0;
        }
        (pressure / self.k).powf(1.0 / self.gamma)
    }
}

/// Any equation of state the integrator can use.
#[enum_dispatch(PressureToDensity)]
#[derive(Debug, Clone, PartialEq)]
pub enum EquationOfState {
    Tabulated(EosTable),
    Polytropic(Polytrope),
}
