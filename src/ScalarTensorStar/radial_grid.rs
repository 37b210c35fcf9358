use crate::star_config::GridConfig;
use crate::star_error::StarError;

/// Immutable, strictly increasing set of radii (km) on which trajectories are reported.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGrid {
    radii: Vec<f64>,
}

impl RadialGrid {
    /// Two-step grid: r_i = r_start + i*fine_step up to `switch_index - 1`, then coarse steps.
    /// Each radius is computed in closed form so rounding does not accumulate.
    pub fn build(config: &GridConfig) -> Result<Self, StarError> {
        config.validate()?;
        let last_fine = config.switch_index - 1;
        let fine_end = config.r_start + last_fine as f64 * config.fine_step;
        let radii = (0..config.n_points)
            .map(|i| {
                if i <= last_fine {
                    config.r_start + i as f64 * config.fine_step
                } else {
                    fine_end + (i - last_fine) as f64 * config.coarse_step
                }
            })
            .collect();
        Self::from_radii(radii)
    }

    /// Grid from explicit radii; they must be positive, finite and strictly increasing.
    pub fn from_radii(radii: Vec<f64>) -> Result<Self, StarError> {
        if radii.len() < 2 {
            return Err(StarError::InvalidGrid(format!(
                "grid needs at least 2 points, got {}",
                radii.len()
            )));
        }
        if !(radii[0] > 0.0) {
            return Err(StarError::InvalidGrid(format!(
                "grid must start at a positive radius, got {}",
                radii[0]
            )));
        }
        if let Some(i) = radii
            .windows(2)
            .position(|w| !(w[1] > w[0]) || !w[1].is_finite())
        {
            return Err(StarError::InvalidGrid(format!(
                "radii not strictly increasing at index {}: {} -> {}",
                i + 1,
                radii[i],
                radii[i + 1]
            )));
        }
        Ok(Self { radii })
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.radii[0]
    }

    pub fn last(&self) -> f64 {
        self.radii[self.radii.len() - 1]
    }

    /// Width of the interval ending at index `i` (i >= 1).
    pub fn step(&self, i: usize) -> f64 {
        self.radii[i] - self.radii[i - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_grid_layout() {
        let grid = RadialGrid::build(&GridConfig::default()).unwrap();
        assert_eq!(grid.len(), 13900);
        assert_relative_eq!(grid.first(), 0.005);
        assert_relative_eq!(grid.radii()[4000], 20.005, epsilon = 1e-12);
        assert_relative_eq!(grid.last(), 178.389, epsilon = 1e-9);
        for i in 1..=4000 {
            assert_relative_eq!(grid.step(i), 0.005, epsilon = 1e-12);
        }
        for i in 4001..grid.len() {
            assert_relative_eq!(grid.step(i), 0.016, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_grid_strictly_increasing() {
        let grid = RadialGrid::build(&GridConfig::default()).unwrap();
        assert!(grid.radii().windows(2).all(|w| w[1] > w[0]));
        assert!(grid.radii().iter().all(|r| *r > 0.0));
    }

    #[test]
    fn test_small_custom_grid() {
        let config = GridConfig {
            r_start: 0.1,
            fine_step: 0.1,
            coarse_step: 1.0,
            switch_index: 3,
            n_points: 5,
        };
        let grid = RadialGrid::build(&config).unwrap();
        let expected = [0.1, 0.2, 0.3, 1.3, 2.3];
        for (r, e) in grid.radii().iter().zip(expected.iter()) {
            assert_relative_eq!(*r, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invalid_grids() {
        let mut config = GridConfig::default();
        config.fine_step = -0.005;
        assert!(matches!(
            RadialGrid::build(&config),
            Err(StarError::InvalidGrid(_))
        ));
        config = GridConfig::default();
        config.n_points = 1;
        assert!(RadialGrid::build(&config).is_err());
        assert!(RadialGrid::from_radii(vec![0.0, 1.0]).is_err());
        assert!(RadialGrid::from_radii(vec![1.0, 1.0, 2.0]).is_err());
        assert!(RadialGrid::from_radii(vec![1.0, 2.0]).is_ok());
    }
}
