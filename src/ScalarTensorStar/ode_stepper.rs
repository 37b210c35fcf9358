//! Adaptive Dormand-Prince 5(4) integrator working on a prescribed output mesh.
//!
//! Every mesh interval is covered with as many internal substeps as the error control asks
//! for; the last accepted step size is carried on to the next interval. Divergence (non-finite
//! state, step underflow, exhausted substep budget) is reported as an error together with
//! the states reached so far.
use crate::star_config::StepperConfig;
use crate::star_error::StarError;
use nalgebra::SVector;

/// Right-hand side of y' = f(x, y) with N state variables.
pub trait OdeSystem<const N: usize> {
    fn rhs(&self, x: f64, y: &SVector<f64, N>) -> SVector<f64, N>;
}

// Dormand-Prince tableau
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
// fifth order weights (also the last row of the tableau)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;
// fifth minus fourth order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;
/// shrink factor applied after a non-finite trial step
const NON_FINITE_FACTOR: f64 = 0.25;

/// States on the mesh, possibly truncated.
#[derive(Debug)]
pub struct MeshSolution<const N: usize> {
    /// one state per mesh point reached, starting with the initial state
    pub states: Vec<SVector<f64, N>>,
    /// why the integration stopped before the end of the mesh
    pub divergence: Option<StarError>,
}

impl<const N: usize> MeshSolution<N> {
    pub fn is_complete(&self) -> bool {
        self.divergence.is_none()
    }

    pub fn last_state(&self) -> Option<&SVector<f64, N>> {
        self.states.last()
    }
}

#[derive(Debug, Clone)]
pub struct DormandPrince45 {
    pub rtol: f64,
    pub atol: f64,
    pub min_step: f64,
    pub max_substeps: usize,
}

impl DormandPrince45 {
    pub fn new(config: &StepperConfig) -> Self {
        Self {
            rtol: config.rtol,
            atol: config.atol,
            min_step: config.min_step,
            max_substeps: config.max_substeps,
        }
    }

    /// One trial step: fifth order solution and the RMS of the scaled error estimate.
    fn try_step<const N: usize, S: OdeSystem<N>>(
        &self,
        system: &S,
        x: f64,
        y: &SVector<f64, N>,
        h: f64,
    ) -> (SVector<f64, N>, f64) {
        let k1 = system.rhs(x, y);
        let k2 = system.rhs(x + C2 * h, &(y + k1 * (h * A21)));
        let k3 = system.rhs(x + C3 * h, &(y + (k1 * A31 + k2 * A32) * h));
        let k4 = system.rhs(x + C4 * h, &(y + (k1 * A41 + k2 * A42 + k3 * A43) * h));
        let k5 = system.rhs(
            x + C5 * h,
            &(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h),
        );
        let k6 = system.rhs(
            x + h,
            &(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h),
        );
        let y_new = y + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
        let k7 = system.rhs(x + h, &y_new);
        let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;

        let mut sum = 0.0;
        for i in 0..N {
            let scale = self.atol + self.rtol * y[i].abs().max(y_new[i].abs());
            let ratio = err[i] / scale;
            sum += ratio * ratio;
        }
        (y_new, (sum / N as f64).sqrt())
    }

    /// Advances `y` from `x0` to `x1` (x1 > x0). `h` is the suggested step on entry and the
    /// step to try next on exit.
    pub fn advance<const N: usize, S: OdeSystem<N>>(
        &self,
        system: &S,
        x0: f64,
        x1: f64,
        y0: &SVector<f64, N>,
        h: &mut f64,
    ) -> Result<SVector<f64, N>, StarError> {
        let mut x = x0;
        let mut y = *y0;
        if !(*h > 0.0) || !h.is_finite() {
            *h = x1 - x0;
        }
        let mut substeps = 0;
        while x < x1 {
            if substeps >= self.max_substeps {
                return Err(StarError::IntegrationDiverged {
                    radius: x,
                    reason: format!("{} substeps used within one grid interval", substeps),
                });
            }
            substeps += 1;

            let last = x + *h >= x1;
            let h_try = if last { x1 - x } else { *h };
            let (y_new, err_norm) = self.try_step(system, x, &y, h_try);

            if !err_norm.is_finite() || y_new.iter().any(|v| !v.is_finite()) {
                *h = h_try * NON_FINITE_FACTOR;
                if *h < self.min_step {
                    return Err(StarError::IntegrationDiverged {
                        radius: x,
                        reason: "non-finite state".to_string(),
                    });
                }
                continue;
            }

            if err_norm <= 1.0 {
                let factor = if err_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * err_norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                x = if last { x1 } else { x + h_try };
                y = y_new;
                // a step clipped to the interval end does not shrink the carried step
                *h = if last && h_try < *h {
                    h.max(h_try * factor)
                } else {
                    h_try * factor
                };
            } else {
                let factor = (SAFETY * err_norm.powf(-0.2)).max(MIN_FACTOR);
                *h = h_try * factor;
                if *h < self.min_step {
                    return Err(StarError::IntegrationDiverged {
                        radius: x,
                        reason: format!("step size {:e} below minimum {:e}", *h, self.min_step),
                    });
                }
            }
        }
        Ok(y)
    }

    /// Integrates over every mesh interval. `guard` is consulted at each mesh point and can
    /// stop the integration by returning a reason.
    pub fn integrate_on_mesh<const N: usize, S, G>(
        &self,
        system: &S,
        mesh: &[f64],
        y0: SVector<f64, N>,
        guard: G,
    ) -> MeshSolution<N>
    where
        S: OdeSystem<N>,
        G: Fn(f64, &SVector<f64, N>) -> Option<String>,
    {
        let mut states = Vec::with_capacity(mesh.len());
        states.push(y0);
        let mut h = match mesh {
            [a, b, ..] => b - a,
            _ => 0.0,
        };
        let mut y = y0;
        for pair in mesh.windows(2) {
            match self.advance(system, pair[0], pair[1], &y, &mut h) {
                Ok(y_next) => {
                    if let Some(reason) = guard(pair[1], &y_next) {
                        return MeshSolution {
                            states,
                            divergence: Some(StarError::IntegrationDiverged {
                                radius: pair[1],
                                reason,
                            }),
                        };
                    }
                    y = y_next;
                    states.push(y);
                }
                Err(e) => {
                    return MeshSolution {
                        states,
                        divergence: Some(e),
                    };
                }
            }
        }
        MeshSolution {
            states,
            divergence: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Vector1, Vector2};

    struct Decay {
        rate: f64,
    }
    impl OdeSystem<1> for Decay {
        fn rhs(&self, _x: f64, y: &Vector1<f64>) -> Vector1<f64> {
            Vector1::new(-self.rate * y[0])
        }
    }

    struct Oscillator;
    impl OdeSystem<2> for Oscillator {
        fn rhs(&self, _x: f64, y: &Vector2<f64>) -> Vector2<f64> {
            Vector2::new(y[1], -y[0])
        }
    }

    /// y' = y^2, y(0) = 1 blows up at x = 1
    struct BlowUp;
    impl OdeSystem<1> for BlowUp {
        fn rhs(&self, _x: f64, y: &Vector1<f64>) -> Vector1<f64> {
            Vector1::new(y[0] * y[0])
        }
    }

    fn stepper() -> DormandPrince45 {
        DormandPrince45::new(&StepperConfig::default())
    }

    #[test]
    fn test_exponential_decay() {
        let mesh: Vec<f64> = (0..=50).map(|i| i as f64 * 0.1).collect();
        let solution =
            stepper().integrate_on_mesh(&Decay { rate: 1.0 }, &mesh, Vector1::new(1.0), |_, _| None);
        assert!(solution.is_complete());
        assert_eq!(solution.states.len(), mesh.len());
        for (x, y) in mesh.iter().zip(solution.states.iter()) {
            assert_relative_eq!(y[0], (-x).exp(), max_relative = 1e-6);
        }
    }

    #[test]
    fn test_oscillator_period() {
        let two_pi = 2.0 * std::f64::consts::PI;
        let mesh: Vec<f64> = (0..=100).map(|i| i as f64 * two_pi / 100.0).collect();
        let solution =
            stepper().integrate_on_mesh(&Oscillator, &mesh, Vector2::new(1.0, 0.0), |_, _| None);
        assert!(solution.is_complete());
        let last = solution.last_state().unwrap();
        assert_relative_eq!(last[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(last[1], 0.0, epsilon = 1e-6);
        // quarter period
        assert_relative_eq!(solution.states[25][0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(solution.states[25][1], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_step_is_carried_between_intervals() {
        let mut h = 0.0;
        let y = stepper()
            .advance(&Decay { rate: 1.0 }, 0.0, 1.0, &Vector1::new(1.0), &mut h)
            .unwrap();
        assert_relative_eq!(y[0], (-1.0f64).exp(), max_relative = 1e-7);
        assert!(h > 0.0 && h.is_finite());
    }

    #[test]
    fn test_blow_up_is_reported() {
        let mesh = [0.0, 0.5, 0.9, 1.5, 2.0];
        let solution = stepper().integrate_on_mesh(&BlowUp, &mesh, Vector1::new(1.0), |_, _| None);
        assert!(!solution.is_complete());
        // truncated after the last finite mesh point before the singularity
        assert_eq!(solution.states.len(), 3);
        assert_relative_eq!(solution.states[2][0], 10.0, max_relative = 1e-6);
        match solution.divergence {
            Some(StarError::IntegrationDiverged { radius, .. }) => {
                assert!(radius > 0.9 && radius <= 1.0 + 1e-6)
            }
            other => panic!("unexpected divergence {:?}", other),
        }
    }

    #[test]
    fn test_guard_stops_integration() {
        let mesh: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let solution = stepper().integrate_on_mesh(&Decay { rate: -1.0 }, &mesh, Vector1::new(1.0), |_, y| {
            if y[0] > 100.0 {
                Some("runaway".to_string())
            } else {
                None
            }
        });
        // e^4 < 100 < e^5
        assert_eq!(solution.states.len(), 5);
        assert!(matches!(
            solution.divergence,
            Some(StarError::IntegrationDiverged { radius, .. }) if radius == 5.0
        ));
    }

    #[test]
    fn test_substep_budget() {
        let tight = DormandPrince45 {
            max_substeps: 2,
            ..stepper()
        };
        let mut h = 1e-6;
        let result = tight.advance(&Oscillator, 0.0, 10.0, &Vector2::new(1.0, 0.0), &mut h);
        assert!(matches!(result, Err(StarError::IntegrationDiverged { .. })));
    }
}
