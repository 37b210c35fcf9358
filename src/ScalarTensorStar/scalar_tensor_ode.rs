//! Field equations of a static, spherically symmetric star coupled to a massive scalar field
//! (Einstein frame), written as a first order system in the radius.
use crate::EOS::eos_interpolation::PressureToDensity;
use crate::ScalarTensorStar::ode_stepper::OdeSystem;
use nalgebra::Vector5;
use std::f64::consts::PI;

/// metric potential, g_rr = e^{2 lambda}
pub const LAMBDA: usize = 0;
/// metric potential, g_tt = -e^{2 nu}
pub const NU: usize = 1;
pub const PRESSURE: usize = 2;
/// d(phi)/dr
pub const SCALAR_GRADIENT: usize = 3;
pub const SCALAR_FIELD: usize = 4;

/// (lambda, nu, P, g, phi)
pub type StarState = Vector5<f64>;

/// Conformal factor Omega = exp(phi/sqrt(3)).
pub fn conformal_factor(phi: f64) -> f64 {
    (phi / 3f64.sqrt()).exp()
}

/// V(phi) = (1 - Omega^-2)^2 / 40
pub fn potential(phi: f64) -> f64 {
    let w = 1.0 - conformal_factor(phi).powi(-2);
    w * w / 40.0
}

/// dV/dphi = (1 - Omega^-2) Omega^-2 / (10 sqrt(3))
pub fn potential_derivative(phi: f64) -> f64 {
    let inv2 = conformal_factor(phi).powi(-2);
    (1.0 - inv2) * inv2 / (3f64.sqrt() * 10.0)
}

/// State at the first grid point: flat metric normalisation, regular scalar field.
pub fn initial_state(central_pressure: f64, phi_trial: f64) -> StarState {
    Vector5::new(0.0, 1.0, central_pressure, 0.0, phi_trial)
}

pub struct ScalarTensorSystem<'a, E: PressureToDensity> {
    eos: &'a E,
}

impl<'a, E: PressureToDensity> ScalarTensorSystem<'a, E> {
    pub fn new(eos: &'a E) -> Self {
        Self { eos }
    }

    /// Energy density seen by the field equations; zero outside the star.
    pub fn energy_density(&self, pressure: f64) -> f64 {
        if pressure > 0.0 {
            self.eos.energy_density(pressure)
        } else {
            0.0
        }
    }
}

impl<'a, E: PressureToDensity> OdeSystem<5> for ScalarTensorSystem<'a, E> {
    fn rhs(&self, r: f64, y: &StarState) -> StarState {
        let (lambda, pressure, g, phi) = (y[LAMBDA], y[PRESSURE], y[SCALAR_GRADIENT], y[SCALAR_FIELD]);
        let edens = self.energy_density(pressure);
        let sqrt3 = 3f64.sqrt();
        let omega_m4 = conformal_factor(phi).powi(-4);
        let e2l = (2.0 * lambda).exp();
        let v = potential(phi);
        let der_v = potential_derivative(phi);
        let kinetic = r * g * g / 2.0;

        let d_lambda = 4.0 * PI * r * edens * omega_m4 * e2l + (1.0 - e2l) / (2.0 * r) + kinetic
            + r * e2l * v / 4.0;
        let d_nu = 4.0 * PI * r * pressure * omega_m4 * e2l + (e2l - 1.0) / (2.0 * r) + kinetic
            - r * e2l * v / 4.0;
        let d_pressure = -(edens + pressure) * (d_nu - g / sqrt3);
        let d_phi = g;
        let d_g = -(d_nu - d_lambda + 2.0 / r) * g
            + 4.0 * PI * e2l * omega_m4 * (3.0 * pressure - edens) / sqrt3
            + e2l * der_v / 4.0;

        Vector5::new(d_lambda, d_nu, d_pressure, d_g, d_phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EOS::eos_interpolation::Polytrope;
    use approx::assert_relative_eq;

    #[test]
    fn test_potential_vanishes_at_zero_field() {
        assert_relative_eq!(conformal_factor(0.0), 1.0);
        assert_eq!(potential(0.0), 0.0);
        assert_eq!(potential_derivative(0.0), 0.0);
        assert!(potential(0.3) > 0.0);
        assert!(potential_derivative(0.3) > 0.0);
        assert!(potential_derivative(-0.3) < 0.0);
    }

    #[test]
    fn test_potential_derivative_is_consistent() {
        // d/dphi (1 - Omega^-2) = 2 Omega^-2 / sqrt(3)
        for &phi in &[-0.5, 0.1, 0.4, 1.0] {
            let h = 1e-6;
            let numeric = (potential(phi + h) - potential(phi - h)) / (2.0 * h);
            let w = 1.0 - conformal_factor(phi).powi(-2);
            let analytic = 2.0 * w * 2.0 * conformal_factor(phi).powi(-2) / 3f64.sqrt() / 40.0;
            assert_relative_eq!(numeric, analytic, max_relative = 1e-6);
            assert_relative_eq!(analytic, potential_derivative(phi), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_vacuum_flat_space_is_static() {
        let eos = Polytrope::new(100.0, 2.0).unwrap();
        let system = ScalarTensorSystem::new(&eos);
        let y = Vector5::new(0.0, 1.0, 0.0, 0.0, 0.0);
        let dy = system.rhs(10.0, &y);
        for i in 0..5 {
            assert_eq!(dy[i], 0.0);
        }
    }

    #[test]
    fn test_derivatives_inside_matter() {
        let eos = Polytrope::new(100.0, 2.0).unwrap();
        let system = ScalarTensorSystem::new(&eos);
        let p = 1e-4;
        let y = initial_state(p, 0.0);
        let r = 0.005;
        let dy = system.rhs(r, &y);
        let edens = eos.energy_density(p);
        assert_relative_eq!(dy[LAMBDA], 4.0 * PI * r * edens, max_relative = 1e-12);
        assert_relative_eq!(dy[NU], 4.0 * PI * r * p, max_relative = 1e-12);
        assert_relative_eq!(dy[PRESSURE], -(edens + p) * 4.0 * PI * r * p, max_relative = 1e-12);
        assert_eq!(dy[SCALAR_FIELD], 0.0);
        // source term drives g away from zero with the sign of 3P - eps
        assert_relative_eq!(
            dy[SCALAR_GRADIENT],
            4.0 * PI * (3.0 * p - edens) / 3f64.sqrt(),
            max_relative = 1e-12
        );
        assert!(dy[PRESSURE] < 0.0);
    }

    #[test]
    fn test_zero_pressure_means_zero_density() {
        let eos = Polytrope::new(100.0, 2.0).unwrap();
        let system = ScalarTensorSystem::new(&eos);
        assert_eq!(system.energy_density(0.0), 0.0);
        assert_eq!(system.energy_density(-1e-12), 0.0);
        assert!(system.energy_density(1e-6) > 0.0);
    }

    #[test]
    fn test_initial_state_layout() {
        let y = initial_state(2.0, 0.25);
        assert_eq!(y[LAMBDA], 0.0);
        assert_eq!(y[NU], 1.0);
        assert_eq!(y[PRESSURE], 2.0);
        assert_eq!(y[SCALAR_GRADIENT], 0.0);
        assert_eq!(y[SCALAR_FIELD], 0.25);
    }
}
