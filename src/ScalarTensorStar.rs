//! # Scalar-Tensor Star Module
//!
//! Static, spherically symmetric compact stars in a scalar-tensor theory of gravity (the
//! Einstein-frame form of an R + R² type model). For every central pressure the structure
//! equations are integrated outwards on a fixed radial grid and the unknown central value of
//! the scalar field is found by a shooting method.
//!
//! ## Field equations
//! State y = (λ, ν, P, g, φ) with g = dφ/dr, Ω = exp(φ/√3), V = (1 − Ω⁻²)²/40,
//! V' = (1 − Ω⁻²)Ω⁻²/(10√3) and ε = ε(P) from the equation of state (zero for P ≤ 0):
//! ```text
//! λ' = 4π r ε Ω⁻⁴ e^{2λ} + (1 − e^{2λ})/(2r) + r g²/2 + r e^{2λ} V/4
//! ν' = 4π r P Ω⁻⁴ e^{2λ} + (e^{2λ} − 1)/(2r) + r g²/2 − r e^{2λ} V/4
//! P' = −(ε + P)(ν' − g/√3)
//! φ' = g
//! g' = −(ν' − λ' + 2/r) g + 4π e^{2λ} Ω⁻⁴ (3P − ε)/√3 + e^{2λ} V'/4
//! ```
//! Initial state at the first grid radius: (0, 1, P_c, 0, φ_trial).
//!
//! ## Pipeline
//! 1. [`radial_grid::RadialGrid`] - fine grid near the centre, coarse grid outside.
//! 2. [`scalar_tensor_ode::ScalarTensorSystem`] - right-hand side above, generic over the EOS.
//! 3. [`ode_stepper::DormandPrince45`] - adaptive integration between grid points.
//! 4. [`shooting_solver::ShootingSolver`] - bisection on φ_trial until φ has decayed at the
//!    end of the grid.
//! 5. [`observables`] - surface radius, gravitational mass and scalar charge.
//! 6. [`batch_driver::BatchDriver`] - sweep over central pressures, optionally on rayon.
//!
//! ## Units
//! Radii in km, pressure and energy density in km⁻², masses in solar masses.
pub mod batch_driver;
pub mod observables;
pub mod ode_stepper;
pub mod radial_grid;
pub mod scalar_tensor_ode;
pub mod shooting_solver;
