//! # Equation of State Module
//!
//! Pressure -> energy density maps used inside the stellar-structure integrator.
//!
//! ## Units
//! Tables are stored in MeV/fm³ and converted on load into geometrised units (km⁻²) with the
//! multiplicative constant 1.3152e-6, so that pressure and energy density enter the field
//! equations directly.
//!
//! ## Contract
//! Every source implements [`eos_interpolation::PressureToDensity`] and must be
//! - monotone non-decreasing in pressure,
//! - finite for every non-negative pressure the integrator can produce.
//!
//! The integrator itself never asks for the density at P ≤ 0: the vacuum outside the star
//! has zero energy density by construction.
//!
//! ## Sources
//! - [`eos_interpolation::EosTable`]: piecewise linear interpolation of a sorted table, linear
//!   continuation above the table, fixed density/pressure ratio below it.
//! - [`eos_interpolation::Polytrope`]: analytic ε = (P/K)^(1/Γ), also used to generate test
//!   and demo tables.
//!
//! ## File format
//! Two whitespace separated columns, pressure and energy density in MeV/fm³, one row per
//! line; blank lines and `#` comments are skipped (see [`eos_loader`]).
pub mod eos_interpolation;
pub mod eos_loader;
mod eos_tests;
