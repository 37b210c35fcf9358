//! Ready-to-run demonstrations on an analytic Γ = 2 polytrope.
pub mod star_examples;
