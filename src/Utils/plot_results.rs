use crate::ScalarTensorStar::batch_driver::StarSequence;
use crate::ScalarTensorStar::radial_grid::RadialGrid;
use crate::ScalarTensorStar::scalar_tensor_ode::{PRESSURE, SCALAR_FIELD, SCALAR_GRADIENT};
use crate::ScalarTensorStar::shooting_solver::Trajectory;
use crate::star_error::StarError;
use RustedSciThe::Utils::plots::plots;
use log::info;
use nalgebra::{DMatrix, DVector};

/// Mass and scalar charge against the surface radius, one PNG per quantity.
pub fn plot_sequence(sequence: &StarSequence) -> Result<(), StarError> {
    let records = sequence.records();
    if records.is_empty() {
        return Err(StarError::EmptyResult(
            "no successful stars to plot".to_string(),
        ));
    }
    let radii = DVector::from_vec(sequence.radii());
    let masses = DMatrix::from_column_slice(records.len(), 1, &sequence.masses());
    let charges = DMatrix::from_column_slice(records.len(), 1, &sequence.charges());
    plots("R".to_owned(), vec!["M".to_owned()], radii.clone(), masses);
    plots("R".to_owned(), vec!["scalar_charge".to_owned()], radii, charges);
    info!("mass-radius and charge-radius plots rendered for {} stars", records.len());
    Ok(())
}

/// Pressure, scalar field and its gradient of one star against the radius.
pub fn plot_trajectory(trajectory: &Trajectory, grid: &RadialGrid) -> Result<(), StarError> {
    let n = trajectory.len();
    if n < 2 {
        return Err(StarError::EmptyResult(
            "trajectory too short to plot".to_string(),
        ));
    }
    let radii = DVector::from_column_slice(&grid.radii()[..n]);
    let columns = [PRESSURE, SCALAR_GRADIENT, SCALAR_FIELD];
    let y = DMatrix::from_fn(n, columns.len(), |i, j| trajectory.states[i][columns[j]]);
    plots(
        "r".to_owned(),
        vec!["P".to_owned(), "g".to_owned(), "phi".to_owned()],
        radii,
        y,
    );
    Ok(())
}
