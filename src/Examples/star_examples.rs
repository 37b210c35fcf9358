use crate::EOS::eos_interpolation::{EosTable, EquationOfState, Polytrope};
use crate::ScalarTensorStar::batch_driver::BatchDriver;
use crate::Utils::plot_results::{plot_sequence, plot_trajectory};
use crate::Utils::save_results::{
    print_sequence_table, save_charge_radius, save_mass_radius, save_trajectory,
};
use crate::star_config::StarConfig;
use crate::star_error::StarError;
use log::error;

/// Gamma = 2 polytrope eps = sqrt(P/K), K = 100/600^2 (MeV/fm^3), tabulated like a real EOS file
pub fn demo_polytrope_table(config: &StarConfig) -> Result<EquationOfState, StarError> {
    let poly = Polytrope::new(100.0 / 600.0f64.powi(2), 2.0)?;
    let rows = poly.sample(1e-4, 5000.0, 200)?;
    Ok(EquationOfState::from(EosTable::from_raw(
        rows,
        config.pressure_unit,
    )?))
}

pub fn star_examples(task: usize) {
    let result = match task {
        0 => single_star(),
        1 => short_sequence(),
        2 => full_sequence(),
        _ => {
            println!("no example with number {}", task);
            Ok(())
        }
    };
    if let Err(e) = result {
        error!("example {} failed: {}", task, e);
    }
}

// ONE STAR: trajectory of the 20th star of the default sweep
fn single_star() -> Result<(), StarError> {
    let config = StarConfig::default();
    let eos = demo_polytrope_table(&config)?;
    let driver = BatchDriver::new(&eos, &config)?;
    let central_pressure = config.central_pressure(20);
    let outcome = driver.solve_outcome(central_pressure)?;
    let record = driver.record_from(&outcome)?;
    println!(
        "P_c = {:e} km^-2: phi_c = {:.8}, R = {:.4} km, M = {:.5} M_sun, charge = {:e}, {} iterations, converged: {}",
        central_pressure,
        record.phi_trial,
        record.radius,
        record.mass,
        record.scalar_charge,
        record.iterations,
        record.converged
    );
    save_trajectory(&outcome.trajectory, driver.grid(), "polytrope_star_trajectory.txt")?;
    plot_trajectory(&outcome.trajectory, driver.grid())
}

// SHORT SEQUENCE: first ten central pressures, parallel
fn short_sequence() -> Result<(), StarError> {
    let mut config = StarConfig::default();
    config.batch.n_pressures = 10;
    config.batch.parallel = true;
    let eos = demo_polytrope_table(&config)?;
    let driver = BatchDriver::new(&eos, &config)?;
    let sequence = driver.run();
    print_sequence_table(&sequence);
    save_mass_radius(&sequence, "polytrope_mass_radius.txt")?;
    save_charge_radius(&sequence, "polytrope_charge_radius.txt")?;
    Ok(())
}

// FULL SEQUENCE: the default 499 central pressures with plots
fn full_sequence() -> Result<(), StarError> {
    let mut config = StarConfig::default();
    config.batch.parallel = true;
    let eos = demo_polytrope_table(&config)?;
    let driver = BatchDriver::new(&eos, &config)?;
    let sequence = driver.run();
    print_sequence_table(&sequence);
    save_mass_radius(&sequence, "polytrope_mass_radius.txt")?;
    save_charge_radius(&sequence, "polytrope_charge_radius.txt")?;
    plot_sequence(&sequence)
}
