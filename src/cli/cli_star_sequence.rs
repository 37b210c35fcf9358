use super::cli_main::DEFAULT_CONFIG_FILE;
use crate::EOS::eos_interpolation::EquationOfState;
use crate::EOS::eos_loader::load_eos_table;
use crate::ScalarTensorStar::batch_driver::BatchDriver;
use crate::Utils::plot_results::{plot_sequence, plot_trajectory};
use crate::Utils::save_results::{
    print_sequence_table, save_charge_radius, save_mass_radius, save_trajectory,
};
use crate::star_config::StarConfig;
use std::io::{self, Write};

pub fn read_line() -> Result<String, String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| format!("Failed to read input: {}", e))?;
    Ok(input.trim().to_string())
}

fn prompt(message: &str) -> Result<String, String> {
    print!("{}", message);
    io::stdout()
        .flush()
        .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    read_line()
}

fn prompt_or_default(message: &str, default: &str) -> Result<String, String> {
    let answer = prompt(&format!("{} [{}]: ", message, default))?;
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer
    })
}

fn prompt_yes(message: &str) -> Result<bool, String> {
    let answer = prompt(&format!("{} (y/n): ", message))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn load_inputs() -> Result<(StarConfig, EquationOfState), String> {
    let config_file = prompt_or_default("Configuration file", DEFAULT_CONFIG_FILE)?;
    let config = StarConfig::load(&config_file).map_err(|e| e.to_string())?;
    let eos_file = prompt("EOS file (pressure, energy density in MeV/fm^3): ")?;
    if eos_file.is_empty() {
        return Err("EOS file name is required".to_string());
    }
    let table = load_eos_table(&eos_file, config.pressure_unit).map_err(|e| e.to_string())?;
    Ok((config, EquationOfState::from(table)))
}

pub fn sequence_menu() {
    println!("\n=== Stellar Sequence ===");
    if let Err(e) = run_sequence() {
        println!("Error: {}", e);
    }
}

fn run_sequence() -> Result<(), String> {
    let (mut config, eos) = load_inputs()?;
    if !config.batch.parallel {
        config.batch.parallel = prompt_yes("Solve the central pressures in parallel?")?;
    }
    let mass_file = prompt_or_default("Mass-radius output file", "mass_radius.txt")?;
    let charge_file = prompt_or_default("Charge-radius output file", "charge_radius.txt")?;

    let driver = BatchDriver::new(&eos, &config).map_err(|e| e.to_string())?;
    println!(
        "Solving {} stars, this may take a while...",
        config.batch.n_pressures
    );
    let sequence = driver.run();
    print_sequence_table(&sequence);
    save_mass_radius(&sequence, &mass_file).map_err(|e| e.to_string())?;
    save_charge_radius(&sequence, &charge_file).map_err(|e| e.to_string())?;
    if prompt_yes("Plot the sequence?")? {
        plot_sequence(&sequence).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn single_star_menu() {
    println!("\n=== Single Star ===");
    if let Err(e) = run_single_star() {
        println!("Error: {}", e);
    }
}

fn run_single_star() -> Result<(), String> {
    let (config, eos) = load_inputs()?;
    let pressure = prompt("Central pressure, MeV/fm^3: ")?
        .parse::<f64>()
        .map_err(|e| format!("Invalid central pressure: {}", e))?;
    let central_pressure = pressure * config.pressure_unit;

    let driver = BatchDriver::new(&eos, &config).map_err(|e| e.to_string())?;
    let outcome = driver
        .solve_outcome(central_pressure)
        .map_err(|e| e.to_string())?;
    println!(
        "phi_c = {:.10} after {} iterations, error {:e}, converged: {}",
        outcome.phi_trial, outcome.iterations, outcome.error, outcome.converged
    );
    match driver.record_from(&outcome) {
        Ok(record) => println!(
            "R = {:.4} km, M = {:.5} M_sun, scalar charge = {:e}",
            record.radius, record.mass, record.scalar_charge
        ),
        Err(e) => println!("No observables: {}", e),
    }
    let trajectory_file = prompt_or_default("Trajectory output file", "star_trajectory.txt")?;
    save_trajectory(&outcome.trajectory, driver.grid(), &trajectory_file)
        .map_err(|e| e.to_string())?;
    if prompt_yes("Plot the trajectory?")? {
        plot_trajectory(&outcome.trajectory, driver.grid()).map_err(|e| e.to_string())?;
    }
    Ok(())
}
