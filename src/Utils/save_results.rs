use crate::ScalarTensorStar::batch_driver::{ResultRecord, StarSequence};
use crate::ScalarTensorStar::radial_grid::RadialGrid;
use crate::ScalarTensorStar::shooting_solver::Trajectory;
use crate::star_error::StarError;
use log::{info, warn};
use prettytable::{Table, row};
use std::fs::File;
use std::io::{BufWriter, Write};

fn write_pairs(
    sequence: &StarSequence,
    file_name: &str,
    value: impl Fn(&ResultRecord) -> f64,
) -> Result<usize, StarError> {
    let mut writer = BufWriter::new(File::create(file_name)?);
    let mut written = 0;
    for point in &sequence.points {
        match &point.result {
            Ok(record) => {
                writeln!(writer, "{} {}", record.radius, value(record))?;
                written += 1;
            }
            Err(e) => warn!(
                "'{}': no line for star {} (P_c = {:e}): {}",
                file_name, point.index, point.central_pressure, e
            ),
        }
    }
    writer.flush()?;
    info!("{} lines written to '{}'", written, file_name);
    Ok(written)
}

/// `<radius> <mass>` per successful star, in central-pressure order.
pub fn save_mass_radius(sequence: &StarSequence, file_name: &str) -> Result<usize, StarError> {
    write_pairs(sequence, file_name, |r| r.mass)
}

/// `<radius> <scalar charge>` per successful star, in central-pressure order.
pub fn save_charge_radius(sequence: &StarSequence, file_name: &str) -> Result<usize, StarError> {
    write_pairs(sequence, file_name, |r| r.scalar_charge)
}

/// Whitespace table `r lambda nu P g phi` of one trajectory.
pub fn save_trajectory(
    trajectory: &Trajectory,
    grid: &RadialGrid,
    file_name: &str,
) -> Result<(), StarError> {
    let mut writer = BufWriter::new(File::create(file_name)?);
    writeln!(writer, "# r lambda nu P g phi")?;
    for (r, y) in grid.radii().iter().zip(trajectory.states.iter()) {
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            r, y[0], y[1], y[2], y[3], y[4]
        )?;
    }
    writer.flush()?;
    info!(
        "trajectory with {} points written to '{}'",
        trajectory.len(),
        file_name
    );
    Ok(())
}

pub fn sequence_table(sequence: &StarSequence) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "j",
        "P_c, km^-2",
        "R, km",
        "M, M_sun",
        "scalar charge",
        "iterations",
        "status"
    ]);
    for point in &sequence.points {
        match &point.result {
            Ok(record) => table.add_row(row![
                point.index,
                format!("{:.4e}", point.central_pressure),
                format!("{:.4}", record.radius),
                format!("{:.5}", record.mass),
                format!("{:.4e}", record.scalar_charge),
                record.iterations,
                if record.converged {
                    "converged".to_string()
                } else {
                    format!("not converged, error {:.2e}", record.error)
                }
            ]),
            Err(e) => table.add_row(row![
                point.index,
                format!("{:.4e}", point.central_pressure),
                "-",
                "-",
                "-",
                "-",
                e.to_string()
            ]),
        };
    }
    table
}

pub fn print_sequence_table(sequence: &StarSequence) {
    println!("\n=== STELLAR SEQUENCE ===");
    sequence_table(sequence).printstd();
    if let Some(heaviest) = sequence.maximum_mass() {
        println!(
            "maximum mass {:.5} M_sun at R = {:.4} km",
            heaviest.mass, heaviest.radius
        );
    }
}
