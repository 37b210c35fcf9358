use crate::EOS::eos_interpolation::{EosTable, PressureToDensity};
use crate::star_error::StarError;
use log::{error, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parses the two-column (pressure, energy density) text format. Values are multiplied by
/// `pressure_unit` on the way in. Blank lines and lines starting with `#` are skipped,
/// extra columns after the second one are ignored.
pub fn parse_eos_table(content: &str, pressure_unit: f64) -> Result<EosTable, StarError> {
    let mut rows: Vec<(f64, f64)> = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line_number = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut columns = trimmed.split_whitespace();
        let pressure = parse_column(columns.next(), line_number, "pressure")?;
        let density = parse_column(columns.next(), line_number, "energy density")?;
        rows.push((pressure, density));
    }
    EosTable::from_raw(rows, pressure_unit)
}

fn parse_column(column: Option<&str>, line: usize, name: &str) -> Result<f64, StarError> {
    let column = column.ok_or_else(|| StarError::EosFormat {
        line,
        message: format!("missing {} column", name),
    })?;
    column.parse::<f64>().map_err(|e| StarError::EosFormat {
        line,
        message: format!("cannot parse {} '{}': {}", name, column, e),
    })
}

/// Reads an EOS file (MeV/fm^3) into a table in internal units.
pub fn load_eos_table(file_name: &str, pressure_unit: f64) -> Result<EosTable, StarError> {
    let path = Path::new(file_name);
    if !path.exists() {
        error!("EOS file '{}' does not exist", file_name);
        return Err(StarError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("EOS file '{}' does not exist", file_name),
        )));
    }
    let reader = BufReader::new(File::open(path)?);
    let mut content = String::new();
    for line in reader.lines() {
        content.push_str(&line?);
        content.push('\n');
    }
    let table = parse_eos_table(&content, pressure_unit).map_err(|e| {
        error!("failed to load EOS file '{}': {}", file_name, e);
        e
    })?;
    let (p_min, p_max) = table.pressure_range();
    info!(
        "EOS '{}' loaded: {} rows, pressure range [{:e}, {:e}] km^-2, density at top {:e}",
        file_name,
        table.len(),
        p_min,
        p_max,
        table.energy_density(p_max)
    );
    Ok(table)
}
