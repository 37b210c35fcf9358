//! Output helpers: result files, tables, plots and logger setup.
pub mod logger_setup;
pub mod plot_results;
pub mod save_results;
