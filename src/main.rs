use ScalarStar::Utils::logger_setup::init_logging;
use ScalarStar::cli::cli_main::run_interactive_menu;
use simplelog::LevelFilter;

pub fn main() {
    if let Err(e) = init_logging(LevelFilter::Info, Some("scalar_star.log")) {
        eprintln!("logging disabled: {}", e);
    }
    run_interactive_menu();
}
