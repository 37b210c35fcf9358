use super::cli_examples::examples_menu;
use super::cli_star_sequence::{read_line, sequence_menu, single_star_menu};
use crate::star_config::StarConfig;
use std::io::{self, Write};

pub const DEFAULT_CONFIG_FILE: &str = "star_config.json";

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = match read_line() {
            Ok(choice) => choice,
            Err(e) => {
                println!("Error: {}", e);
                break;
            }
        };

        match choice.as_str() {
            "1" => sequence_menu(),
            "2" => single_star_menu(),
            "3" => examples_menu(),
            "4" => {
                if let Err(e) = StarConfig::default().save(DEFAULT_CONFIG_FILE) {
                    println!("Error: {}", e);
                } else {
                    println!("Default configuration written to '{}'", DEFAULT_CONFIG_FILE);
                }
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn show_main_menu() {
    println!("\x1b[34m\n Compact stars in scalar-tensor gravity: mass-radius and scalar charge sequences \n \x1b[0m");
    println!("\x1b[33m1. Stellar sequence from an EOS file\x1b[0m");
    println!("\x1b[33m2. Single star\x1b[0m");
    println!("\x1b[33m3. Examples\x1b[0m");
    println!("\x1b[33m4. Write default configuration ({})\x1b[0m", DEFAULT_CONFIG_FILE);
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}
