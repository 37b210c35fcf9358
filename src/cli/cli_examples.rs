use super::cli_star_sequence::read_line;
use crate::Examples::star_examples::star_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples (Gamma = 2 polytrope) ===");
        println!("1. Single star with trajectory");
        println!("2. First ten stars of the sequence");
        println!("3. Full sequence with plots");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let choice = match read_line() {
            Ok(choice) => choice,
            Err(_) => break,
        };
        match choice.as_str() {
            "1" => star_examples(0),
            "2" => star_examples(1),
            "3" => star_examples(2),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
