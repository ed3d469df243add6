// Wed Jan 15 2026 - Alex

pub mod cli;
pub mod progress;
pub mod table;

pub use cli::{Args, Command, CommandHandler};
pub use progress::{Stage, StageProgress};
pub use table::TableBuilder;

use colored::Colorize;

pub fn print_info(message: &str) {
    println!("{} {}", "[*]".blue(), message);
}

pub fn print_success(message: &str) {
    println!("{} {}", "[+]".green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "[!]".red(), message);
}
