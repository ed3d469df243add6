// Tue Jan 13 2026 - Alex

use packet_frame_validator::ui::{self, cli};

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
