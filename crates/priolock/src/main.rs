use priolock_core::{events, init_logging};

mod app;
mod commands;
mod table;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Extract quiet flag before initializing logging
    let quiet = matches.get_flag("quiet");
    init_logging(quiet);

    let result = commands::run_command(&matches);
    if let Err(e) = &result {
        events::log_app_error(e.as_ref());
    }
    events::log_app_shutdown();

    result
}
