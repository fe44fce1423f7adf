use tracing::{error, info};

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(event = "core.app.error_occurred", error = %error);
}
