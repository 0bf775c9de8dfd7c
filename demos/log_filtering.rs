use log::{error, info, Level};
use multi_log::MultiLogger;
use teams_logger::{Severity, TeamsLogger};

/// Two loggers posting to the same webhook with different thresholds, set `TEAMS_LOGGER_URL` to run it.
///
/// ```
/// cargo run --example log_filtering
/// ```
fn main() {
    if let Ok(endpoint) = std::env::var("TEAMS_LOGGER_URL") {
        let l1 = TeamsLogger::new(endpoint.clone()).with_level(Severity::Info).echo();
        let l2 = TeamsLogger::new(endpoint).card().with_level(Severity::Error).echo();
        let _ = MultiLogger::init(vec![Box::new(l1), Box::new(l2)], Level::Trace);

        // Only one message is posted at INFO level because l2 is filtered for error
        info!("only one message at INFO level");
        // but both loggers post this one
        error!("two messages at ERROR level");
    }
}
