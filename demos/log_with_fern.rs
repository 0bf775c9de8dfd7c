use fern::Dispatch;
use log::{info, Log};
use teams_logger::{Severity, TeamsLogger};

/// This is an example that shows how `teams_logger` can be chained with the [`fern`] logging framework, so the
/// console and the Teams channel both receive each record.  Set `TEAMS_LOGGER_URL` to run it.
///
/// ```
/// cargo run --example log_with_fern
/// ```
fn main() {
    if let Ok(endpoint) = std::env::var("TEAMS_LOGGER_URL") {
        let teams_logger: Box<dyn Log + 'static> = Box::new(
            TeamsLogger::new(endpoint)
                .with_name("fern demo")
                .with_level(Severity::Info)
                .echo(),
        );
        let _ = Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}|{}|{} {}",
                    chrono::Local::now().format("%H:%M:%S %Y-%m-%d"),
                    record.target(),
                    record.level(),
                    message
                ))
            })
            .chain(std::io::stdout())
            .chain(teams_logger)
            .apply();

        info!("Hello fern");
    }
}
