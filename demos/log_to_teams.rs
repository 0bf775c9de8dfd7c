use std::io;

use teams_logger::{Config, TeamsLogger};

/// Posts a card to a Teams channel.  To run this example you will need to set up an incoming webhook on a channel
/// and store its URL in an environment variable called `TEAMS_LOGGER_URL`.  Any other `TEAMS_LOGGER_*` variable,
/// such as `TEAMS_LOGGER_NAME`, is picked up too.
///
/// ```
/// cargo run --example log_to_teams
/// ```
fn main() {
    match Config::from_env() {
        Ok(config) => {
            let _ = TeamsLogger::from_config(config).card().echo().init();
            let err = io::Error::new(io::ErrorKind::TimedOut, "upstream did not answer");
            log::info!(user_id = 42, plan = "pro"; "Hello teams");
            log::error!(user_id = 42, err:err = err; "Checkout failed");
        }
        Err(x) => eprintln!("{x}"),
    }
}
