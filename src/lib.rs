//! A logger that posts each log event to a Microsoft Teams incoming webhook.
//!
//! Every record that passes the severity threshold is rendered into a Teams
//! connector message and posted, synchronously, to a single webhook url.
//! Delivery is best-effort: a slow or broken webhook never surfaces an error
//! to the code doing the logging, it only costs up to the configured timeout.
//!
//! # Styles
//!
//! - [`Style::Simple`] posts one line: `name - SEVERITY: message`.
//! - [`Style::Card`] posts a card whose facts are the record's key/values, with
//!   a timestamp, and one collapsible section for each error among them.
//!
//! # Example - Post error level records as simple messages
//! ```
//! let _ = teams_logger::TeamsLogger::new("https://example.webhook.office.com/webhookb2/token")
//!     .with_level(teams_logger::Severity::Error)
//!     .init();
//! ```
//!
//! # Example - Post cards, reading the webhook from the environment
//! ```
//! if let Ok(config) = teams_logger::Config::from_env() {
//!     let _ = teams_logger::TeamsLogger::from_config(config)
//!         .card()
//!         .with_name("billing")
//!         .init();
//!     let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
//!     log::error!(user_id = 42, err:err = err; "payment failed");
//! }
//! ```

use std::{borrow::Cow, time::Duration};

use log::{Log, Metadata, Record, SetLoggerError};

pub mod config;
pub mod message;
pub mod record;
pub mod severity;
pub mod transport;

pub use config::{Config, ConfigError, Style, TimestampFormat};
pub use message::{CardMessage, Fact, Message, Section, SimpleMessage};
pub use record::{Context, ContextValue, ErrorInfo, LogRecord};
pub use severity::{avatar_for, colour_for, Severity};
pub use transport::Transport;

// Delivering a message logs through these crates; forwarding their records
// would post again from inside the post.
const TRANSPORT_TARGETS: [&str; 6] = ["reqwest", "hyper", "hyper_util", "h2", "rustls", "native_tls"];

/// What happened to a record passed to [`TeamsLogger::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Below the threshold; nothing was rendered or sent.
    Ignored,
    /// Sent, and the record should carry on to the next handler.
    Forwarded,
    /// Sent, and no further handler should see the record.
    Consumed,
}

/// The `TeamsLogger` implements [`Log`] and provides builder methods to configure what is posted and how.
/// It defaults to posting every record as a simple message; it then needs to be initialized (`.init()`) before use.
///
/// # Example - Post every record as a card
/// ```
/// # use teams_logger::TeamsLogger;
/// TeamsLogger::new("https://example.webhook.office.com/webhookb2/token")
///     .card()
///     .init();
/// ```
pub struct TeamsLogger {
    config: Config,

    /// Custom thresholds per module
    levels: Vec<(Cow<'static, str>, Severity)>,

    transport: Transport,
}

impl TeamsLogger {
    /// Creates a new `TeamsLogger` posting to `url`, use this along with the builder methods and then call `init`
    /// to set up the logger.
    pub fn new<T>(url: T) -> TeamsLogger
    where
        T: Into<String>,
    {
        Self::from_config(Config::new(url))
    }

    /// Creates a `TeamsLogger` from a complete configuration, such as one read by [`Config::from_env`].
    pub fn from_config(config: Config) -> TeamsLogger {
        let transport = Transport::new(config.connect_timeout, config.timeout);
        TeamsLogger {
            config,
            levels: Vec::new(),
            transport,
        }
    }

    /// The least severe record that will be posted.
    ///
    /// # Example
    /// ```
    /// # use teams_logger::{Severity, TeamsLogger};
    /// TeamsLogger::new("https://example.webhook.office.com/webhookb2/token")
    ///     .with_level(Severity::Warning)
    ///     .init();
    /// ```
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_level(mut self, level: Severity) -> TeamsLogger {
        self.config.level = level;
        self
    }

    /// Overrides the threshold for a module and everything below it.
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_level_for<T: Into<Cow<'static, str>>>(mut self, module: T, level: Severity) -> Self {
        let module = module.into();
        self.levels.retain(|(name, _)| *name != module);
        self.levels.push((module, level));
        self
    }

    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_style(mut self, style: Style) -> TeamsLogger {
        self.config.style = style;
        self
    }

    /// Posts each record as a single line of text.
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn simple(self) -> TeamsLogger {
        self.with_style(Style::Simple)
    }

    /// Posts each record as a card with facts and error sections.
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn card(self) -> TeamsLogger {
        self.with_style(Style::Card)
    }

    /// Sets the display name shown on every message. An empty name is left out.
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_name<T>(mut self, name: T) -> TeamsLogger
    where
        T: Into<String>,
    {
        self.config.name = name.into();
        self
    }

    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_avatars(mut self, show: bool) -> TeamsLogger {
        self.config.show_avatars = show;
        self
    }

    /// Whether the severity (simple) or the message (card) is coloured by severity.
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_severity_colour(mut self, show: bool) -> TeamsLogger {
        self.config.show_severity_colour = show;
        self
    }

    /// Whether records handled here should still be passed on to further handlers.
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_bubble(mut self, bubble: bool) -> TeamsLogger {
        self.config.bubble = bubble;
        self
    }

    /// Sets the card timestamp to the UTC timezone
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_utc_timestamp(mut self) -> TeamsLogger {
        self.config.timestamp = TimestampFormat::Utc;
        self
    }

    /// Sets the card timestamp to the local timezone
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn with_local_timestamp(mut self) -> TeamsLogger {
        self.config.timestamp = TimestampFormat::Local;
        self
    }

    /// Bounds how long a single post may block the logging thread.
    #[must_use = "You must call init() before logging"]
    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> TeamsLogger {
        self.config.connect_timeout = connect_timeout;
        self.config.timeout = timeout;
        let echo = self.transport.echoes();
        self.transport = Transport::new(connect_timeout, timeout).with_echo(echo);
        self
    }

    /// Writes each post, and each failed post, to console, use for debugging.
    ///
    /// Example
    /// ```
    /// # use teams_logger::TeamsLogger;
    /// TeamsLogger::new("https://example.webhook.office.com/webhookb2/token")
    ///     .echo()
    ///     .init();
    /// ```
    #[inline]
    #[must_use = "You must call init() before logging"]
    pub fn echo(mut self) -> TeamsLogger {
        self.transport = self.transport.with_echo(true);
        self
    }

    /// This needs to be called after the builder has set up the logger.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let loosest = self
            .levels
            .iter()
            .map(|(_, level)| *level)
            .fold(self.config.level, Severity::min);
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(loosest.to_level_filter());
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The number of posts that failed, timed out or were refused since the logger was built.
    pub fn failed_deliveries(&self) -> u64 {
        self.transport.failures()
    }

    /// Renders and posts `record` unless it is below the configured level.
    pub fn handle(&self, record: &LogRecord) -> Disposition {
        if record.severity < self.config.level {
            return Disposition::Ignored;
        }
        self.dispatch(record)
    }

    fn dispatch(&self, record: &LogRecord) -> Disposition {
        let message = message::build(record, &self.config);
        self.transport.deliver(&message, &self.config.url);
        if self.config.bubble {
            Disposition::Forwarded
        } else {
            Disposition::Consumed
        }
    }

    // The most specific module override wins.
    fn threshold(&self, target: &str) -> Severity {
        self.levels
            .iter()
            .filter(|(module, _)| is_within(target, module))
            .max_by_key(|(module, _)| module.len())
            .map_or(self.config.level, |(_, level)| *level)
    }
}

fn is_within(target: &str, module: &str) -> bool {
    target
        .strip_prefix(module)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

impl Log for TeamsLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let target = metadata.target();
        if TRANSPORT_TARGETS.iter().any(|module| is_within(target, module)) {
            return false;
        }
        Severity::from(metadata.level()) >= self.threshold(target)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.dispatch(&LogRecord::from_log(record));
        }
    }

    // Nothing is buffered, every record is posted as it arrives.
    fn flush(&self) {}
}
