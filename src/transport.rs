//! Best-effort delivery of rendered messages to the webhook.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use thiserror::Error;

use crate::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use crate::message::Message;

#[derive(Debug, Error)]
enum DeliveryError {
    #[error("could not encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("delivery thread panicked")]
    Panicked,
}

/// Posts messages, one bounded request each, and never reports failure to
/// the caller. Failures are only counted.
#[derive(Debug)]
pub struct Transport {
    connect_timeout: Duration,
    timeout: Duration,
    echo: bool,
    failures: AtomicU64,
}

impl Transport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Transport {
        Transport {
            connect_timeout,
            timeout,
            echo: false,
            failures: AtomicU64::new(0),
        }
    }

    /// Prints each call, and each failure, to stdout.
    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Transport {
        self.echo = echo;
        self
    }

    /// Posts `message` to `url`, swallowing any error or non-success status.
    ///
    /// The call blocks until the post completes or times out, even when made
    /// from inside an async runtime.
    pub fn deliver(&self, message: &Message, url: &str) {
        // the blocking client owns a runtime that must not be dropped on an async worker
        let result = thread::scope(|scope| scope.spawn(|| self.try_deliver(message, url)).join())
            .unwrap_or(Err(DeliveryError::Panicked));
        if let Err(x) = result {
            self.failures.fetch_add(1, Ordering::Relaxed);
            if self.echo {
                println!("call to {url} failed {x}");
            }
        }
    }

    pub fn echoes(&self) -> bool {
        self.echo
    }

    /// How many deliveries have failed so far.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn try_deliver(&self, message: &Message, url: &str) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(message)?;
        if self.echo {
            println!("Calling: `{url}\n\t{}`", String::from_utf8_lossy(&body));
        }
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .build()?
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len().to_string())
            .body(body)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT)
    }
}
