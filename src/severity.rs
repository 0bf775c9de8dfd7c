//! Severities and the palette used to colour and decorate them.
//!
//! The palette is a constant table, one entry per [`Severity`], so lookups
//! never allocate and can be made from any thread.

use std::fmt;
use std::str::FromStr;

use log::{Level, LevelFilter};

use crate::config::ConfigError;

/// The colour used for any severity name that is not in the palette.
pub const DEFAULT_COLOUR: &str = "CCCCCC";

/// The severity of a record, ordered from least to most severe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

struct Swatch {
    name: &'static str,
    colour: &'static str,
    avatar: &'static str,
}

// Indexed by `Severity as usize`.
const PALETTE: [Swatch; 8] = [
    Swatch {
        name: "DEBUG",
        colour: "C3E6CB",
        avatar: "https://raw.githubusercontent.com/margatampu/laravel-teams-logging/master/src/Assets/img/debug.png",
    },
    Swatch {
        name: "INFO",
        colour: "BEE5EB",
        avatar: "https://raw.githubusercontent.com/margatampu/laravel-teams-logging/master/src/Assets/img/info.png",
    },
    Swatch {
        name: "NOTICE",
        colour: "B8DAFF",
        avatar: "https://raw.githubusercontent.com/margatampu/laravel-teams-logging/master/src/Assets/img/notice.png",
    },
    Swatch {
        name: "WARNING",
        colour: "FFEEBA",
        avatar: "https://raw.githubusercontent.com/margatampu/laravel-teams-logging/master/src/Assets/img/warning.png",
    },
    Swatch {
        name: "ERROR",
        colour: "FF8000",
        avatar: "https://raw.githubusercontent.com/margatampu/laravel-teams-logging/master/src/Assets/img/error.png",
    },
    Swatch {
        name: "CRITICAL",
        colour: "FF0000",
        avatar: "https://raw.githubusercontent.com/margatampu/laravel-teams-logging/master/src/Assets/img/critical.png",
    },
    Swatch {
        name: "ALERT",
        colour: "AF2432",
        avatar: "https://raw.githubusercontent.com/margatampu/laravel-teams-logging/master/src/Assets/img/alert.png",
    },
    Swatch {
        name: "EMERGENCY",
        colour: "721C24",
        avatar: "https://raw.githubusercontent.com/margatampu/laravel-teams-logging/master/src/Assets/img/emergency.png",
    },
];

impl Severity {
    /// Every severity, least severe first.
    pub const ALL: [Severity; 8] = [
        Severity::Debug,
        Severity::Info,
        Severity::Notice,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
        Severity::Alert,
        Severity::Emergency,
    ];

    /// The canonical upper case name, e.g. `WARNING`.
    pub fn name(self) -> &'static str {
        self.swatch().name
    }

    /// The 6 digit hex colour (without `#`) shown for this severity.
    pub fn colour(self) -> &'static str {
        self.swatch().colour
    }

    /// The avatar image shown on cards for this severity.
    pub fn avatar(self) -> Option<&'static str> {
        Some(self.swatch().avatar)
    }

    /// The loosest `log` filter that still lets records of this severity through.
    ///
    /// Nothing coming from `log` maps above [`Severity::Error`], so the
    /// stricter thresholds turn the facade off entirely.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Severity::Debug => LevelFilter::Trace,
            Severity::Info => LevelFilter::Info,
            Severity::Notice | Severity::Warning => LevelFilter::Warn,
            Severity::Error => LevelFilter::Error,
            Severity::Critical | Severity::Alert | Severity::Emergency => LevelFilter::Off,
        }
    }

    fn swatch(self) -> &'static Swatch {
        &PALETTE[self as usize]
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace | Level::Debug => Severity::Debug,
            Level::Info => Severity::Info,
            Level::Warn => Severity::Warning,
            Level::Error => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("WARN") {
            return Ok(Severity::Warning);
        }
        Severity::ALL
            .into_iter()
            .find(|severity| severity.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownSeverity(s.to_string()))
    }
}

/// Looks up the colour for a severity name, falling back to [`DEFAULT_COLOUR`].
pub fn colour_for(severity: &str) -> &'static str {
    severity
        .parse::<Severity>()
        .map_or(DEFAULT_COLOUR, Severity::colour)
}

/// Looks up the avatar for a severity name. Unknown names have no avatar.
pub fn avatar_for(severity: &str) -> Option<&'static str> {
    severity.parse::<Severity>().ok().and_then(Severity::avatar)
}
