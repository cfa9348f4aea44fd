//! Optional `tracing` subscriber for binaries and examples embedding the
//! solvers.
//!
//! The library itself only emits events; nothing is printed unless the host
//! installs a subscriber, either its own or the one built by [`setup_log`].

use std::time::Instant;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"u_fitsolve=debug"`.
    pub level: String,

    /// Emit ANSI colors.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

impl LogConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

/// Installs a stdout subscriber filtered at `config.level`, with timestamps
/// relative to the call.
///
/// Fails if a global subscriber is already installed.
pub fn setup_log(config: &LogConfig) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::new(config.level.as_str());
    let timestamper = CompactTimestamp {
        start: Instant::now(),
    };

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(config.ansi)
        .with_target(false)
        .with_timer(timestamper);

    Registry::default().with(env_filter).with(stdout_layer).try_init()
}

#[derive(Clone)]
struct CompactTimestamp {
    start: Instant,
}

impl FormatTime for CompactTimestamp {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let elapsed = self.start.elapsed();
        let minutes = elapsed.as_secs() / 60;
        let seconds = elapsed.as_secs() % 60;
        let millis = elapsed.subsec_millis();

        write!(w, "{:02}m {:02}.{:03}s", minutes, seconds, millis)
    }
}
