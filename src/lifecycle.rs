//! Process lifecycle: logging setup and shutdown on Ctrl-C.

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Builds the log filter from a directive string, keeping sqlx quiet.
///
/// An unparseable directive falls back to `info`.
pub fn log_filter(directive: &str) -> EnvFilter {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter '{}': {}", directive, e);
        EnvFilter::new("info")
    });
    match "sqlx=warn".parse() {
        Ok(quiet_sqlx) => filter.add_directive(quiet_sqlx),
        Err(_) => filter,
    }
}

/// Initialize logging with tracing_subscriber. `log` records are bridged into tracing.
pub fn init_logging(directive: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directive))
        .compact()
        .with_target(false)
        .with_ansi(true)
        .try_init();

    if installed.is_err() {
        log::debug!("Logging already initialized");
    }
}

/// Token that is cancelled when the process receives Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::warn!("Interrupt received, cancelling scan");
                trigger.cancel();
            }
            Err(e) => log::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_directive_is_kept() {
        let rendered = log_filter("debug").to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("sqlx=warn"));
    }

    #[test]
    fn test_invalid_directive_falls_back_to_info() {
        let rendered = log_filter("accessibility_scanner=[").to_string();
        assert!(rendered.contains("info"));
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging("warn");
        init_logging("warn");
    }
}
