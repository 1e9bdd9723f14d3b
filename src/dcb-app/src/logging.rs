// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a configured log level name, falling back to INFO.
pub fn resolve_level(log_level: Option<&str>) -> Level {
    log_level
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// Initialize logging with optional level from config.
/// Falls back to INFO if level is None or invalid.
pub fn init_logging(log_level: Option<&str>) {
    FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(resolve_level(log_level))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_level() {
        assert_eq!(resolve_level(Some("debug")), Level::DEBUG);
        assert_eq!(resolve_level(Some("warn")), Level::WARN);
        assert_eq!(resolve_level(Some("loud")), Level::INFO);
        assert_eq!(resolve_level(None), Level::INFO);
    }
}
