use std::num::{NonZeroU32, ParseIntError};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Number of most recent body entries a badge check evaluates (default: `30`).
    pub badge_history_days: NonZeroU32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `BADGE_HISTORY_DAYS`   | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let badge_history_days = parse_badge_history_days(
            &std::env::var("BADGE_HISTORY_DAYS").unwrap_or_else(|_| "30".into()),
        )
        .expect("BADGE_HISTORY_DAYS must be a positive integer");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            badge_history_days,
        }
    }
}

/// Zero is rejected along with anything that is not a `u32`.
fn parse_badge_history_days(raw: &str) -> Result<NonZeroU32, ParseIntError> {
    raw.trim().parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_history_days_accepts_positive_counts() {
        assert_eq!(parse_badge_history_days("45").map(NonZeroU32::get), Ok(45));
        assert_eq!(parse_badge_history_days(" 1 ").map(NonZeroU32::get), Ok(1));
    }

    #[test]
    fn badge_history_days_rejects_zero() {
        assert!(parse_badge_history_days("0").is_err());
    }

    #[test]
    fn badge_history_days_rejects_non_numbers() {
        assert!(parse_badge_history_days("-3").is_err());
        assert!(parse_badge_history_days("thirty").is_err());
        assert!(parse_badge_history_days("").is_err());
    }
}
