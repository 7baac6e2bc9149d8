use std::env;

/// Thresholds driving scoring and summarization. The defaults are starting
/// points, not load-bearing business logic — all of them are overridable
/// through the environment.
#[derive(Debug, Clone, Copy)]
pub struct EnrichPolicy {
    /// Below this classification confidence a video is treated as unknown
    /// and scored with universal metrics only.
    pub confidence_threshold: f32,
    /// Composite score above which an insight is a standout.
    pub standout_threshold: f64,
    /// Composite score above which an insight counts as high-value.
    pub high_value_threshold: f64,
}

impl Default for EnrichPolicy {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            standout_threshold: 60.0,
            high_value_threshold: 80.0,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Concurrent per-video workers for the scoring/summarizing fan-out.
    pub workers: usize,
    pub policy: EnrichPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            workers: parsed_env("WORKERS", 8),
            policy: EnrichPolicy {
                confidence_threshold: parsed_env("CONFIDENCE_THRESHOLD", 0.5),
                standout_threshold: parsed_env("STANDOUT_THRESHOLD", 60.0),
                high_value_threshold: parsed_env("HIGH_VALUE_THRESHOLD", 80.0),
            },
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid number, got {v:?}")),
        Err(_) => default,
    }
}
