use std::env;
use std::fmt;
use std::str::FromStr;

use crate::workflows::allocation::ScoringPolicy;

/// Distinguishes runtime behavior for different stages of the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring: load_scoring_policy()?,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn load_scoring_policy() -> Result<ScoringPolicy, ConfigError> {
    let defaults = ScoringPolicy::default();

    let policy = ScoringPolicy {
        base_score: env_or("MATCH_BASE_SCORE", defaults.base_score)?,
        bedroom_fit_cap: env_or("MATCH_BEDROOM_FIT_CAP", defaults.bedroom_fit_cap)?,
        bedroom_penalty_per_room: env_or(
            "MATCH_BEDROOM_PENALTY",
            defaults.bedroom_penalty_per_room,
        )?,
        priority_pivot_tier: env_or("MATCH_PRIORITY_PIVOT_TIER", defaults.priority_pivot_tier)?,
        priority_bonus_per_tier: env_or("MATCH_PRIORITY_BONUS", defaults.priority_bonus_per_tier)?,
        acceptance_threshold: threshold("MATCH_ACCEPT_THRESHOLD", defaults.acceptance_threshold)?,
        strong_match_threshold: threshold(
            "MATCH_STRONG_THRESHOLD",
            defaults.strong_match_threshold,
        )?,
        suggestion_threshold: threshold("MATCH_SUGGEST_THRESHOLD", defaults.suggestion_threshold)?,
    };

    if policy.strong_match_threshold < policy.acceptance_threshold {
        return Err(ConfigError::InconsistentThresholds {
            acceptance: policy.acceptance_threshold,
            strong: policy.strong_match_threshold,
        });
    }

    Ok(policy)
}

fn env_or<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + NumberCheck,
{
    match env::var(var) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var,
                    value: raw.clone(),
                })?;
            if value.is_finite_number() {
                Ok(value)
            } else {
                Err(ConfigError::InvalidNumber { var, value: raw })
            }
        }
        Err(_) => Ok(default),
    }
}

fn threshold(var: &'static str, default: u8) -> Result<u8, ConfigError> {
    let value = env_or(var, default)?;
    if value > 100 {
        return Err(ConfigError::OutOfRange { var, value });
    }
    Ok(value)
}

trait NumberCheck {
    fn is_finite_number(&self) -> bool;
}

impl NumberCheck for f64 {
    fn is_finite_number(&self) -> bool {
        self.is_finite()
    }
}

impl NumberCheck for u8 {
    fn is_finite_number(&self) -> bool {
        true
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    OutOfRange { var: &'static str, value: u8 },
    InconsistentThresholds { acceptance: u8, strong: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a finite number (found '{value}')")
            }
            ConfigError::OutOfRange { var, value } => {
                write!(f, "{var} must be between 0 and 100 (found {value})")
            }
            ConfigError::InconsistentThresholds { acceptance, strong } => write!(
                f,
                "MATCH_STRONG_THRESHOLD ({strong}) must not be below MATCH_ACCEPT_THRESHOLD ({acceptance})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARS: [&str; 10] = [
        "APP_ENV",
        "APP_LOG_LEVEL",
        "MATCH_BASE_SCORE",
        "MATCH_BEDROOM_FIT_CAP",
        "MATCH_BEDROOM_PENALTY",
        "MATCH_PRIORITY_PIVOT_TIER",
        "MATCH_PRIORITY_BONUS",
        "MATCH_ACCEPT_THRESHOLD",
        "MATCH_STRONG_THRESHOLD",
        "MATCH_SUGGEST_THRESHOLD",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring, ScoringPolicy::default());
    }

    #[test]
    fn scoring_overrides_are_applied() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("MATCH_ACCEPT_THRESHOLD", "65");
        env::set_var("MATCH_PRIORITY_BONUS", " 7.5 ");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.scoring.acceptance_threshold, 65);
        assert_eq!(config.scoring.priority_bonus_per_tier, 7.5);
        assert_eq!(config.scoring.base_score, 50.0);
    }

    #[test]
    fn rejects_threshold_above_one_hundred() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_SUGGEST_THRESHOLD", "120");
        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::OutOfRange { var, value }) => {
                assert_eq!(var, "MATCH_SUGGEST_THRESHOLD");
                assert_eq!(value, 120);
            }
            other => panic!("expected out of range error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_BASE_SCORE", "fifty");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber { var: "MATCH_BASE_SCORE", .. })
        ));
    }

    #[test]
    fn rejects_strong_band_below_gate() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_STRONG_THRESHOLD", "55");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(
            result,
            Err(ConfigError::InconsistentThresholds {
                acceptance: 60,
                strong: 55
            })
        ));
    }
}
