use std::str::FromStr;

use crate::domain::value_objects::{DraftSettings, Section};

const DEFAULT_SECTIONS: &str = "lp:LaunchPoint,io:Ink Odyssey";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
    #[error("No draft sections configured")]
    NoSections,
    #[error("Invalid draft settings: {0}")]
    Settings(&'static str),
}

/// Server configuration, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub sections: Vec<Section>,
    pub settings: DraftSettings,
    /// Seed for captain draws; entropy when unset
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DraftSettings::default();

        let db_path = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_PATH"))
            .unwrap_or_else(|| "sqlite:./data/drafts.db".to_string());
        // Ensure path has sqlite: prefix
        let database_url = if db_path.starts_with("sqlite:") {
            db_path
        } else {
            format!("sqlite:{}", db_path)
        };

        let sections = Section::parse_list(
            &lookup("DRAFT_SECTIONS").unwrap_or_else(|| DEFAULT_SECTIONS.to_string()),
        );
        if sections.is_empty() {
            return Err(ConfigError::NoSections);
        }

        let settings = DraftSettings {
            expiry_minutes: parse(&lookup, "DRAFT_EXPIRY_MINUTES", defaults.expiry_minutes)?,
            reping_cooldown_minutes: parse(
                &lookup,
                "DRAFT_REPING_COOLDOWN_MINUTES",
                defaults.reping_cooldown_minutes,
            )?,
            extension_minutes: parse(&lookup, "DRAFT_EXTENSION_MINUTES", defaults.extension_minutes)?,
            late_extension_minutes: parse(
                &lookup,
                "DRAFT_LATE_EXTENSION_MINUTES",
                defaults.late_extension_minutes,
            )?,
        };
        settings.validate().map_err(ConfigError::Settings)?;

        let rng_seed = match lookup("DRAFT_RNG_SEED") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "DRAFT_RNG_SEED",
                value: raw,
            })?),
            None => None,
        };

        Ok(Self {
            port: parse(&lookup, "PORT", 9999)?,
            database_url,
            jwt_secret: lookup("JWT_SECRET")
                .unwrap_or_else(|| "draft-secret-key-change-in-production".to_string()),
            sections,
            settings,
            rng_seed,
        })
    }
}

fn parse<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}
