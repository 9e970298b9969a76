use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File,
    Postgres,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "file" => Ok(StoreKind::File),
            "postgres" | "pg" => Ok(StoreKind::Postgres),
            other => Err(format!("unknown draft store '{}'", other)),
        }
    }
}

/// Thresholds the review summarizer checks before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRules {
    pub min_title_len: usize,
    pub min_description_len: usize,
    pub min_objectives: usize,
    pub min_duration_minutes: u32,
}

impl Default for ReviewRules {
    fn default() -> Self {
        Self {
            min_title_len: 10,
            min_description_len: 50,
            min_objectives: 3,
            min_duration_minutes: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub draft_store: StoreKind,
    pub draft_dir: PathBuf,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub review: ReviewRules,
    pub reading_words_per_minute: u32,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = ReviewRules::default();
        let config = Self {
            draft_store: get_env_parse_or("DRAFT_STORE", StoreKind::File)?,
            draft_dir: env::var("DRAFT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./drafts")),
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: get_env_parse_or("DB_MAX_CONNECTIONS", 5)?,
            review: ReviewRules {
                min_title_len: get_env_parse_or("REVIEW_MIN_TITLE_LEN", defaults.min_title_len)?,
                min_description_len: get_env_parse_or(
                    "REVIEW_MIN_DESCRIPTION_LEN",
                    defaults.min_description_len,
                )?,
                min_objectives: get_env_parse_or("REVIEW_MIN_OBJECTIVES", defaults.min_objectives)?,
                min_duration_minutes: get_env_parse_or(
                    "REVIEW_MIN_DURATION_MINUTES",
                    defaults.min_duration_minutes,
                )?,
            },
            reading_words_per_minute: get_env_parse_or("READING_WORDS_PER_MINUTE", 200)?,
        };

        if config.draft_store == StoreKind::Postgres && config.database_url.is_none() {
            return Err(Error::Config(
                "DATABASE_URL is required when DRAFT_STORE=postgres".to_string(),
            ));
        }
        if config.reading_words_per_minute == 0 {
            return Err(Error::Config(
                "READING_WORDS_PER_MINUTE must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            draft_store: StoreKind::Memory,
            draft_dir: PathBuf::from("./drafts"),
            database_url: None,
            db_max_connections: 5,
            review: ReviewRules::default(),
            reading_words_per_minute: 200,
        }
    }
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
