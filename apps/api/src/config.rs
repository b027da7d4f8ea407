use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whitespace-separated program + fixed leading arguments for the
    /// external analysis engine, e.g. `python extract_text.py`.
    pub engine_command: String,
    /// Upper bound on one engine run, in seconds. Absent = wait forever.
    pub engine_timeout_secs: Option<u64>,
    pub upload_dir: PathBuf,
    pub retention: RetentionPolicy,
    pub port: u16,
    pub rust_log: String,
}

/// What happens to a stored upload once its request has an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Leave the file on disk for out-of-band cleanup.
    Keep,
    /// Remove the file as soon as the analysis outcome is known.
    Delete,
}

impl FromStr for RetentionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(RetentionPolicy::Keep),
            "delete" => Ok(RetentionPolicy::Delete),
            other => bail!("UPLOAD_RETENTION must be 'keep' or 'delete', got '{other}'"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            engine_command: require_env("ENGINE_COMMAND")?,
            engine_timeout_secs: std::env::var("ENGINE_TIMEOUT_SECS")
                .ok()
                .map(|v| {
                    v.parse::<u64>()
                        .context("ENGINE_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?,
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            retention: std::env::var("UPLOAD_RETENTION")
                .unwrap_or_else(|_| "keep".to_string())
                .parse()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_parses_keep_and_delete() {
        assert_eq!(
            "keep".parse::<RetentionPolicy>().unwrap(),
            RetentionPolicy::Keep
        );
        assert_eq!(
            "delete".parse::<RetentionPolicy>().unwrap(),
            RetentionPolicy::Delete
        );
    }

    #[test]
    fn retention_is_case_insensitive() {
        assert_eq!(
            "Delete".parse::<RetentionPolicy>().unwrap(),
            RetentionPolicy::Delete
        );
    }

    #[test]
    fn retention_rejects_unknown_values() {
        assert!("purge".parse::<RetentionPolicy>().is_err());
    }
}
