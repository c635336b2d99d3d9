use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;
use crate::ranking::weighting::IdfPolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Server-side LLM key; requests may supply their own instead.
    pub groq_api_key: Option<String>,
    pub llm_base_url: String,
    /// Replaces the embedded lexicon when set.
    pub lexicon_path: Option<PathBuf>,
    pub resume_top_n: usize,
    pub job_top_n: usize,
    pub common_top_n: usize,
    pub max_upload_bytes: usize,
    /// IDF tiers and phrase boost for term weighting.
    pub idf: IdfPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8000)?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            groq_api_key: optional("GROQ_API_KEY"),
            llm_base_url: optional("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            lexicon_path: optional("LEXICON_PATH").map(PathBuf::from),
            resume_top_n: parse_or(&lookup, "RESUME_TOP_N", 20)?,
            job_top_n: parse_or(&lookup, "JOB_TOP_N", 15)?,
            common_top_n: parse_or(&lookup, "COMMON_TOP_N", 15)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            idf: idf_policy(&lookup)?,
        })
    }
}

fn idf_policy(lookup: &impl Fn(&str) -> Option<String>) -> Result<IdfPolicy> {
    let defaults = IdfPolicy::default();
    let policy = IdfPolicy {
        phrase: parse_or(lookup, "IDF_PHRASE", defaults.phrase)?,
        noun: parse_or(lookup, "IDF_NOUN", defaults.noun)?,
        other: parse_or(lookup, "IDF_OTHER", defaults.other)?,
        phrase_boost: parse_or(lookup, "PHRASE_BOOST", defaults.phrase_boost)?,
    };

    for (key, value) in [
        ("IDF_PHRASE", policy.phrase),
        ("IDF_NOUN", policy.noun),
        ("IDF_OTHER", policy.other),
        ("PHRASE_BOOST", policy.phrase_boost),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("{key} must be a finite, non-negative number, got {value}");
        }
    }
    Ok(policy)
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        _ => Ok(default),
    }
}
