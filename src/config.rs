use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::Context;

use crate::journal::DayBoundary;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,
    pub jwt_access_ttl_secs: i64,

    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_base_url: String,
    pub llm_timeout_secs: u64,

    pub tts_base_url: String,

    /// Day boundary used for streaks and calendar buckets.
    pub day_boundary: DayBoundary,
}

/// Parse an optional variable, falling back to `default` only when it is unset
/// or blank. A present but malformed value is an error.
fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{name} must be a number, got {value:?}")),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let day_offset_minutes = match env::var("LUMA_DAY_OFFSET_MINUTES") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<i32>()
                    .context("LUMA_DAY_OFFSET_MINUTES must be a number")?,
            ),
            _ => None,
        };
        let day_boundary = DayBoundary::from_offset_minutes(day_offset_minutes)
            .context("LUMA_DAY_OFFSET_MINUTES must be within one day of UTC")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("PORT", env::var("PORT").ok(), 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_access_ttl_secs: parse_or(
                "JWT_ACCESS_TTL_SECS",
                env::var("JWT_ACCESS_TTL_SECS").ok(),
                86400,
            )?,

            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".into()),
            groq_base_url: env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".into()),
            llm_timeout_secs: parse_or("LLM_TIMEOUT_SECS", env::var("LLM_TIMEOUT_SECS").ok(), 30)?,

            tts_base_url: env::var("TTS_BASE_URL")
                .unwrap_or_else(|_| "https://translate.google.com/translate_tts".into()),

            day_boundary,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_defaults_when_unset_or_blank() {
        assert_eq!(parse_or::<u64>("LLM_TIMEOUT_SECS", None, 30).unwrap(), 30);
        assert_eq!(parse_or::<u64>("LLM_TIMEOUT_SECS", Some("  ".into()), 30).unwrap(), 30);
        assert_eq!(parse_or::<u64>("LLM_TIMEOUT_SECS", Some(" 45 ".into()), 30).unwrap(), 45);
    }

    #[test]
    fn test_parse_or_rejects_malformed_value() {
        let err = parse_or::<u64>("LLM_TIMEOUT_SECS", Some("30s".into()), 30).unwrap_err();
        assert!(err.to_string().contains("LLM_TIMEOUT_SECS"));

        assert!(parse_or::<u16>("PORT", Some("70000".into()), 8080).is_err());
    }
}
