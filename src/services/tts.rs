use std::time::Duration;

use anyhow::Context;
use futures_util::future::try_join_all;

use crate::config::Config;

pub const MAX_CHUNK_CHARS: usize = 200;
pub const DEFAULT_LANG: &str = "id";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Pass-through client for a Google-Translate-style TTS endpoint returning MP3.
#[derive(Clone)]
pub struct TtsClient {
    http: reqwest::Client,
    base_url: String,
}

impl TtsClient {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build TTS HTTP client")?;

        Ok(Self {
            http,
            base_url: config.tts_base_url.clone(),
        })
    }

    /// Fetch every chunk concurrently and join the audio in text order.
    pub async fn synthesize(&self, text: &str, lang: &str) -> anyhow::Result<Vec<u8>> {
        let lang = upstream_lang(lang);
        let chunks = split_into_chunks(text, MAX_CHUNK_CHARS);
        tracing::debug!(chunks = chunks.len(), lang = %lang, "Synthesizing speech");

        let parts = try_join_all(chunks.iter().map(|chunk| self.fetch_chunk(chunk, lang))).await?;
        Ok(parts.concat())
    }

    async fn fetch_chunk(&self, chunk: &str, lang: &str) -> anyhow::Result<Vec<u8>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("ie", "UTF-8"), ("tl", lang), ("client", "tw-ob"), ("q", chunk)])
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("TTS request failed: {}", response.status());
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// The upstream service knows British English as `en-uk`.
pub fn upstream_lang(lang: &str) -> &str {
    if lang.eq_ignore_ascii_case("en-gb") {
        "en-uk"
    } else {
        lang
    }
}

/// Split after each run of `.`, `!` or `?`. A trailing fragment without
/// terminal punctuation is kept as its own sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let next_is_terminal = matches!(chars.peek(), Some((_, '.' | '!' | '?')));
        if !next_is_terminal {
            let end = i + c.len_utf8();
            out.push(&text[start..end]);
            start = end;
        }
    }
    if !text[start..].trim().is_empty() {
        out.push(&text[start..]);
    }
    out
}

/// Greedily pack whole sentences into chunks of at most `max_chars`
/// characters. A single sentence longer than the limit becomes its own chunk.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in sentences(text) {
        let len = sentence.chars().count();
        if current_len + len <= max_chars {
            current.push_str(sentence);
            current_len += len;
        } else {
            if !current.trim().is_empty() {
                chunks.push(current.trim().to_string());
            }
            current = sentence.to_string();
            current_len = len;
        }
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(split_into_chunks("Halo. Apa kabar?", 200), vec!["Halo. Apa kabar?"]);
    }

    #[test]
    fn test_chunks_respect_limit_on_sentence_boundaries() {
        let text = "One two three. Four five six! Seven eight nine? Ten.";
        let chunks = split_into_chunks(text, 30);
        assert_eq!(
            chunks,
            vec!["One two three. Four five six!", "Seven eight nine? Ten."]
        );
        assert!(chunks.iter().all(|c| c.chars().count() <= 30));
    }

    #[test]
    fn test_overlong_sentence_kept_whole() {
        let long = format!("{}.", "a".repeat(250));
        let chunks = split_into_chunks(&format!("Hi. {long} Bye."), 200);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1], long);
    }

    #[test]
    fn test_trailing_fragment_without_punctuation() {
        assert_eq!(sentences("Wait... what"), vec!["Wait...", " what"]);
        assert_eq!(split_into_chunks("no punctuation at all", 200), vec!["no punctuation at all"]);
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        assert!(split_into_chunks("   ", 200).is_empty());
    }

    #[test]
    fn test_upstream_lang_mapping() {
        assert_eq!(upstream_lang("en-GB"), "en-uk");
        assert_eq!(upstream_lang("en-gb"), "en-uk");
        assert_eq!(upstream_lang("id"), "id");
        assert_eq!(upstream_lang("en-US"), "en-US");
    }
}
