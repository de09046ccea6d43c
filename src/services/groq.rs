use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;

/// Chat-completions client for Groq's OpenAI-compatible API.
#[derive(Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Sampling knobs for one completion.
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_mode: bool,
}

impl Sampling {
    pub const ANALYSIS: Sampling = Sampling {
        temperature: 0.7,
        max_tokens: 1024,
        json_mode: true,
    };

    pub const DAILY_TIP: Sampling = Sampling {
        temperature: 0.9,
        max_tokens: 100,
        json_mode: false,
    };
}

impl GroqClient {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()
            .context("Failed to build LLM HTTP client")?;

        Ok(Self {
            http,
            base_url: config.groq_base_url.trim_end_matches('/').to_string(),
            api_key: config.groq_api_key.clone(),
            model: config.groq_model.clone(),
        })
    }

    /// Returns the text of the first choice, or an error when the API fails or
    /// the choice is empty.
    pub async fn complete(&self, system: &str, user: &str, sampling: Sampling) -> anyhow::Result<String> {
        let messages = [
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ];

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": sampling.temperature,
            "max_tokens": sampling.max_tokens,
        });
        if sampling.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API error {}: {}", status, body);
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .context("Empty response from Groq")
    }

    /// Like [`GroqClient::complete`] in JSON mode, decoding the reply into `T`.
    pub async fn complete_json<T>(&self, system: &str, user: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let text = self.complete(system, user, Sampling::ANALYSIS).await?;
        serde_json::from_str(&text).context("Groq returned malformed JSON")
    }
}
