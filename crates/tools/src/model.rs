//! Chat-completion client for the drafting functions.
//!
//! Thin wrapper over an OpenAI-compatible endpoint; the provider, model and
//! key come from configuration.

use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use toolspan_core::config::ModelConfig;
use toolspan_core::{Error, Result};

#[derive(Debug)]
pub struct ModelClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Secret<String>,
}

impl ModelClient {
    /// Build a client from configuration. A missing API key is a
    /// server-class error: the deployment, not the caller, is misconfigured.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            Error::model("no API key configured (set TOOLSPAN__MODEL__API_KEY)")
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::model(format!("client construction failed: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// One chat-completion round.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: String,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&Request {
                model: &self.model,
                messages: vec![
                    Message { role: "system", content: system },
                    Message { role: "user", content: user },
                ],
            })
            .send()
            .await
            .map_err(|e| Error::model(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::model(format!("endpoint returned {}", status)));
        }

        let parsed: Response = response
            .json()
            .await
            .map_err(|e| Error::model(format!("malformed completion response: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::model("empty completion"))
    }
}
