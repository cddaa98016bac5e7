//! `ChatTransport` over the Ollama chat HTTP API.
//!
//! One blocking `POST {host}/api/chat` per call, non-streaming:
//!
//! ```json
//! { "model": "...", "stream": false,
//!   "messages": [{"role": "system", ...}, {"role": "user", ...}],
//!   "options": { "temperature": 1.2 } }
//! ```
//!
//! The reply text is `message.content` of the response body.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ChatTransport, OracleError, OracleResult};

pub const DEFAULT_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_TEMPERATURE: f64 = 1.2;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model:    &'a str,
    messages: [Message<'a>; 2],
    stream:   bool,
    options:  Options,
}

#[derive(Serialize)]
struct Message<'a> {
    role:    &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Options {
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Blocking Ollama client.
pub struct OllamaClient {
    client:      reqwest::blocking::Client,
    endpoint:    String,
    model:       String,
    temperature: f64,
}

impl OllamaClient {
    pub fn new(
        host:        &str,
        model:       impl Into<String>,
        temperature: f64,
        timeout:     Duration,
    ) -> OracleResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Config(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", host.trim_end_matches('/')),
            model: model.into(),
            temperature,
        })
    }

    /// Local server, default model, temperature, and timeout.
    pub fn local() -> OracleResult<Self> {
        Self::new(DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn transport_error(err: reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout
    } else {
        OracleError::Transport(err.to_string())
    }
}

impl ChatTransport for OllamaClient {
    fn chat(&self, system: &str, user: &str) -> OracleResult<String> {
        let request = ChatRequest {
            model:    &self.model,
            messages: [
                Message { role: "system", content: system },
                Message { role: "user", content: user },
            ],
            stream:   false,
            options:  Options { temperature: self.temperature },
        };

        let response: ChatResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?
            .json()
            .map_err(transport_error)?;

        Ok(response.message.content.trim().to_owned())
    }
}
