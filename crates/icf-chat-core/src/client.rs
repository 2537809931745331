use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::history::ConversationHistory;

/// Body of `POST /ask`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub history: ConversationHistory,
}

/// Successful reply from `POST /ask`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub history: ConversationHistory,
    #[serde(default)]
    pub context_chunks_found: Option<u32>,
}

#[derive(Clone)]
pub struct AskClient {
    client: Client,
    base_url: String,
}

impl AskClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ChatError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ChatError> {
        let url = format!("{}/ask", self.base_url);

        tracing::debug!(
            question_len = request.question.len(),
            history_len = request.history.len(),
            "sending question"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "ask request rejected");
            return Err(ChatError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let reply: AskResponse =
            serde_json::from_slice(&body).map_err(|e| ChatError::Decode(e.to_string()))?;

        tracing::info!(
            answer_len = reply.answer.len(),
            history_len = reply.history.len(),
            context_chunks = ?reply.context_chunks_found,
            "received answer"
        );

        Ok(reply)
    }

    pub async fn health(&self) -> Result<(), ChatError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}
