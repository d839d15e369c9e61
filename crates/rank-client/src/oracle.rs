//! HTTP client for the ranking oracle and the oracle-backed `Ranker`.
//!
//! The oracle is any OpenAI-compatible chat completions endpoint. One
//! request per ranking attempt, no retry; every failure falls back to the
//! genre scorer over the same inputs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use data_loader::{CatalogItem, ItemId};
use pipeline::{DEFAULT_LIMIT, GenreScorer};
use sources::UserContext;

use crate::config::OracleConfig;
use crate::error::RankingError;
use crate::parse::extract_item_ids;
use crate::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::Ranker;

/// Thin wrapper over one reusable `reqwest::Client`.
///
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct OracleClient {
    client: Client,
    config: OracleConfig,
}

impl OracleClient {
    /// Build the transport once; the configured timeout applies to every call.
    pub fn new(config: OracleConfig) -> Result<Self, RankingError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        info!(
            url = %config.completions_url(),
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "Ranking oracle client ready"
        );
        Ok(Self { client, config })
    }

    /// Send one chat completion and return the assistant's text.
    pub async fn complete(&self, prompt: &str) -> Result<String, RankingError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
        };

        let mut builder = self
            .client
            .post(self.config.completions_url())
            .json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RankingError::Status { status, body });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| RankingError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RankingError::InvalidResponse("No content in oracle reply".to_string()))
    }
}

/// `Ranker` backed by the oracle, with the genre scorer as failure path.
#[derive(Clone)]
pub struct OracleRanker {
    client: OracleClient,
    fallback: GenreScorer,
    limit: usize,
}

impl OracleRanker {
    pub fn new(client: OracleClient) -> Self {
        Self {
            client,
            fallback: GenreScorer::new().with_limit(DEFAULT_LIMIT),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Convenience constructor straight from configuration
    pub fn from_config(config: OracleConfig) -> Result<Self, RankingError> {
        Ok(Self::new(OracleClient::new(config)?))
    }

    fn fallback(&self, context: &UserContext, catalog: &[CatalogItem]) -> Vec<ItemId> {
        self.fallback.score(&context.liked, &context.disliked, catalog)
    }
}

#[async_trait]
impl Ranker for OracleRanker {
    fn name(&self) -> &'static str {
        "oracle"
    }

    #[instrument(skip(self, context, catalog), fields(user_id = context.user_id, catalog = catalog.len()))]
    async fn rank(&self, context: &UserContext, catalog: &[CatalogItem]) -> Vec<ItemId> {
        // Nothing to rank: no network call
        if catalog.is_empty() {
            debug!("Empty catalog, skipping oracle call");
            return Vec::new();
        }

        let prompt = build_prompt(context, catalog, self.limit);
        let start = Instant::now();

        match self.client.complete(&prompt).await {
            Ok(reply) => {
                let ids = extract_item_ids(&reply, self.limit);
                if ids.is_empty() {
                    warn!(
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Oracle reply contained no usable ids"
                    );
                } else {
                    debug!(
                        returned = ids.len(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Oracle ranking received"
                    );
                }
                ids
            }
            Err(e) => {
                warn!(
                    error = %e,
                    timeout = e.is_timeout(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Oracle call failed, falling back to genre scoring"
                );
                self.fallback(context, catalog)
            }
        }
    }
}

// OpenAI-compatible wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: Option<String>,
}
