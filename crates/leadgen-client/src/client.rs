//! HTTP client for the lead-generation dashboard REST API.
//!
//! Wraps `reqwest` with bearer-token auth, per-call timeouts (generation runs
//! far longer than reads), error-body extraction, and retry for idempotent
//! reads. Non-2xx answers surface as [`ClientError::NotFound`] or
//! [`ClientError::Api`] carrying the server's message.

use std::time::Duration;

use async_trait::async_trait;
use leadgen_core::{AppConfig, Business, BusinessId, Evaluation, TemplateSet};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::service::TemplateService;
use crate::types::{ErrorBody, EvaluationRequest, GenerateRequest, TemplateListResponse};

/// Tunables for [`LeadgenClient`], usually derived from [`AppConfig`].
#[derive(Clone)]
pub struct ClientSettings {
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub generation_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            request_timeout_secs: 30,
            generation_timeout_secs: 120,
            user_agent: "leadgen/0.1 (template-preview)".to_string(),
            max_retries: 2,
            retry_backoff_base_ms: 500,
        }
    }
}

impl From<&AppConfig> for ClientSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_token: config.api_token.clone(),
            request_timeout_secs: config.request_timeout_secs,
            generation_timeout_secs: config.generation_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

/// Client for the dashboard API.
///
/// Use [`LeadgenClient::new`] with loaded config, or
/// [`LeadgenClient::with_base_url`] to point at a mock server in tests.
pub struct LeadgenClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
    generation_timeout: Duration,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl LeadgenClient {
    /// Creates a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured API URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.api_base_url, ClientSettings::from(config))
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str, settings: ClientSettings) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        // A trailing slash makes `Url::join` append to the path instead of
        // replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            api_token: settings.api_token,
            generation_timeout: Duration::from_secs(settings.generation_timeout_secs),
            max_retries: settings.max_retries,
            retry_backoff_base_ms: settings.retry_backoff_base_ms,
        })
    }

    /// Fetches a single business by ID.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the business does not exist.
    /// - [`ClientError::Api`] on any other non-2xx status (5xx retried first).
    /// - [`ClientError::Http`] on network failure after retries.
    /// - [`ClientError::Deserialize`] if the body has an unexpected shape.
    pub async fn fetch_business(&self, business_id: BusinessId) -> Result<Business, ClientError> {
        let url = self.endpoint(&format!("api/businesses/{business_id}"))?;
        self.get_json(&url, &format!("getBusiness(id={business_id})"))
            .await
    }

    /// Fetches the latest evaluation, mapping 404 to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Same as [`LeadgenClient::fetch_business`], except a 404 is not an error.
    pub async fn fetch_evaluation(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<Evaluation>, ClientError> {
        let url = self.endpoint(&format!("api/businesses/{business_id}/evaluation"))?;
        match self
            .get_json::<Evaluation>(&url, &format!("getEvaluation(id={business_id})"))
            .await
        {
            Ok(evaluation) => Ok(Some(evaluation)),
            Err(ClientError::NotFound { .. }) => {
                tracing::debug!(%business_id, "no evaluation recorded yet");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Runs a website evaluation. Not retried.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the business does not exist.
    /// - [`ClientError::Api`] if the evaluation fails server-side.
    /// - [`ClientError::Http`] / [`ClientError::Deserialize`] as usual.
    pub async fn create_evaluation(
        &self,
        business_id: BusinessId,
    ) -> Result<Evaluation, ClientError> {
        let url = self.endpoint("api/evaluations")?;
        let request = self
            .client
            .post(url)
            .json(&EvaluationRequest { business_id });
        self.send_json(request, &format!("triggerEvaluation(id={business_id})"))
            .await
    }

    /// Lists existing templates for a business, ordered by variant number.
    ///
    /// # Errors
    ///
    /// Same as [`LeadgenClient::fetch_business`].
    pub async fn fetch_templates(
        &self,
        business_id: BusinessId,
    ) -> Result<TemplateSet, ClientError> {
        let url = self.endpoint(&format!("api/businesses/{business_id}/templates"))?;
        let envelope: TemplateListResponse = self
            .get_json(&url, &format!("listTemplates(id={business_id})"))
            .await?;
        tracing::debug!(%business_id, count = envelope.templates.len(), "listed templates");
        Ok(envelope.templates)
    }

    /// Asks the server to generate `count` variants. Not retried; uses the
    /// generation timeout.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with the server's message when generation fails
    ///   or templates already exist (400).
    /// - [`ClientError::NotFound`] if the business does not exist.
    /// - [`ClientError::Http`] on network failure or timeout.
    pub async fn create_templates(
        &self,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError> {
        self.post_generation("generate", business_id, count).await
    }

    /// Asks the server to discard the current set and generate a new one.
    ///
    /// # Errors
    ///
    /// Same as [`LeadgenClient::create_templates`].
    pub async fn recreate_templates(
        &self,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError> {
        self.post_generation("regenerate", business_id, count).await
    }

    async fn post_generation(
        &self,
        action: &str,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError> {
        let url = self.endpoint(&format!("api/businesses/{business_id}/templates/{action}"))?;
        let request = self
            .client
            .post(url)
            .timeout(self.generation_timeout)
            .json(&GenerateRequest {
                num_variants: count,
            });
        let envelope: TemplateListResponse = self
            .send_json(request, &format!("{action}Templates(id={business_id}, count={count})"))
            .await?;
        tracing::info!(
            %business_id,
            action,
            requested = count,
            received = envelope.templates.len(),
            total = envelope.total,
            "template generation finished"
        );
        Ok(envelope.templates)
    }

    /// Resolves a path relative to the API base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// `GET` with retry on transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, ClientError> {
        retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            self.send_json(self.client.get(url.clone()), context)
        })
        .await
    }

    /// Sends a request, maps the status to a typed error, and parses the body.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] on 404.
    /// - [`ClientError::Api`] on any other non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body does not parse as `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        tracing::debug!(context, "dashboard API request");
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                context: context.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                context: context.to_string(),
                message: extract_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Pulls the server's explanation out of an error body, if it has one.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
}

#[async_trait]
impl TemplateService for LeadgenClient {
    async fn get_business(&self, business_id: BusinessId) -> Result<Business, ClientError> {
        self.fetch_business(business_id).await
    }

    async fn get_evaluation(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<Evaluation>, ClientError> {
        self.fetch_evaluation(business_id).await
    }

    async fn trigger_evaluation(
        &self,
        business_id: BusinessId,
    ) -> Result<Evaluation, ClientError> {
        self.create_evaluation(business_id).await
    }

    async fn list_templates(&self, business_id: BusinessId) -> Result<TemplateSet, ClientError> {
        self.fetch_templates(business_id).await
    }

    async fn generate_templates(
        &self,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError> {
        self.create_templates(business_id, count).await
    }

    async fn regenerate_templates(
        &self,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError> {
        self.recreate_templates(business_id, count).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
