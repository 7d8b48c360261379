//! Ledger REST client: batch submission, status polling and state queries.
//!
//! # Responsibilities
//! - POST serialized batch lists and extract the tracking id from the link
//! - Long-poll batch status and map it onto `BatchStatus`
//! - Fetch raw state entries for the state reader
//!
//! A client is immutable once built. Endpoint changes go through
//! `LedgerHandle`, which swaps whole clients.

use serde::Deserialize;
use std::time::{Duration, Instant};
use url::Url;

use crate::ledger::protocol::{Batch, BatchList};
use crate::ledger::types::{BatchStatus, LedgerConfig, LedgerError, LedgerResult, Outcome};
use crate::observability::metrics;

/// Upper bound on `paging.next` links followed by a single state listing.
const MAX_STATE_PAGES: usize = 1000;

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    data: Vec<StatusEntry>,
}

#[derive(Debug, Deserialize)]
struct StatusEntry {
    #[serde(default)]
    id: Option<String>,
    status: String,
    #[serde(default)]
    invalid_transactions: Vec<InvalidTransaction>,
}

/// A rejected transaction as reported in a batch status.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InvalidTransaction {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    #[serde(default)]
    data: Vec<StateEntry>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default)]
    next: Option<String>,
}

/// A raw state entry: address plus base64 data.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StateEntry {
    pub address: String,
    pub data: String,
}

/// Extract the tracking id from a submission link such as
/// `http://ledger/batch_statuses?id=abc123`.
pub fn tracking_id_from_link(link: &str) -> LedgerResult<String> {
    let url = Url::parse(link)
        .or_else(|_| {
            Url::parse("http://ledger.invalid/").and_then(|base| base.join(link))
        })
        .map_err(|e| LedgerError::Protocol(format!("Unparseable link '{}': {}", link, e)))?;

    url.query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| LedgerError::Protocol(format!("Link '{}' carries no batch id", link)))
}

/// HTTP client for one ledger endpoint.
#[derive(Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    base_url: Url,
    config: LedgerConfig,
}

impl LedgerClient {
    /// Create a client for `config.url`.
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        let mut base_url: Url = config.url.parse().map_err(|e| {
            LedgerError::Validation(format!("Invalid ledger URL '{}': {}", config.url, e))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LedgerError::Network(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(url = %base_url, "Ledger client initialized");

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> LedgerResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| LedgerError::Validation(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// Submit a single batch and return its tracking id.
    pub async fn submit(&self, batch: &Batch) -> LedgerResult<String> {
        self.submit_list(&BatchList::from(batch.clone())).await
    }

    /// Submit a batch list. The tracking id covers every batch in the list.
    pub async fn submit_list(&self, list: &BatchList) -> LedgerResult<String> {
        let start = Instant::now();
        let url = self.endpoint("batches")?;

        let result: LedgerResult<String> = async {
            let response = self
                .http
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(list.to_bytes())
                .send()
                .await?;
            let body: SubmitResponse = read_json(response).await?;
            let link = body
                .link
                .ok_or_else(|| LedgerError::Protocol("Submit response has no link".into()))?;
            tracking_id_from_link(&link)
        }
        .await;

        metrics::record_request("batches", outcome_label(&result), start);
        match &result {
            Ok(id) => tracing::info!(
                batch_id = %id,
                batches = list.batches.len(),
                "Batch list submitted"
            ),
            Err(e) => tracing::warn!(error = %e, "Batch submission failed"),
        }
        result
    }

    /// Query a batch's status, letting the ledger hold the request for up
    /// to `wait_secs` while the batch is still pending.
    ///
    /// The long-poll gets its own deadline: `wait_secs` on top of the
    /// configured request timeout, whatever the configured wait is.
    pub async fn poll_status(&self, batch_id: &str, wait_secs: u64) -> LedgerResult<BatchStatus> {
        let start = Instant::now();
        let url = self.endpoint("batch_statuses")?;
        let wait = wait_secs.to_string();

        let result: LedgerResult<BatchStatus> = async {
            let response = self
                .http
                .get(url)
                .query(&[("id", batch_id), ("wait", wait.as_str())])
                .timeout(self.poll_deadline(wait_secs))
                .send()
                .await?;
            let body: StatusResponse = read_json(response).await?;
            let entry = pick_status_entry(body.data, batch_id)?;
            let message = entry
                .invalid_transactions
                .into_iter()
                .next()
                .map(|t| t.message);
            BatchStatus::from_code(&entry.status, message)
        }
        .await;

        metrics::record_request("batch_statuses", outcome_label(&result), start);
        match &result {
            Ok(status) => {
                metrics::record_batch_status(status.code());
                tracing::info!(batch_id = %batch_id, status = status.code(), "Batch status");
            }
            Err(e) => tracing::warn!(batch_id = %batch_id, error = %e, "Batch status poll failed"),
        }
        result
    }

    /// Submit `batch`, then poll its status once.
    ///
    /// If submission fails no poll is issued. If the poll fails after a
    /// successful submission the batch may or may not commit; the poll
    /// error is returned and the batch id is logged, so callers needing to
    /// resume should use `submit` and `poll_status` directly.
    pub async fn submit_and_confirm(&self, batch: &Batch, wait_secs: u64) -> LedgerResult<Outcome> {
        let batch_id = self.submit(batch).await?;
        match self.poll_status(&batch_id, wait_secs).await {
            Ok(status) => Ok(Outcome { batch_id, status }),
            Err(e) => {
                tracing::warn!(
                    batch_id = %batch_id,
                    error = %e,
                    "Batch submitted but status unknown"
                );
                Err(e)
            }
        }
    }

    /// Fetch every state entry whose address starts with `address_prefix`.
    pub async fn fetch_state(&self, address_prefix: &str) -> LedgerResult<Vec<StateEntry>> {
        let start = Instant::now();
        let mut url = self.endpoint("state")?;
        url.query_pairs_mut().append_pair("address", address_prefix);

        let result: LedgerResult<Vec<StateEntry>> = async {
            let mut entries = Vec::new();
            let mut next = Some(url);
            let mut pages = 0;

            while let Some(page_url) = next.take() {
                pages += 1;
                if pages > MAX_STATE_PAGES {
                    return Err(LedgerError::Protocol(format!(
                        "State listing exceeded {} pages",
                        MAX_STATE_PAGES
                    )));
                }

                let response = self.http.get(page_url).send().await?;
                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(LedgerError::NotFound(address_prefix.to_string()));
                }
                let body: StateResponse = read_json(response).await?;
                entries.extend(body.data);

                next = match body.paging.and_then(|p| p.next).filter(|n| !n.is_empty()) {
                    Some(link) => Some(Url::parse(&link).map_err(|e| {
                        LedgerError::Protocol(format!("Unparseable paging link '{}': {}", link, e))
                    })?),
                    None => None,
                };
            }
            Ok(entries)
        }
        .await;

        metrics::record_request("state", outcome_label(&result), start);
        if let Ok(entries) = &result {
            tracing::debug!(prefix = %address_prefix, entries = entries.len(), "State fetched");
        }
        result
    }

    fn poll_deadline(&self, wait_secs: u64) -> Duration {
        Duration::from_secs(wait_secs.saturating_add(self.config.request_timeout_secs))
    }

    /// Base URL requests are resolved against.
    pub fn url(&self) -> &Url {
        &self.base_url
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Default long-poll budget.
    pub fn wait_secs(&self) -> u64 {
        self.config.wait_secs
    }
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient")
            .field("url", &self.base_url.as_str())
            .field("wait_secs", &self.config.wait_secs)
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}

/// Check the HTTP status, then decode a JSON body.
async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> LedgerResult<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(LedgerError::Http {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    serde_json::from_slice(&body)
        .map_err(|e| LedgerError::Protocol(format!("Malformed response body: {}", e)))
}

/// Prefer the entry naming `batch_id`; fall back to the first one.
fn pick_status_entry(mut data: Vec<StatusEntry>, batch_id: &str) -> LedgerResult<StatusEntry> {
    if data.is_empty() {
        return Err(LedgerError::Protocol(format!(
            "Status response for {} has no entries",
            batch_id
        )));
    }
    let index = data
        .iter()
        .position(|e| e.id.as_deref() == Some(batch_id))
        .unwrap_or(0);
    Ok(data.swap_remove(index))
}

fn outcome_label<T>(result: &LedgerResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(LedgerError::Network(_)) => "network_error",
        Err(LedgerError::Http { .. }) => "http_error",
        Err(LedgerError::NotFound(_)) => "not_found",
        Err(_) => "protocol_error",
    }
}
