// File: src/suggestions.rs
// Purpose: Country suggestions fetched from a remote lookup while the user types

use crate::controller::FormController;
use crate::field::Field;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Public REST Countries endpoint
pub const DEFAULT_LOOKUP_URL: &str = "https://restcountries.com/v2";

/// A country record as returned by the lookup; unknown fields are ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub flag: String,
}

/// A candidate value offered while typing into the country field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub flag_image_url: String,
}

impl From<CountryRecord> for Suggestion {
    fn from(record: CountryRecord) -> Self {
        Self {
            name: record.name,
            flag_image_url: record.flag,
        }
    }
}

/// Source of country records for a free-text query
#[async_trait]
pub trait CountryLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<CountryRecord>>;
}

/// Looks countries up over HTTP: `GET {base_url}/name/{query}`
#[derive(Debug, Clone)]
pub struct RestCountriesLookup {
    client: reqwest::Client,
    base_url: String,
}

impl RestCountriesLookup {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Request URL for a query; the query is a single encoded path segment
    pub fn url_for(&self, query: &str) -> String {
        format!("{}/name/{}", self.base_url, urlencoding::encode(query))
    }
}

#[async_trait]
impl CountryLookup for RestCountriesLookup {
    async fn lookup(&self, query: &str) -> Result<Vec<CountryRecord>> {
        let url = self.url_for(query);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Country lookup request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("Country lookup returned an error status: {}", url))?;

        response
            .json::<Vec<CountryRecord>>()
            .await
            .with_context(|| format!("Failed to decode country lookup response: {}", url))
    }
}

/// Outcome of a single [`SuggestionProvider::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionUpdate {
    /// Empty query; list cleared without a request
    Cleared,
    /// Lookup succeeded; list replaced with this many suggestions
    Applied(usize),
    /// Lookup failed; list cleared
    Failed,
    /// A newer query was issued while this one was in flight; result dropped
    Stale,
}

/// Keeps the suggestion list for the country field
///
/// Every lookup is tagged with a request id and only the most recently
/// issued request may replace the list, so slow responses never overwrite
/// newer ones. The list lock is never held across a lookup.
pub struct SuggestionProvider {
    lookup: Arc<dyn CountryLookup>,
    max_suggestions: usize,
    latest_request: AtomicU64,
    suggestions: RwLock<Vec<Suggestion>>,
    display_value: RwLock<String>,
}

impl SuggestionProvider {
    pub fn new(lookup: Arc<dyn CountryLookup>, max_suggestions: usize) -> Self {
        Self {
            lookup,
            max_suggestions,
            latest_request: AtomicU64::new(0),
            suggestions: RwLock::new(Vec::new()),
            display_value: RwLock::new(String::new()),
        }
    }

    /// Handle a keystroke in the country input
    pub async fn update(&self, query: &str) -> SuggestionUpdate {
        *self.display_value.write().await = query.to_string();

        // Any pending lookup is now stale, including for an empty query
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;

        let query = query.trim();
        if query.is_empty() {
            self.suggestions.write().await.clear();
            return SuggestionUpdate::Cleared;
        }

        debug!(request_id, query, "Looking up countries");
        let result = self.lookup.lookup(query).await;

        let mut suggestions = self.suggestions.write().await;
        if self.latest_request.load(Ordering::SeqCst) != request_id {
            debug!(request_id, "Dropping stale country lookup result");
            return SuggestionUpdate::Stale;
        }

        match result {
            Ok(records) => {
                *suggestions = records
                    .into_iter()
                    .take(self.max_suggestions)
                    .map(Suggestion::from)
                    .collect();
                SuggestionUpdate::Applied(suggestions.len())
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(error = %reason, query, "Country lookup failed");
                suggestions.clear();
                SuggestionUpdate::Failed
            }
        }
    }

    /// Accept a suggestion: it becomes both the display value and the form's country
    pub async fn select(&self, name: &str, form: &mut FormController) {
        // Invalidate anything still in flight so it cannot reopen the list
        self.latest_request.fetch_add(1, Ordering::SeqCst);
        *self.display_value.write().await = name.to_string();
        self.suggestions.write().await.clear();
        form.handle_change(Field::Country, name);
    }

    pub async fn clear(&self) {
        self.latest_request.fetch_add(1, Ordering::SeqCst);
        self.suggestions.write().await.clear();
    }

    /// Clear the list and the display value, as after a completed submit
    pub async fn reset(&self) {
        self.clear().await;
        self.display_value.write().await.clear();
    }

    /// Current suggestion list
    pub async fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions.read().await.clone()
    }

    /// Text currently shown in the country input
    pub async fn display_value(&self) -> String {
        self.display_value.read().await.clone()
    }
}

impl std::fmt::Debug for SuggestionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionProvider")
            .field("max_suggestions", &self.max_suggestions)
            .field("latest_request", &self.latest_request.load(Ordering::SeqCst))
            .finish()
    }
}
