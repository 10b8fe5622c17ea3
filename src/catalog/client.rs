// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::header::CONTENT_TYPE;

use crate::catalog::api::CardsResponse;
use crate::config::Config;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::tracker::FetchGuard;
use crate::tracker::LoadTracker;
use crate::types::card::CardDescriptor;
use crate::types::card::CardId;
use crate::types::card::CardImage;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Errors that can occur when talking to the catalog.
#[derive(Debug, PartialEq)]
pub enum FetchError {
    /// The request never got a response (connection refused, timeout, ...).
    Transport(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The response body could not be understood.
    Decode(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::Status(code) => write!(f, "unexpected status: {code}"),
            FetchError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl From<FetchError> for ErrorReport {
    fn from(value: FetchError) -> Self {
        ErrorReport::new(value.to_string())
    }
}

/// Client for the card catalog. Cloning is cheap: clones share the
/// connection pool and the load tracker.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    api_url: String,
    api_key: Option<String>,
    page: u32,
    page_size: u32,
    tracker: Arc<LoadTracker>,
}

impl CatalogClient {
    pub fn new(config: &Config, tracker: Arc<LoadTracker>) -> Fallible<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            page: config.page,
            page_size: config.page_size,
            tracker,
        })
    }

    pub fn tracker(&self) -> &Arc<LoadTracker> {
        &self.tracker
    }

    /// Register a fetch with the load tracker. Call this before spawning the
    /// task that performs the fetch, and move the guard into the task.
    pub fn begin_fetch(&self) -> FetchGuard {
        self.tracker.begin_fetch()
    }

    /// Fetch the fixed catalog page used as the availables pool.
    pub async fn fetch_availables(&self) -> Result<Vec<CardDescriptor>, FetchError> {
        log::debug!(
            "Fetching catalog page {} (page size {}).",
            self.page,
            self.page_size
        );
        let request = self.http.get(&self.api_url).query(&[
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]);
        let response = self.send(request).await?;
        let cards = decode_cards(response).await?;
        log::debug!("Fetched {} cards.", cards.len());
        Ok(cards)
    }

    /// Fetch a single card's descriptor.
    pub async fn fetch_by_id(&self, id: &CardId) -> Result<CardDescriptor, FetchError> {
        log::debug!("Fetching card {id}.");
        let request = self
            .http
            .get(&self.api_url)
            .query(&[("q", format!("id:{id}"))]);
        let response = self.send(request).await?;
        let cards = decode_cards(response).await?;
        match cards.into_iter().find(|card| &card.id == id) {
            Some(card) => Ok(card),
            None => Err(FetchError::Decode(format!("card {id} not found"))),
        }
    }

    /// Fetch a card's art.
    pub async fn fetch_image(&self, url: &str) -> Result<CardImage, FetchError> {
        log::debug!("Fetching image {url}.");
        let response = self.send(self.http.get(url)).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(CardImage {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

async fn decode_cards(response: Response) -> Result<Vec<CardDescriptor>, FetchError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    let parsed: CardsResponse = serde_json::from_slice(&body)
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(parsed.data.into_iter().map(CardDescriptor::from).collect())
}
