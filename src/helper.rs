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

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use serde_json::Value;
use serde_json::json;
use tempfile::tempdir;
use tokio::net::TcpListener;

use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::CardDescriptor;
use crate::types::card::CardId;

/// A 1x1 transparent PNG.
pub const PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

/// Create a fresh temporary directory that outlives the call.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let dir: PathBuf = tempdir()?.keep().canonicalize()?;
    Ok(dir)
}

/// Build a card with the given sortable attributes.
pub fn card(id: &str, hp: Option<u32>, kind: &str, rarity: &str) -> Card {
    Card::new(CardDescriptor {
        id: CardId::new(id),
        name: Some(id.to_uppercase()),
        image_url: None,
        rarity: Some(rarity.to_string()),
        primary_type: Some(kind.to_string()),
        hit_points: hp,
    })
}

/// A card served by the mock catalog.
#[derive(Clone)]
pub struct MockCard {
    id: String,
    name: String,
    hp: Option<u32>,
    kind: String,
    rarity: String,
    /// Whether the card's image URL resolves.
    image: bool,
}

impl MockCard {
    pub fn new(id: &str, name: &str, hp: Option<u32>, kind: &str, rarity: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            hp,
            kind: kind.to_string(),
            rarity: rarity.to_string(),
            image: true,
        }
    }

    /// Make the card's image URL return 404.
    pub fn without_image(mut self) -> Self {
        self.image = false;
        self
    }

    fn to_json(&self, base: &str) -> Value {
        let image = if self.image {
            format!("{base}/images/{}.png", self.id)
        } else {
            format!("{base}/images/missing.png")
        };
        json!({
            "id": self.id,
            "name": self.name,
            "hp": self.hp.map(|hp| hp.to_string()),
            "types": [self.kind],
            "rarity": self.rarity,
            "images": { "small": image },
        })
    }
}

#[derive(Clone)]
struct MockState {
    base: String,
    cards: Vec<MockCard>,
    api_key: Option<String>,
}

pub struct MockCatalog {
    base: String,
}

impl MockCatalog {
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn api_url(&self) -> String {
        format!("{}/v2/cards", self.base)
    }

    /// An endpoint that accepts requests and never answers them.
    pub fn stalled_url(&self) -> String {
        format!("{}/stalled/v2/cards", self.base)
    }
}

/// Serve a fake card catalog on a free local port. If `api_key` is given,
/// card requests without a matching `X-Api-Key` header get a 403.
pub async fn start_mock_catalog(
    cards: Vec<MockCard>,
    api_key: Option<&str>,
) -> Fallible<MockCatalog> {
    let port = portpicker::pick_unused_port().expect("no free port");
    let bind = format!("127.0.0.1:{port}");
    let base = format!("http://{bind}");
    let state = MockState {
        base: base.clone(),
        cards,
        api_key: api_key.map(|k| k.to_string()),
    };
    let app = Router::new()
        .route("/v2/cards", get(mock_cards))
        .route("/images/{name}", get(mock_image))
        .route("/garbage", get(mock_garbage))
        .route("/stalled/v2/cards", get(mock_stalled))
        .with_state(state);
    let listener = TcpListener::bind(&bind).await?;
    tokio::spawn(async move { axum::serve(listener, app).await });
    Ok(MockCatalog { base })
}

async fn mock_cards(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(key) = &state.api_key {
        let sent = headers.get("X-Api-Key").and_then(|v| v.to_str().ok());
        if sent != Some(key.as_str()) {
            return StatusCode::FORBIDDEN.into_response();
        }
    }
    let cards: Vec<Value> = match query.get("q").and_then(|q| q.strip_prefix("id:")) {
        Some(id) => state
            .cards
            .iter()
            .filter(|card| card.id == id)
            .map(|card| card.to_json(&state.base))
            .collect(),
        None => {
            let page_size = query
                .get("pageSize")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(250);
            state
                .cards
                .iter()
                .take(page_size)
                .map(|card| card.to_json(&state.base))
                .collect()
        }
    };
    Json(json!({ "data": cards })).into_response()
}

async fn mock_image(Path(name): Path<String>) -> Response {
    if name.starts_with("missing") {
        return StatusCode::NOT_FOUND.into_response();
    }
    (StatusCode::OK, [(CONTENT_TYPE, "image/png")], PNG).into_response()
}

async fn mock_garbage() -> &'static str {
    "<html>not json</html>"
}

async fn mock_stalled() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_directory() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        assert!(dir.exists());
        assert!(dir.is_dir());
        Ok(())
    }
}
