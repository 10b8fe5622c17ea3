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

use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

use crate::cmd::serve::state::ServerState;
use crate::types::card::CardId;

const CACHE_IMMUTABLE: &str = "public, max-age=604800, immutable";

/// The URL under which a card's art is served.
pub fn image_url(id: &CardId) -> String {
    let escaped = utf8_percent_encode(id.as_str(), NON_ALPHANUMERIC);
    format!("/image/{escaped}")
}

pub async fn image_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Response {
    let id = CardId::new(id);
    let image = {
        let controller = state.controller.lock().unwrap();
        controller
            .partition()
            .card(&id)
            .and_then(|card| card.image())
            .cloned()
    };
    match image {
        Some(image) => {
            let headers: [(HeaderName, String); 2] = [
                (CONTENT_TYPE, image.content_type),
                (CACHE_CONTROL, CACHE_IMMUTABLE.to_string()),
            ];
            (StatusCode::OK, headers, image.bytes).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
