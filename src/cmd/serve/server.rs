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

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::sleep;

use crate::catalog::client::CatalogClient;
use crate::cmd::serve::get::get_handler;
use crate::cmd::serve::image::image_handler;
use crate::cmd::serve::post::post_handler;
use crate::cmd::serve::state::ServerState;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::loader::load;
use crate::save::SaveFile;
use crate::screen::ScreenController;
use crate::tracker::LoadTracker;

pub async fn start_server(directory: PathBuf, port: u16, open_browser: bool) -> Fallible<()> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let config = Config::load(&directory)?;
    if config.api_key.is_none() {
        log::debug!("No API key configured, using the anonymous rate limit.");
    }
    let tracker = Arc::new(LoadTracker::new());
    let catalog = CatalogClient::new(&config, Arc::clone(&tracker))?;
    let save_file = SaveFile::new(&directory);
    let saved = save_file.read();
    if saved.is_empty() {
        log::debug!("No saved decks to restore.");
    }
    let controller = Arc::new(Mutex::new(ScreenController::new()));

    tokio::spawn(load(catalog, Arc::clone(&controller), saved));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let state = ServerState {
        save_file: Arc::new(save_file),
        tracker,
        controller,
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/image/{id}", get(image_handler));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("127.0.0.1:{port}");

    if open_browser {
        // Open the browser once the server accepts connections.
        let url = format!("http://{bind}/");
        let probe = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&probe).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown_rx => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        })
        .await?;
    log::debug!("Server stopped.");
    Ok(())
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
