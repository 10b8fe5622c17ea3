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

use std::sync::Arc;
use std::sync::Mutex;

use crate::catalog::client::CatalogClient;
use crate::save::SaveState;
use crate::screen::ScreenController;
use crate::tracker::FetchGuard;
use crate::types::card::Card;
use crate::types::card::CardDescriptor;
use crate::types::card::CardId;
use crate::types::deck_index::DeckIndex;

/// Populate the partition and leave the loading screen once everything has
/// arrived.
///
/// Saved decks are restored first, as identifier-only placeholders that are
/// filled in as the catalog answers, so that a card in a saved deck is not
/// also added to the availables pool. Then the availables page is fetched.
/// Each card's art is fetched as soon as its image URL is known.
pub async fn load(
    catalog: CatalogClient,
    controller: Arc<Mutex<ScreenController>>,
    saved: SaveState,
) {
    restore_decks(&catalog, &controller, saved);
    tokio::spawn(load_availables(catalog.clone(), Arc::clone(&controller)));
    catalog.tracker().wait_until_loaded().await;
    let mut controller = controller.lock().unwrap();
    log::debug!("Loaded {} cards.", controller.partition().card_count());
    controller.finish_loading();
}

fn restore_decks(
    catalog: &CatalogClient,
    controller: &Arc<Mutex<ScreenController>>,
    saved: SaveState,
) {
    let mut pending: Vec<(CardId, FetchGuard)> = Vec::new();
    {
        let mut controller = controller.lock().unwrap();
        let partition = controller.partition_mut();
        for (deck, ids) in DeckIndex::ALL.into_iter().zip(saved.into_decks()) {
            for id in ids {
                let card = Card::new(CardDescriptor::placeholder(id.clone()));
                if partition.insert_into_deck(card, deck) {
                    pending.push((id, catalog.begin_fetch()));
                }
            }
        }
    }
    log::debug!("Restoring {} saved cards.", pending.len());
    for (id, guard) in pending {
        let task = restore_card(catalog.clone(), Arc::clone(controller), id, guard);
        tokio::spawn(task);
    }
    catalog.tracker().group_started();
}

async fn restore_card(
    catalog: CatalogClient,
    controller: Arc<Mutex<ScreenController>>,
    id: CardId,
    guard: FetchGuard,
) {
    match catalog.fetch_by_id(&id).await {
        Ok(descriptor) => {
            let image_url = descriptor.image_url.clone();
            {
                let mut controller = controller.lock().unwrap();
                if let Some(card) = controller.partition_mut().card_mut(&id) {
                    if !card.fill(descriptor) {
                        log::warn!("Catalog answered with another card for {id}.");
                    }
                }
            }
            // Registered while `guard` is still alive, so the active count
            // never drops to zero in between.
            if let Some(url) = image_url {
                fetch_image(&catalog, &controller, id, url);
            }
        }
        Err(e) => log::warn!("Failed to fetch card {id}: {e}"),
    }
    drop(guard);
}

async fn load_availables(catalog: CatalogClient, controller: Arc<Mutex<ScreenController>>) {
    match catalog.fetch_availables().await {
        Ok(descriptors) => {
            let mut images: Vec<(CardId, String)> = Vec::new();
            {
                let mut controller = controller.lock().unwrap();
                let partition = controller.partition_mut();
                for descriptor in descriptors {
                    let id = descriptor.id.clone();
                    let url = descriptor.image_url.clone();
                    if partition.insert_available(Card::new(descriptor)) {
                        if let Some(url) = url {
                            images.push((id, url));
                        }
                    }
                }
            }
            for (id, url) in images {
                fetch_image(&catalog, &controller, id, url);
            }
        }
        Err(e) => log::error!("Failed to fetch availables: {e}"),
    }
    catalog.tracker().group_started();
}

/// Fetch a card's art in the background and attach it when it arrives.
fn fetch_image(
    catalog: &CatalogClient,
    controller: &Arc<Mutex<ScreenController>>,
    id: CardId,
    url: String,
) {
    let guard = catalog.begin_fetch();
    let catalog = catalog.clone();
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        match catalog.fetch_image(&url).await {
            Ok(image) => {
                let mut controller = controller.lock().unwrap();
                if let Some(card) = controller.partition_mut().card_mut(&id) {
                    card.set_image(image);
                }
            }
            Err(e) => log::warn!("Failed to fetch image for {id}: {e}"),
        }
        drop(guard);
    });
}
