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

use std::path::Path;

use serde::Serialize;

use crate::error::Fallible;
use crate::save::SaveFile;
use crate::save::SaveState;
use crate::types::card::CardId;
use crate::types::deck_index::DeckIndex;

pub fn print_decks(directory: &Path) -> Fallible<()> {
    let state: SaveState = SaveFile::new(directory).read();
    let json: String = decks_json(&state)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeckExport<'a> {
    name: String,
    card_ids: &'a [CardId],
}

fn decks_json(state: &SaveState) -> Fallible<String> {
    let decks: Vec<DeckExport> = DeckIndex::ALL
        .into_iter()
        .map(|deck| DeckExport {
            name: deck.to_string(),
            card_ids: state.deck(deck),
        })
        .collect();
    let json = serde_json::to_string_pretty(&decks)?;
    Ok(json)
}
