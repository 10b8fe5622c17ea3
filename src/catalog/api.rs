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

//! Response shapes of the catalog's card endpoint.

use serde::Deserialize;

use crate::types::card::CardDescriptor;
use crate::types::card::CardId;

#[derive(Debug, Deserialize)]
pub struct CardsResponse {
    pub data: Vec<ApiCard>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCard {
    pub id: String,
    pub name: Option<String>,
    pub rarity: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    /// The catalog sends hit points as a string.
    pub hp: Option<String>,
    pub images: Option<ApiImages>,
}

#[derive(Debug, Deserialize)]
pub struct ApiImages {
    pub small: Option<String>,
    pub large: Option<String>,
}

impl From<ApiCard> for CardDescriptor {
    fn from(card: ApiCard) -> Self {
        let hit_points = card.hp.and_then(|hp| hp.trim().parse::<u32>().ok());
        let primary_type = card.types.into_iter().next();
        let image_url = card.images.and_then(|images| images.small.or(images.large));
        CardDescriptor {
            id: CardId::new(card.id),
            name: card.name,
            image_url,
            rarity: card.rarity,
            primary_type,
            hit_points,
        }
    }
}
