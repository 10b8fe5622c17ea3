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

use serde::Deserialize;
use serde::Serialize;

/// The catalog's identifier for a card, e.g. `base1-4`. This is the only
/// piece of card data that is persisted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the catalog tells us about a card, minus the image bytes.
#[derive(Clone, PartialEq, Debug)]
pub struct CardDescriptor {
    pub id: CardId,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub rarity: Option<String>,
    pub primary_type: Option<String>,
    pub hit_points: Option<u32>,
}

impl CardDescriptor {
    /// A descriptor that only knows its identifier. Restored deck cards start
    /// out like this until the catalog answers.
    pub fn placeholder(id: CardId) -> Self {
        Self {
            id,
            name: None,
            image_url: None,
            rarity: None,
            primary_type: None,
            hit_points: None,
        }
    }
}

/// Downloaded card art.
#[derive(Clone, PartialEq, Debug)]
pub struct CardImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Card {
    descriptor: CardDescriptor,
    /// Card art. `None` until the image fetch completes, and forever if it
    /// fails.
    image: Option<CardImage>,
    /// Whether the card currently sits in one of the decks.
    in_deck: bool,
}

impl Card {
    pub fn new(descriptor: CardDescriptor) -> Self {
        Self {
            descriptor,
            image: None,
            in_deck: false,
        }
    }

    pub fn id(&self) -> &CardId {
        &self.descriptor.id
    }

    pub fn name(&self) -> Option<&str> {
        self.descriptor.name.as_deref()
    }

    pub fn rarity(&self) -> Option<&str> {
        self.descriptor.rarity.as_deref()
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.descriptor.primary_type.as_deref()
    }

    pub fn hit_points(&self) -> Option<u32> {
        self.descriptor.hit_points
    }

    pub fn image(&self) -> Option<&CardImage> {
        self.image.as_ref()
    }

    pub fn in_deck(&self) -> bool {
        self.in_deck
    }

    pub fn set_in_deck(&mut self, in_deck: bool) {
        self.in_deck = in_deck;
    }

    pub fn set_image(&mut self, image: CardImage) {
        self.image = Some(image);
    }

    /// Replace the card's data with a freshly fetched descriptor. The
    /// identifier never changes: a descriptor for a different card is
    /// rejected.
    pub fn fill(&mut self, descriptor: CardDescriptor) -> bool {
        if descriptor.id != self.descriptor.id {
            return false;
        }
        self.descriptor = descriptor;
        true
    }

    /// The name to show in listings.
    pub fn label(&self) -> &str {
        self.name().unwrap_or(self.descriptor.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_available() {
        let card = Card::new(CardDescriptor::placeholder(CardId::new("base1-4")));
        assert!(!card.in_deck());
        assert!(card.image().is_none());
        assert_eq!(card.label(), "base1-4");
    }

    #[test]
    fn test_fill_keeps_identity() {
        let id = CardId::new("base1-4");
        let mut card = Card::new(CardDescriptor::placeholder(id.clone()));
        let mut descriptor = CardDescriptor::placeholder(id);
        descriptor.name = Some("Charizard".to_string());
        descriptor.hit_points = Some(120);
        assert!(card.fill(descriptor));
        assert_eq!(card.label(), "Charizard");
        assert_eq!(card.hit_points(), Some(120));

        let other = CardDescriptor::placeholder(CardId::new("base1-5"));
        assert!(!card.fill(other));
        assert_eq!(card.id().as_str(), "base1-4");
    }

    #[test]
    fn test_card_id_serializes_as_string() {
        let json = serde_json::to_string(&CardId::new("xy1-1")).unwrap();
        assert_eq!(json, "\"xy1-1\"");
    }
}
