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

use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::deck_index::DECK_COUNT;
use crate::types::deck_index::DeckIndex;
use crate::types::sort_key::SortKey;

/// Where a card currently lives.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Location {
    Availables,
    Deck(DeckIndex),
}

/// The split of all known cards into the availables pool and the decks.
///
/// Every card identifier appears in at most one list, and a card's `in_deck`
/// flag is set exactly when it lives in a deck.
#[derive(Clone, Debug, Default)]
pub struct Partition {
    availables: Vec<Card>,
    decks: [Vec<Card>; DECK_COUNT],
    active_deck: DeckIndex,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn availables(&self) -> &[Card] {
        &self.availables
    }

    pub fn deck(&self, deck: DeckIndex) -> &[Card] {
        &self.decks[deck.get()]
    }

    pub fn active_deck(&self) -> DeckIndex {
        self.active_deck
    }

    /// The cards of the deck currently being edited.
    pub fn visible_deck(&self) -> &[Card] {
        self.deck(self.active_deck)
    }

    /// The identifiers in each deck, in order.
    pub fn deck_ids(&self) -> [Vec<CardId>; DECK_COUNT] {
        DeckIndex::ALL.map(|deck| card_ids(self.deck(deck)))
    }

    /// The number of cards across all lists.
    pub fn card_count(&self) -> usize {
        self.availables.len() + self.decks.iter().map(Vec::len).sum::<usize>()
    }

    pub fn locate(&self, id: &CardId) -> Option<Location> {
        if self.availables.iter().any(|c| c.id() == id) {
            return Some(Location::Availables);
        }
        DeckIndex::ALL
            .into_iter()
            .find(|deck| self.deck(*deck).iter().any(|c| c.id() == id))
            .map(Location::Deck)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.availables
            .iter()
            .chain(self.decks.iter().flatten())
            .find(|c| c.id() == id)
    }

    pub fn card_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.availables
            .iter_mut()
            .chain(self.decks.iter_mut().flatten())
            .find(|c| c.id() == id)
    }

    /// Add a freshly fetched card to the availables pool. Returns `false`,
    /// leaving the partition unchanged, if a card with the same identifier is
    /// already present.
    pub fn insert_available(&mut self, mut card: Card) -> bool {
        if self.locate(card.id()).is_some() {
            log::debug!("Card {} is already present.", card.id());
            return false;
        }
        card.set_in_deck(false);
        self.availables.push(card);
        true
    }

    /// Add a card straight into a deck, as when restoring saved decks.
    /// Returns `false` if a card with the same identifier is already present.
    pub fn insert_into_deck(&mut self, mut card: Card, deck: DeckIndex) -> bool {
        if self.locate(card.id()).is_some() {
            log::debug!("Card {} is already present.", card.id());
            return false;
        }
        card.set_in_deck(true);
        self.decks[deck.get()].push(card);
        true
    }

    /// Move a card from wherever it is to the end of `deck`. Returns whether
    /// anything moved: unknown cards and cards already in `deck` are left
    /// alone.
    pub fn move_to_deck(&mut self, id: &CardId, deck: DeckIndex) -> bool {
        match self.locate(id) {
            None => {
                log::debug!("Card {id} not found, ignoring move to {deck}.");
                false
            }
            Some(Location::Deck(current)) if current == deck => false,
            Some(_) => match self.take(id) {
                Some(mut card) => {
                    card.set_in_deck(true);
                    self.decks[deck.get()].push(card);
                    true
                }
                None => false,
            },
        }
    }

    /// Move a card from its deck to the end of the availables pool. Returns
    /// whether anything moved.
    pub fn move_to_availables(&mut self, id: &CardId) -> bool {
        match self.locate(id) {
            None => {
                log::debug!("Card {id} not found, ignoring move to availables.");
                false
            }
            Some(Location::Availables) => false,
            Some(Location::Deck(_)) => match self.take(id) {
                Some(mut card) => {
                    card.set_in_deck(false);
                    self.availables.push(card);
                    true
                }
                None => false,
            },
        }
    }

    /// Stable sort of the availables pool.
    pub fn sort_availables_by(&mut self, key: SortKey) {
        self.availables.sort_by(|a, b| key.compare(a, b));
    }

    /// Stable sort of one deck.
    pub fn sort_deck_by(&mut self, deck: DeckIndex, key: SortKey) {
        self.decks[deck.get()].sort_by(|a, b| key.compare(a, b));
    }

    pub fn set_active_deck(&mut self, deck: DeckIndex) {
        if deck != self.active_deck {
            log::debug!("Showing {deck}.");
        }
        self.active_deck = deck;
    }

    /// Whether a card is currently shown: the availables pool is always
    /// shown, decks only while active.
    pub fn is_visible(&self, id: &CardId) -> bool {
        match self.locate(id) {
            Some(Location::Availables) => true,
            Some(Location::Deck(deck)) => deck == self.active_deck,
            None => false,
        }
    }

    fn take(&mut self, id: &CardId) -> Option<Card> {
        let lists = std::iter::once(&mut self.availables).chain(&mut self.decks);
        for list in lists {
            if let Some(index) = list.iter().position(|c| c.id() == id) {
                return Some(list.remove(index));
            }
        }
        None
    }
}

fn card_ids(cards: &[Card]) -> Vec<CardId> {
    cards.iter().map(|c| c.id().clone()).collect()
}
