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

use crate::partition::Partition;
use crate::types::card::CardId;
use crate::types::deck_index::DeckIndex;
use crate::types::sort_key::SortKey;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Loading,
    Home,
    DeckBuilder,
    About,
}

/// Which list the sort panel was opened for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SortTarget {
    Availables,
    /// The deck being edited.
    Deck,
}

/// Everything the user can do.
#[derive(Clone, PartialEq, Debug)]
pub enum Action {
    Home,
    DeckBuilder,
    About,
    Save,
    Quit,
    ShowDeck(DeckIndex),
    /// The user clicked a card.
    Activate(CardId),
    /// Move the selected availables card into the active deck.
    SendToDeck,
    /// Move the selected deck card back to the availables.
    SendToAvailables,
    OpenSortPanel(SortTarget),
    CloseSortPanel,
    Sort(SortKey),
}

/// Follow-up work an action asks of the caller.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Effect {
    None,
    Save,
    Quit,
}

/// The screen state machine and the deck builder's selection state.
///
/// The controller starts on the loading screen, which only
/// [`ScreenController::finish_loading`] can leave. The home, deck builder and
/// about screens switch freely on user action.
#[derive(Debug)]
pub struct ScreenController {
    screen: Screen,
    partition: Partition,
    selected_available: Option<CardId>,
    selected_deck_card: Option<CardId>,
    sort_panel: Option<SortTarget>,
}

impl Default for ScreenController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenController {
    pub fn new() -> Self {
        Self {
            screen: Screen::Loading,
            partition: Partition::new(),
            selected_available: None,
            selected_deck_card: None,
            sort_panel: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn partition_mut(&mut self) -> &mut Partition {
        &mut self.partition
    }

    pub fn selected_available(&self) -> Option<&CardId> {
        self.selected_available.as_ref()
    }

    pub fn selected_deck_card(&self) -> Option<&CardId> {
        self.selected_deck_card.as_ref()
    }

    pub fn sort_panel(&self) -> Option<SortTarget> {
        self.sort_panel
    }

    /// Leave the loading screen. Returns `false` if loading had already
    /// finished.
    pub fn finish_loading(&mut self) -> bool {
        if self.screen != Screen::Loading {
            return false;
        }
        log::debug!("Loading complete.");
        self.screen = Screen::Home;
        true
    }

    pub fn apply(&mut self, action: Action) -> Effect {
        if self.screen == Screen::Loading && action != Action::Quit {
            log::debug!("Ignoring {action:?} while loading.");
            return Effect::None;
        }
        match action {
            Action::Home => self.switch(Screen::Home),
            Action::DeckBuilder => {
                self.switch(Screen::DeckBuilder);
                self.show_deck(DeckIndex::ALL[0]);
            }
            Action::About => self.switch(Screen::About),
            Action::Save => return Effect::Save,
            Action::Quit => return Effect::Quit,
            builder_action => {
                if self.screen != Screen::DeckBuilder {
                    log::debug!("Ignoring {builder_action:?} outside the deck builder.");
                    return Effect::None;
                }
                self.apply_builder(builder_action);
            }
        }
        Effect::None
    }

    fn apply_builder(&mut self, action: Action) {
        match action {
            Action::ShowDeck(deck) => self.show_deck(deck),
            Action::Activate(id) => self.activate(id),
            Action::SendToDeck => {
                if let Some(id) = self.selected_available.take() {
                    let deck = self.partition.active_deck();
                    self.partition.move_to_deck(&id, deck);
                }
            }
            Action::SendToAvailables => {
                if let Some(id) = self.selected_deck_card.take() {
                    self.partition.move_to_availables(&id);
                }
            }
            Action::OpenSortPanel(target) => self.sort_panel = Some(target),
            Action::CloseSortPanel => self.sort_panel = None,
            Action::Sort(key) => match self.sort_panel.take() {
                Some(SortTarget::Availables) => self.partition.sort_availables_by(key),
                Some(SortTarget::Deck) => {
                    let deck = self.partition.active_deck();
                    self.partition.sort_deck_by(deck, key);
                }
                None => log::debug!("Ignoring sort with no sort panel open."),
            },
            Action::Home
            | Action::DeckBuilder
            | Action::About
            | Action::Save
            | Action::Quit => {}
        }
    }

    fn switch(&mut self, screen: Screen) {
        log::debug!("Switching to {screen:?}.");
        self.screen = screen;
        self.sort_panel = None;
    }

    fn show_deck(&mut self, deck: DeckIndex) {
        if deck != self.partition.active_deck() {
            self.selected_deck_card = None;
        }
        self.partition.set_active_deck(deck);
    }

    /// Clicking a card selects it for preview; clicking the selected card
    /// again moves it to the other side.
    fn activate(&mut self, id: CardId) {
        let Some(card) = self.partition.card(&id) else {
            log::debug!("Ignoring click on unknown card {id}.");
            return;
        };
        if !card.in_deck() {
            if self.selected_available.as_ref() == Some(&id) {
                self.selected_available = None;
                let deck = self.partition.active_deck();
                self.partition.move_to_deck(&id, deck);
            } else {
                self.selected_available = Some(id);
            }
        } else if self.partition.is_visible(&id) {
            if self.selected_deck_card.as_ref() == Some(&id) {
                self.selected_deck_card = None;
                self.partition.move_to_availables(&id);
            } else {
                self.selected_deck_card = Some(id);
            }
        } else {
            log::debug!("Ignoring click on hidden card {id}.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::card;
    use crate::partition::Location;

    fn id(s: &str) -> CardId {
        CardId::new(s)
    }

    /// A controller past the loading screen, in the deck builder, with
    /// availables `a`, `b`, `c`.
    fn builder() -> ScreenController {
        let mut controller = ScreenController::new();
        for (name, hp) in [("a", 60), ("b", 120), ("c", 60)] {
            controller
                .partition_mut()
                .insert_available(card(name, Some(hp), "Fire", "Common"));
        }
        assert!(controller.finish_loading());
        controller.apply(Action::DeckBuilder);
        controller
    }

    fn available_ids(controller: &ScreenController) -> Vec<&str> {
        controller
            .partition()
            .availables()
            .iter()
            .map(|c| c.id().as_str())
            .collect()
    }

    #[test]
    fn test_starts_loading() {
        let controller = ScreenController::new();
        assert_eq!(controller.screen(), Screen::Loading);
    }

    #[test]
    fn test_navigation_ignored_while_loading() {
        let mut controller = ScreenController::new();
        assert_eq!(controller.apply(Action::DeckBuilder), Effect::None);
        assert_eq!(controller.apply(Action::About), Effect::None);
        assert_eq!(controller.apply(Action::Save), Effect::None);
        assert_eq!(controller.screen(), Screen::Loading);
        assert_eq!(controller.apply(Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_finish_loading_once() {
        let mut controller = ScreenController::new();
        assert!(controller.finish_loading());
        assert_eq!(controller.screen(), Screen::Home);
        assert!(!controller.finish_loading());
        assert_eq!(controller.screen(), Screen::Home);
    }

    #[test]
    fn test_menu_transitions() {
        let mut controller = ScreenController::new();
        controller.finish_loading();
        controller.apply(Action::About);
        assert_eq!(controller.screen(), Screen::About);
        controller.apply(Action::Home);
        assert_eq!(controller.screen(), Screen::Home);
        controller.apply(Action::DeckBuilder);
        assert_eq!(controller.screen(), Screen::DeckBuilder);
        controller.apply(Action::About);
        assert_eq!(controller.screen(), Screen::About);
        assert_eq!(controller.apply(Action::Save), Effect::Save);
        assert_eq!(controller.apply(Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_opening_builder_shows_first_deck() {
        let mut controller = builder();
        controller.apply(Action::ShowDeck(DeckIndex::ALL[2]));
        assert_eq!(controller.partition().active_deck(), DeckIndex::ALL[2]);
        controller.apply(Action::Home);
        controller.apply(Action::DeckBuilder);
        assert_eq!(controller.partition().active_deck(), DeckIndex::ALL[0]);
    }

    #[test]
    fn test_builder_actions_ignored_elsewhere() {
        let mut controller = builder();
        controller.apply(Action::Home);
        controller.apply(Action::Activate(id("a")));
        assert_eq!(controller.selected_available(), None);
    }

    #[test]
    fn test_activate_selects_then_moves() {
        let mut controller = builder();
        controller.apply(Action::ShowDeck(DeckIndex::ALL[1]));
        controller.apply(Action::Activate(id("a")));
        assert_eq!(controller.selected_available(), Some(&id("a")));
        assert_eq!(available_ids(&controller), vec!["a", "b", "c"]);

        controller.apply(Action::Activate(id("a")));
        assert_eq!(controller.selected_available(), None);
        assert_eq!(
            controller.partition().locate(&id("a")),
            Some(Location::Deck(DeckIndex::ALL[1]))
        );

        controller.apply(Action::Activate(id("a")));
        assert_eq!(controller.selected_deck_card(), Some(&id("a")));
        controller.apply(Action::Activate(id("a")));
        assert_eq!(controller.selected_deck_card(), None);
        assert_eq!(
            controller.partition().locate(&id("a")),
            Some(Location::Availables)
        );
    }

    #[test]
    fn test_selecting_another_card_replaces_selection() {
        let mut controller = builder();
        controller.apply(Action::Activate(id("a")));
        controller.apply(Action::Activate(id("b")));
        assert_eq!(controller.selected_available(), Some(&id("b")));
        assert_eq!(controller.partition().visible_deck().len(), 0);
    }

    #[test]
    fn test_send_buttons_use_selection() {
        let mut controller = builder();
        controller.apply(Action::SendToDeck);
        assert_eq!(controller.partition().visible_deck().len(), 0);

        controller.apply(Action::Activate(id("c")));
        controller.apply(Action::SendToDeck);
        assert_eq!(controller.selected_available(), None);
        assert_eq!(
            controller.partition().locate(&id("c")),
            Some(Location::Deck(DeckIndex::ALL[0]))
        );

        controller.apply(Action::Activate(id("c")));
        controller.apply(Action::SendToAvailables);
        assert_eq!(
            controller.partition().locate(&id("c")),
            Some(Location::Availables)
        );
        assert!(!controller.partition().card(&id("c")).unwrap().in_deck());
    }

    #[test]
    fn test_activate_routes_on_membership() {
        let mut controller = builder();
        let restored = card("r", Some(70), "Water", "Rare");
        let deck = DeckIndex::ALL[0];
        assert!(controller.partition_mut().insert_into_deck(restored, deck));
        assert!(controller.partition().card(&id("r")).unwrap().in_deck());

        controller.apply(Action::Activate(id("r")));
        assert_eq!(controller.selected_available(), None);
        assert_eq!(controller.selected_deck_card(), Some(&id("r")));

        controller.apply(Action::Activate(id("missing")));
        assert_eq!(controller.selected_available(), None);
        assert_eq!(controller.selected_deck_card(), Some(&id("r")));
    }

    #[test]
    fn test_hidden_deck_cards_ignore_clicks() {
        let mut controller = builder();
        controller.apply(Action::Activate(id("a")));
        controller.apply(Action::SendToDeck);
        controller.apply(Action::ShowDeck(DeckIndex::ALL[1]));
        controller.apply(Action::Activate(id("a")));
        assert_eq!(controller.selected_deck_card(), None);
    }

    #[test]
    fn test_switching_decks_clears_deck_selection() {
        let mut controller = builder();
        controller.apply(Action::Activate(id("a")));
        controller.apply(Action::SendToDeck);
        controller.apply(Action::Activate(id("a")));
        assert!(controller.selected_deck_card().is_some());
        controller.apply(Action::ShowDeck(DeckIndex::ALL[1]));
        assert_eq!(controller.selected_deck_card(), None);
    }

    #[test]
    fn test_sort_panel() {
        let mut controller = builder();
        controller.apply(Action::Sort(SortKey::HitPoints));
        assert_eq!(available_ids(&controller), vec!["a", "b", "c"]);

        controller.apply(Action::OpenSortPanel(SortTarget::Availables));
        assert_eq!(controller.sort_panel(), Some(SortTarget::Availables));
        controller.apply(Action::Sort(SortKey::HitPoints));
        assert_eq!(controller.sort_panel(), None);
        assert_eq!(available_ids(&controller), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_sort_active_deck() {
        let mut controller = builder();
        for name in ["b", "a"] {
            controller.apply(Action::Activate(id(name)));
            controller.apply(Action::SendToDeck);
        }
        controller.apply(Action::OpenSortPanel(SortTarget::Deck));
        controller.apply(Action::Sort(SortKey::HitPoints));
        let deck: Vec<&str> = controller
            .partition()
            .visible_deck()
            .iter()
            .map(|c| c.id().as_str())
            .collect();
        assert_eq!(deck, vec!["a", "b"]);
        assert_eq!(available_ids(&controller), vec!["c"]);
    }

    #[test]
    fn test_leaving_builder_closes_sort_panel() {
        let mut controller = builder();
        controller.apply(Action::OpenSortPanel(SortTarget::Deck));
        controller.apply(Action::Home);
        assert_eq!(controller.sort_panel(), None);
    }
}
