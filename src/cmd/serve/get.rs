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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::cmd::serve::image::image_url;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::page_template;
use crate::partition::Partition;
use crate::screen::Screen;
use crate::screen::ScreenController;
use crate::screen::SortTarget;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::deck_index::DeckIndex;
use crate::types::sort_key::SortKey;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let controller = state.controller.lock().unwrap();
    let (body, refresh) = match controller.screen() {
        Screen::Loading => (loading(&state), true),
        Screen::Home => (home(), false),
        Screen::About => (about(), false),
        Screen::DeckBuilder => (builder(&controller), false),
    };
    let html = page_template(body, refresh);
    (StatusCode::OK, Html(html.into_string()))
}

fn loading(state: &ServerState) -> Markup {
    let active = state.tracker.active_fetches();
    html! {
        div.screen.loading {
            h1.loading-text {
                "Loading"
                span.dot { " ." }
                span.dot { " ." }
                span.dot { " ." }
            }
            @if active > 0 {
                p.progress { (active) " requests in flight" }
            }
        }
    }
}

fn home() -> Markup {
    html! {
        div.screen.home {
            h1 { "pokedeck" }
            form.menu action="/" method="post" {
                input id="builder" type="submit" name="action" value="DeckBuilder";
                input id="about" type="submit" name="action" value="About";
                input id="quit" type="submit" name="action" value="Quit";
            }
        }
    }
}

fn about() -> Markup {
    html! {
        div.screen.about {
            h1 { "About" }
            p {
                "Build up to three decks from the Pokémon TCG catalog. "
                "Click a card to preview it, click it again to move it. "
                "Decks are saved to the collection directory."
            }
            form action="/" method="post" {
                input id="home" type="submit" name="action" value="Home";
            }
        }
    }
}

fn builder(controller: &ScreenController) -> Markup {
    let partition = controller.partition();
    let active = partition.active_deck();
    let selected_available = controller.selected_available();
    let selected_deck_card = controller.selected_deck_card();
    html! {
        div.screen.builder {
            div.toolbar {
                form action="/" method="post" {
                    input id="home" type="submit" name="action" value="Home";
                    input id="save" type="submit" name="action" value="Save";
                }
                div.decks {
                    @for deck in DeckIndex::ALL {
                        form action="/" method="post" {
                            input type="hidden" name="deck" value=(deck.get());
                            @if deck == active {
                                button.active type="submit" name="action" value="ShowDeck"
                                    disabled {
                                    (deck.to_string()) " (" (partition.deck(deck).len()) ")"
                                }
                            } @else {
                                button type="submit" name="action" value="ShowDeck" {
                                    (deck.to_string()) " (" (partition.deck(deck).len()) ")"
                                }
                            }
                        }
                    }
                }
            }
            @if let Some(target) = controller.sort_panel() {
                (sort_panel(target))
            }
            div.columns {
                div.column {
                    div.column-header {
                        h2 { "Available (" (partition.availables().len()) ")" }
                        (sort_button(SortTarget::Availables))
                    }
                    (preview(partition, selected_available, "SendToDeck", "To deck"))
                    (grid(partition.availables(), selected_available))
                }
                div.column {
                    div.column-header {
                        h2 { (active.to_string()) " (" (partition.visible_deck().len()) ")" }
                        (sort_button(SortTarget::Deck))
                    }
                    (preview(partition, selected_deck_card, "SendToAvailables", "To availables"))
                    (grid(partition.visible_deck(), selected_deck_card))
                }
            }
        }
    }
}

fn sort_button(target: SortTarget) -> Markup {
    let value = target_value(target);
    html! {
        form action="/" method="post" {
            input type="hidden" name="target" value=(value);
            button type="submit" name="action" value="OpenSortPanel" { "Sort" }
        }
    }
}

fn sort_panel(target: SortTarget) -> Markup {
    let title = match target {
        SortTarget::Availables => "Sort availables by",
        SortTarget::Deck => "Sort deck by",
    };
    html! {
        div.sort-panel {
            h3 { (title) }
            @for key in SortKey::ALL {
                form action="/" method="post" {
                    input type="hidden" name="key" value=(key.as_str());
                    button type="submit" name="action" value="Sort" { (key.label()) }
                }
            }
            form action="/" method="post" {
                input type="submit" name="action" value="CloseSortPanel";
            }
        }
    }
}

fn preview(partition: &Partition, selected: Option<&CardId>, action: &str, label: &str) -> Markup {
    let card = selected.and_then(|id| partition.card(id));
    html! {
        div.preview {
            @match card {
                Some(card) => {
                    @if card.image().is_some() {
                        img src=(image_url(card.id())) alt=(card.label());
                    }
                    div.details {
                        h3 { (card.label()) }
                        (details(card))
                    }
                    form action="/" method="post" {
                        button type="submit" name="action" value=(action) { (label) }
                    }
                }
                None => {
                    form action="/" method="post" {
                        button type="submit" name="action" value=(action) disabled { (label) }
                    }
                }
            }
        }
    }
}

fn details(card: &Card) -> Markup {
    html! {
        dl {
            dt { "Type" }
            dd { (card.primary_type().unwrap_or("-")) }
            dt { "HP" }
            dd {
                @match card.hit_points() {
                    Some(hp) => { (hp) }
                    None => { "-" }
                }
            }
            dt { "Rarity" }
            dd { (card.rarity().unwrap_or("-")) }
        }
    }
}

fn grid(cards: &[Card], selected: Option<&CardId>) -> Markup {
    html! {
        div.grid {
            @for card in cards {
                form action="/" method="post" {
                    input type="hidden" name="card" value=(card.id().as_str());
                    @let class = if Some(card.id()) == selected { "card selected" } else { "card" };
                    button class=(class) type="submit" name="action" value="Activate"
                        title=(card.label()) {
                        @if card.image().is_some() {
                            img src=(image_url(card.id())) alt=(card.label());
                        } @else {
                            span.placeholder { (card.label()) }
                        }
                    }
                }
            }
        }
    }
}

fn target_value(target: SortTarget) -> &'static str {
    match target {
        SortTarget::Availables => "availables",
        SortTarget::Deck => "deck",
    }
}
