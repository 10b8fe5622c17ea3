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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;
use crate::error::Fallible;
use crate::error::fail;
use crate::screen::Action;
use crate::screen::Effect;
use crate::screen::SortTarget;
use crate::types::card::CardId;
use crate::types::deck_index::DeckIndex;
use crate::types::sort_key::SortKey;

#[derive(Debug, Deserialize)]
enum ActionName {
    Home,
    DeckBuilder,
    About,
    Save,
    Quit,
    ShowDeck,
    Activate,
    SendToDeck,
    SendToAvailables,
    OpenSortPanel,
    CloseSortPanel,
    Sort,
}

#[derive(Debug, Deserialize)]
pub struct FormData {
    action: ActionName,
    card: Option<String>,
    deck: Option<usize>,
    key: Option<String>,
    target: Option<String>,
}

impl FormData {
    fn into_action(self) -> Fallible<Action> {
        let action = match self.action {
            ActionName::Home => Action::Home,
            ActionName::DeckBuilder => Action::DeckBuilder,
            ActionName::About => Action::About,
            ActionName::Save => Action::Save,
            ActionName::Quit => Action::Quit,
            ActionName::ShowDeck => match self.deck {
                Some(deck) => Action::ShowDeck(DeckIndex::try_from(deck)?),
                None => return fail("missing deck."),
            },
            ActionName::Activate => match self.card {
                Some(card) => Action::Activate(CardId::new(card)),
                None => return fail("missing card."),
            },
            ActionName::SendToDeck => Action::SendToDeck,
            ActionName::SendToAvailables => Action::SendToAvailables,
            ActionName::OpenSortPanel => match self.target.as_deref() {
                Some("availables") => Action::OpenSortPanel(SortTarget::Availables),
                Some("deck") => Action::OpenSortPanel(SortTarget::Deck),
                _ => return fail("invalid sort target."),
            },
            ActionName::CloseSortPanel => Action::CloseSortPanel,
            ActionName::Sort => match self.key.as_deref() {
                Some(key) => Action::Sort(SortKey::try_from(key)?),
                None => return fail("missing sort key."),
            },
        };
        Ok(action)
    }
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(&state, form) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to("/")
}

fn action_handler(state: &ServerState, form: FormData) -> Fallible<()> {
    let action = form.into_action()?;
    let mut controller = state.controller.lock().unwrap();
    match controller.apply(action) {
        Effect::None => {}
        Effect::Save => {
            state.save_file.write(controller.partition())?;
        }
        Effect::Quit => {
            log::debug!("Shutting down.");
            if let Some(tx) = state.shutdown_tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
        }
    }
    Ok(())
}
