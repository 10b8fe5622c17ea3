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

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// The number of decks a user can build.
pub const DECK_COUNT: usize = 3;

/// Index of one of the decks. Always in `0..DECK_COUNT`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct DeckIndex(usize);

impl DeckIndex {
    pub const ALL: [DeckIndex; DECK_COUNT] = [DeckIndex(0), DeckIndex(1), DeckIndex(2)];

    pub fn new(index: usize) -> Fallible<Self> {
        if index < DECK_COUNT {
            Ok(Self(index))
        } else {
            fail(format!("deck index out of range: {index}"))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for DeckIndex {
    type Error = ErrorReport;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        DeckIndex::new(value)
    }
}

impl Display for DeckIndex {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Decks are numbered from one in the interface.
        write!(f, "Deck {}", self.0 + 1)
    }
}
