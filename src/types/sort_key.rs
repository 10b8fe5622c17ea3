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

use std::cmp::Ordering;

use crate::error::ErrorReport;
use crate::error::fail;
use crate::types::card::Card;

/// The attributes a card list can be sorted by.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SortKey {
    Type,
    HitPoints,
    Rarity,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Type, SortKey::HitPoints, SortKey::Rarity];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Type => "type",
            SortKey::HitPoints => "hp",
            SortKey::Rarity => "rarity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Type => "Type",
            SortKey::HitPoints => "HP",
            SortKey::Rarity => "Rarity",
        }
    }

    /// Compare two cards by this key. Cards missing the attribute sort
    /// first.
    pub fn compare(&self, a: &Card, b: &Card) -> Ordering {
        match self {
            SortKey::Type => a.primary_type().cmp(&b.primary_type()),
            SortKey::HitPoints => a.hit_points().cmp(&b.hit_points()),
            SortKey::Rarity => a.rarity().cmp(&b.rarity()),
        }
    }
}

impl TryFrom<&str> for SortKey {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "type" => Ok(SortKey::Type),
            "hp" => Ok(SortKey::HitPoints),
            "rarity" => Ok(SortKey::Rarity),
            _ => fail(format!("invalid sort key: {value}")),
        }
    }
}
