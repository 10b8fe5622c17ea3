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

use std::fs::read;
use std::fs::remove_file;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::partition::Partition;
use crate::types::card::CardId;
use crate::types::deck_index::DECK_COUNT;
use crate::types::deck_index::DeckIndex;

/// Name of the save file in the collection directory.
pub const SAVE_FILE: &str = "decks.json";

/// Version of the save file schema written by this build.
pub const SAVE_VERSION: u32 = 1;

/// The contents of the save file: the card identifiers of each deck, in
/// order. Top-level keys this version does not know about are carried along
/// so that saving does not drop them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    version: u32,
    decks: [Vec<CardId>; DECK_COUNT],
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Default for SaveState {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            decks: Default::default(),
            extra: Map::new(),
        }
    }
}

impl SaveState {
    pub fn deck(&self, deck: DeckIndex) -> &[CardId] {
        &self.decks[deck.get()]
    }

    pub fn into_decks(self) -> [Vec<CardId>; DECK_COUNT] {
        self.decks
    }

    pub fn is_empty(&self) -> bool {
        self.decks.iter().all(Vec::is_empty)
    }
}

/// Serialize the partition's decks, keeping any unknown keys from the
/// previously loaded state.
pub fn save(partition: &Partition, previous: &SaveState) -> Fallible<Vec<u8>> {
    let state = SaveState {
        version: SAVE_VERSION,
        decks: partition.deck_ids(),
        extra: previous.extra.clone(),
    };
    let bytes = serde_json::to_vec_pretty(&state)?;
    Ok(bytes)
}

pub fn load(bytes: &[u8]) -> Fallible<SaveState> {
    let state: SaveState = serde_json::from_slice(bytes)?;
    if state.version != SAVE_VERSION {
        return fail(format!("unsupported save file version: {}", state.version));
    }
    Ok(state)
}

/// The save file on disk.
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new(directory: &Path) -> Self {
        Self {
            path: directory.join(SAVE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved decks. A missing file means nothing has been saved
    /// yet; an unreadable or corrupt file is reported and treated the same
    /// way.
    pub fn read(&self) -> SaveState {
        if !self.path.exists() {
            log::debug!("No save file at {}.", self.path.display());
            return SaveState::default();
        }
        let result = read(&self.path)
            .map_err(ErrorReport::from)
            .and_then(|bytes| load(&bytes));
        match result {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Ignoring save file {}: {e}", self.path.display());
                SaveState::default()
            }
        }
    }

    /// Write the partition's decks. The new contents go to a temporary file
    /// that then replaces the old one, so a failed write leaves the previous
    /// save intact.
    pub fn write(&self, partition: &Partition) -> Fallible<()> {
        match self.write_inner(partition) {
            Ok(()) => {
                log::debug!("Saved decks to {}.", self.path.display());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save decks to {}: {e}", self.path.display());
                Err(e)
            }
        }
    }

    fn write_inner(&self, partition: &Partition) -> Fallible<()> {
        let previous = self.read();
        let bytes = save(partition, &previous)?;
        let directory = match self.path.parent() {
            Some(dir) => dir,
            None => return fail("save file has no parent directory."),
        };
        let mut tmp = NamedTempFile::new_in(directory)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// Delete the save file. Returns whether there was one.
    pub fn delete(&self) -> Fallible<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        remove_file(&self.path)?;
        log::debug!("Deleted save file {}.", self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir;
    use std::fs::read_to_string;
    use std::fs::write;

    use super::*;
    use crate::helper::card;
    use crate::helper::create_tmp_directory;

    fn id(s: &str) -> CardId {
        CardId::new(s)
    }

    /// Decks [["a1", "a2"], [], ["c1"]].
    fn sample_partition() -> Partition {
        let mut partition = Partition::new();
        partition.insert_into_deck(card("a1", None, "Fire", "Common"), DeckIndex::ALL[0]);
        partition.insert_into_deck(card("a2", None, "Fire", "Common"), DeckIndex::ALL[0]);
        partition.insert_into_deck(card("c1", None, "Fire", "Common"), DeckIndex::ALL[2]);
        partition.insert_available(card("free", None, "Fire", "Common"));
        partition
    }

    #[test]
    fn test_round_trip_keeps_empty_deck() -> Fallible<()> {
        let bytes = save(&sample_partition(), &SaveState::default())?;
        let state = load(&bytes)?;
        assert_eq!(
            state.into_decks(),
            [vec![id("a1"), id("a2")], vec![], vec![id("c1")]]
        );
        Ok(())
    }

    #[test]
    fn test_unknown_keys_preserved() -> Fallible<()> {
        let previous = load(
            br#"{"version": 1, "decks": [[], [], []], "favourite": {"deck": 2}, "theme": "dark"}"#,
        )?;
        let bytes = save(&sample_partition(), &previous)?;
        let value: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["favourite"]["deck"], 2);
        assert_eq!(value["decks"][0][1], "a2");
        Ok(())
    }

    #[test]
    fn test_load_rejects_other_versions() {
        assert!(load(br#"{"version": 2, "decks": [[], [], []]}"#).is_err());
    }

    #[test]
    fn test_load_rejects_wrong_deck_count() {
        assert!(load(br#"{"version": 1, "decks": [[], []]}"#).is_err());
    }

    #[test]
    fn test_missing_file_is_empty() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let file = SaveFile::new(&dir);
        let state = file.read();
        assert!(state.is_empty());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_empty() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        write(dir.join(SAVE_FILE), b"\x00\x01garbage")?;
        let file = SaveFile::new(&dir);
        assert!(file.read().is_empty());
        Ok(())
    }

    #[test]
    fn test_write_then_read() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let file = SaveFile::new(&dir);
        file.write(&sample_partition())?;
        let state = file.read();
        assert_eq!(state.deck(DeckIndex::ALL[0]), &[id("a1"), id("a2")]);
        assert!(state.deck(DeckIndex::ALL[1]).is_empty());
        assert_eq!(state.deck(DeckIndex::ALL[2]), &[id("c1")]);
        Ok(())
    }

    #[test]
    fn test_write_keeps_unknown_keys_on_disk() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        write(
            dir.join(SAVE_FILE),
            r#"{"version": 1, "decks": [["old"], [], []], "note": "hi"}"#,
        )?;
        let file = SaveFile::new(&dir);
        file.write(&sample_partition())?;
        let content = read_to_string(dir.join(SAVE_FILE))?;
        let value: Value = serde_json::from_str(&content)?;
        assert_eq!(value["note"], "hi");
        assert_eq!(value["decks"][0][0], "a1");
        Ok(())
    }

    /// If the save path cannot be replaced, the write fails and the old
    /// contents stay put.
    #[test]
    fn test_failed_write_leaves_previous_file() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        // A directory in place of the file makes the final rename fail.
        create_dir(dir.join(SAVE_FILE))?;
        write(dir.join(SAVE_FILE).join("keep"), b"kept")?;
        let file = SaveFile::new(&dir);
        assert!(file.write(&sample_partition()).is_err());
        assert_eq!(read_to_string(dir.join(SAVE_FILE).join("keep"))?, "kept");
        Ok(())
    }

    #[test]
    fn test_delete() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let file = SaveFile::new(&dir);
        assert!(!file.delete()?);
        file.write(&sample_partition())?;
        assert!(file.path().exists());
        assert!(file.delete()?);
        assert!(!file.path().exists());
        Ok(())
    }
}
