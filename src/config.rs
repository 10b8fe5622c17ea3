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

use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Fallible;

/// Name of the optional configuration file in the collection directory.
pub const CONFIG_FILE: &str = "pokedeck.toml";

/// Environment variable holding the catalog API key. Takes precedence over
/// the key in the configuration file.
pub const API_KEY_VAR: &str = "POKEDECK_API_KEY";

const DEFAULT_API_URL: &str = "https://api.pokemontcg.io/v2/cards";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The catalog's card endpoint.
    pub api_url: String,
    /// Sent as `X-Api-Key` when present. The catalog works without one, at a
    /// lower rate limit.
    pub api_key: Option<String>,
    /// Which catalog page to use as the availables pool.
    pub page: u32,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            page: 1,
            page_size: 250,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load the configuration for a collection directory. A missing file
    /// yields the defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        let mut config = if path.exists() {
            log::debug!("Loading configuration from {}.", path.display());
            let content = read_to_string(&path)?;
            Self::parse(&content)?
        } else {
            Self::default()
        };
        config.override_api_key(std::env::var(API_KEY_VAR).ok());
        Ok(config)
    }

    /// Replace the API key with one from the environment. Blank values are
    /// ignored.
    fn override_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key {
            let key = key.trim();
            if !key.is_empty() {
                self.api_key = Some(key.to_string());
            }
        }
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
