//! Application state persisted in the key-value store.
//!
//! `AppState` is plain data: load it from a [`KvStore`], mutate it through the
//! methods below and write it back with [`AppState::save`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::gemini::{
    GeminiConfig, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_REASONING_MODEL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_VISION_MODEL,
};
use crate::ai::ComponentRecord;
use crate::store::{keys, KvStore, StoreError};

pub const DEFAULT_CREDITS: u32 = 50;
pub const HISTORY_LIMIT: usize = 50;
pub const SEARCH_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// `human` or `json`.
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_vision_model() -> String {
    DEFAULT_VISION_MODEL.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_reasoning_model() -> String {
    DEFAULT_REASONING_MODEL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_output_format() -> String {
    "human".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            vision_model: default_vision_model(),
            chat_model: default_chat_model(),
            reasoning_model: default_reasoning_model(),
            request_timeout_secs: default_timeout(),
            output_format: default_output_format(),
        }
    }
}

impl Settings {
    pub const KEYS: [&'static str; 6] = [
        "api_base_url",
        "vision_model",
        "chat_model",
        "reasoning_model",
        "request_timeout_secs",
        "output_format",
    ];

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api_base_url" => Some(self.api_base_url.clone()),
            "vision_model" => Some(self.vision_model.clone()),
            "chat_model" => Some(self.chat_model.clone()),
            "reasoning_model" => Some(self.reasoning_model.clone()),
            "request_timeout_secs" => Some(self.request_timeout_secs.to_string()),
            "output_format" => Some(self.output_format.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let value = value.trim();
        match key {
            "api_base_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(invalid());
                }
                self.api_base_url = value.to_string();
            }
            "vision_model" | "chat_model" | "reasoning_model" if value.is_empty() => {
                return Err(invalid())
            }
            "vision_model" => self.vision_model = value.to_string(),
            "chat_model" => self.chat_model = value.to_string(),
            "reasoning_model" => self.reasoning_model = value.to_string(),
            "request_timeout_secs" => {
                self.request_timeout_secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(invalid)?;
            }
            "output_format" => match value {
                "human" | "json" => self.output_format = value.to_string(),
                _ => return Err(invalid()),
            },
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            base_url: self.api_base_url.clone(),
            vision_model: self.vision_model.clone(),
            chat_model: self.chat_model.clone(),
            reasoning_model: self.reasoning_model.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub tier: UserTier,
    pub credits: u32,
    #[serde(default)]
    pub total_usage: u32,
}

impl Default for UserAccount {
    fn default() -> Self {
        Self {
            name: "Engineer".to_string(),
            role: "Hardware Engineer".to_string(),
            tier: UserTier::Free,
            credits: DEFAULT_CREDITS,
            total_usage: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub content: String,
    pub category: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub takeaway: String,
    #[serde(default)]
    pub affected: Vec<String>,
    #[serde(default)]
    pub scenarios: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryKind {
    Image,
    Chat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub task: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub account: UserAccount,
    pub news_favorites: Vec<NewsItem>,
    pub component_favorites: Vec<ComponentRecord>,
    pub history: Vec<HistoryItem>,
    pub search_history: Vec<String>,
    pub watchlist: Vec<String>,
    pub settings: Settings,
}

/// Read `key`, falling back to the default when it is absent or malformed.
fn load_or_default<T: DeserializeOwned + Default>(store: &KvStore, key: &str) -> Result<T, StoreError> {
    match store.get_json::<T>(key) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Ok(T::default()),
        Err(StoreError::Serialization(e)) => {
            tracing::warn!("Ignoring malformed store entry {}", e);
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

impl AppState {
    pub fn load(store: &KvStore) -> Result<Self, StoreError> {
        Ok(Self {
            account: load_or_default(store, keys::USER_ACCOUNT)?,
            news_favorites: load_or_default(store, keys::USER_FAVORITES)?,
            component_favorites: load_or_default(store, keys::COMP_FAVORITES)?,
            history: load_or_default(store, keys::AI_HISTORY)?,
            search_history: load_or_default(store, keys::SEARCH_HISTORY)?,
            watchlist: load_or_default(store, keys::WATCHLIST)?,
            settings: load_or_default(store, keys::SETTINGS)?,
        })
    }

    pub fn save(&self, store: &KvStore) -> Result<(), StoreError> {
        store.set_json(keys::USER_ACCOUNT, &self.account)?;
        store.set_json(keys::USER_FAVORITES, &self.news_favorites)?;
        store.set_json(keys::COMP_FAVORITES, &self.component_favorites)?;
        store.set_json(keys::AI_HISTORY, &self.history)?;
        store.set_json(keys::SEARCH_HISTORY, &self.search_history)?;
        store.set_json(keys::WATCHLIST, &self.watchlist)?;
        store.set_json(keys::SETTINGS, &self.settings)?;
        Ok(())
    }

    pub fn credits(&self) -> u32 {
        self.account.credits
    }

    /// Deduct `amount` credits if the balance covers it.
    pub fn consume(&mut self, amount: u32) -> bool {
        if self.account.credits >= amount {
            self.account.credits -= amount;
            self.account.total_usage = self.account.total_usage.saturating_add(amount);
            true
        } else {
            false
        }
    }

    pub fn add_credits(&mut self, amount: u32) {
        self.account.credits = self.account.credits.saturating_add(amount);
    }

    /// Undo a [`consume`](Self::consume) of `amount`.
    pub fn refund(&mut self, amount: u32) {
        self.account.credits = self.account.credits.saturating_add(amount);
        self.account.total_usage = self.account.total_usage.saturating_sub(amount);
    }

    /// Returns true when the item is a favorite afterwards.
    pub fn toggle_news_favorite(&mut self, item: NewsItem) -> bool {
        if let Some(pos) = self.news_favorites.iter().position(|f| f.id == item.id) {
            self.news_favorites.remove(pos);
            false
        } else {
            self.news_favorites.insert(0, item);
            true
        }
    }

    /// Returns true when the component is a favorite afterwards.
    pub fn toggle_component_favorite(&mut self, record: ComponentRecord) -> bool {
        if let Some(pos) = self.component_favorites.iter().position(|f| f.id == record.id) {
            self.component_favorites.remove(pos);
            false
        } else {
            self.component_favorites.insert(0, record);
            true
        }
    }

    pub fn is_news_favorite(&self, id: &str) -> bool {
        self.news_favorites.iter().any(|f| f.id == id)
    }

    pub fn is_component_favorite(&self, id: &str) -> bool {
        self.component_favorites.iter().any(|f| f.id == id)
    }

    pub fn record_history(
        &mut self,
        kind: HistoryKind,
        task: impl Into<String>,
        content: impl Into<String>,
        image: Option<String>,
    ) -> &HistoryItem {
        let item = HistoryItem {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            task: task.into(),
            timestamp: Utc::now(),
            content: content.into(),
            image,
        };
        self.history.insert(0, item);
        self.history.truncate(HISTORY_LIMIT);
        &self.history[0]
    }

    /// Move `query` to the front of the search history.
    pub fn record_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.search_history.retain(|q| q != query);
        self.search_history.insert(0, query.to_string());
        self.search_history.truncate(SEARCH_HISTORY_LIMIT);
    }

    /// Add an upper-cased ticker. Returns false for blanks and duplicates.
    pub fn watch(&mut self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() || self.watchlist.contains(&symbol) {
            return false;
        }
        self.watchlist.push(symbol);
        true
    }

    pub fn unwatch(&mut self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        let before = self.watchlist.len();
        self.watchlist.retain(|s| *s != symbol);
        self.watchlist.len() != before
    }
}
