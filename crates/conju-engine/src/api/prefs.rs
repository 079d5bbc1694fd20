use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::error::PrefsError;
use crate::api::locale::Language;

pub const KEY_LANGUAGE: &str = "conju.language";
pub const KEY_TENSES: &str = "conju.tenses";
pub const KEY_ONBOARDING: &str = "conju.onboarding_seen";

/// String key-value persistence (browser `localStorage`, a file, memory).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Learner preferences that survive a reload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub language: Language,
    /// Tenses to practise; empty means all.
    pub tenses: Vec<String>,
    pub onboarding_seen: bool,
}

impl Preferences {
    /// Read preferences; absent keys keep their defaults.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, PrefsError> {
        let mut prefs = Preferences::default();
        if let Some(code) = store.get(KEY_LANGUAGE) {
            prefs.language = Language::from_code(&code).ok_or(PrefsError::UnknownLanguage(code))?;
        }
        if let Some(raw) = store.get(KEY_TENSES) {
            prefs.tenses = serde_json::from_str(&raw)
                .map_err(|source| PrefsError::Json { key: KEY_TENSES, source })?;
        }
        if let Some(raw) = store.get(KEY_ONBOARDING) {
            prefs.onboarding_seen = raw == "true";
        }
        Ok(prefs)
    }

    /// Like [`Preferences::load`], but a corrupt store yields defaults.
    pub fn load_or_default(store: &dyn KeyValueStore) -> Self {
        Self::load(store).unwrap_or_else(|e| {
            log::warn!("ignoring stored preferences: {}", e);
            Preferences::default()
        })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        store.set(KEY_LANGUAGE, self.language.code());
        match serde_json::to_string(&self.tenses) {
            Ok(json) => store.set(KEY_TENSES, &json),
            Err(e) => log::error!("could not encode tenses: {}", e),
        }
        store.set(KEY_ONBOARDING, if self.onboarding_seen { "true" } else { "false" });
    }
}
