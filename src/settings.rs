//! Audio preferences persisted as a small JSON blob (localStorage in the browser).

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

pub const AUDIO_SETTINGS_KEY: &str = "valentine_audio_settings_v1";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioSettings {
    pub muted: bool,
    pub music_on: bool,
    pub music_volume: f64,
    pub sfx_volume: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { muted: false, music_on: true, music_volume: 0.25, sfx_volume: 0.7 }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioPatch {
    pub muted: Option<bool>,
    pub music_on: Option<bool>,
    pub music_volume: Option<f64>,
    pub sfx_volume: Option<f64>,
}

impl AudioSettings {
    pub fn apply(self, patch: AudioPatch) -> Self {
        Self {
            muted: patch.muted.unwrap_or(self.muted),
            music_on: patch.music_on.unwrap_or(self.music_on),
            music_volume: patch.music_volume.unwrap_or(self.music_volume),
            sfx_volume: patch.sfx_volume.unwrap_or(self.sfx_volume),
        }
    }

    /// Volumes outside `[0, 1]` make `HTMLMediaElement.volume` throw, so stored
    /// values are forced into range; non-finite ones fall back to the default.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let fix = |v: f64, fallback: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { fallback };
        Self {
            music_volume: fix(self.music_volume, d.music_volume),
            sfx_volume: fix(self.sfx_volume, d.sfx_volume),
            ..self
        }
    }

    /// Sound effects play unless muted.
    pub fn sfx_allowed(&self) -> bool {
        !self.muted
    }

    /// Background music may only play once the page has seen a user gesture.
    pub fn music_allowed(&self, unlocked: bool) -> bool {
        unlocked && !self.muted && self.music_on
    }

    pub fn music_label(&self) -> &'static str {
        if self.music_on { "Music: On" } else { "Music: Off" }
    }

    pub fn mute_label(&self) -> &'static str {
        if self.muted { "Mute: On" } else { "Mute: Off" }
    }
}

/// Key/value backend. Failures are reported as strings and never fatal.
pub trait SettingsStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
}

/// Any missing or malformed blob falls back to the defaults.
pub fn load(store: &dyn SettingsStore) -> AudioSettings {
    match store.get_item(AUDIO_SETTINGS_KEY) {
        Some(raw) => serde_json::from_str::<Option<AudioSettings>>(&raw)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "discarding malformed audio settings");
                None
            })
            .unwrap_or_default()
            .sanitized(),
        None => AudioSettings::default(),
    }
}

/// Merge `patch` over the stored value, write it back, and return the result.
pub fn update(store: &dyn SettingsStore, patch: AudioPatch) -> AudioSettings {
    let next = load(store).apply(patch).sanitized();
    match serde_json::to_string(&next) {
        Ok(json) => {
            if let Err(err) = store.set_item(AUDIO_SETTINGS_KEY, &json) {
                tracing::warn!(%err, "could not persist audio settings");
            }
        }
        Err(err) => tracing::warn!(%err, "could not encode audio settings"),
    }
    next
}

/// In-memory store, used when localStorage is unavailable and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl SettingsStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
