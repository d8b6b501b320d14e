//! Page audio: looping background music plus one-shot effects, all gated by
//! the persisted [`AudioSettings`].

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAudioElement, HtmlInputElement, Storage};

use super::optional_element;
use crate::error::PageResult;
use crate::settings::{self, AudioPatch, AudioSettings, SettingsStore};

const BGM_SRC: &str = "assets/bgm.mp3";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sfx {
    Catch,
    Miss,
    Win,
    Click,
}

impl Sfx {
    fn src(self) -> &'static str {
        match self {
            Sfx::Catch => "assets/catch.mp3",
            Sfx::Miss => "assets/miss.mp3",
            Sfx::Win => "assets/win.mp3",
            Sfx::Click => "assets/click.mp3",
        }
    }
}

/// `localStorage` adapter; browsers may deny storage (private mode, file://).
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, audio settings will not persist");
        }
        Self { storage }
    }
}

impl SettingsStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        let storage = self.storage.as_ref().ok_or_else(|| "localStorage unavailable".to_string())?;
        storage.set_item(key, value).map_err(|e| format!("{e:?}"))
    }
}

fn make_audio(src: &str, looped: bool) -> PageResult<HtmlAudioElement> {
    let audio = HtmlAudioElement::new_with_src(src)?;
    audio.set_loop(looped);
    audio.set_preload("auto");
    Ok(audio)
}

struct Controls {
    music_btn: Option<Element>,
    mute_btn: Option<Element>,
    volume: Option<HtmlInputElement>,
}

pub struct AudioBank {
    store: LocalStore,
    bgm: HtmlAudioElement,
    catch: HtmlAudioElement,
    miss: HtmlAudioElement,
    win: HtmlAudioElement,
    click: HtmlAudioElement,
    controls: Controls,
    unlocked: bool,
    // Swallows autoplay rejections so they do not surface as uncaught errors.
    on_rejected: Closure<dyn FnMut(JsValue)>,
}

impl AudioBank {
    pub fn load(doc: &Document) -> PageResult<Self> {
        let controls = Controls {
            music_btn: doc.get_element_by_id("musicBtn"),
            mute_btn: doc.get_element_by_id("muteBtn"),
            volume: optional_element(doc, "vol")?,
        };
        Ok(Self {
            store: LocalStore::open(),
            bgm: make_audio(BGM_SRC, true)?,
            catch: make_audio(Sfx::Catch.src(), false)?,
            miss: make_audio(Sfx::Miss.src(), false)?,
            win: make_audio(Sfx::Win.src(), false)?,
            click: make_audio(Sfx::Click.src(), false)?,
            controls,
            unlocked: false,
            on_rejected: Closure::wrap(Box::new(|err: JsValue| {
                tracing::debug!(?err, "audio playback rejected");
            }) as Box<dyn FnMut(JsValue)>),
        })
    }

    pub fn settings(&self) -> AudioSettings {
        settings::load(&self.store)
    }

    fn element(&self, sfx: Sfx) -> &HtmlAudioElement {
        match sfx {
            Sfx::Catch => &self.catch,
            Sfx::Miss => &self.miss,
            Sfx::Win => &self.win,
            Sfx::Click => &self.click,
        }
    }

    fn play(&self, audio: &HtmlAudioElement) {
        match audio.play() {
            Ok(promise) => {
                let _ = promise.catch(&self.on_rejected);
            }
            Err(err) => tracing::debug!(?err, "audio play threw"),
        }
    }

    /// Restart the effect from the top; silent while muted.
    pub fn play_sfx(&self, sfx: Sfx) {
        let s = self.settings();
        if !s.sfx_allowed() {
            return;
        }
        let audio = self.element(sfx);
        audio.set_current_time(0.0);
        audio.set_volume(s.sfx_volume);
        self.play(audio);
    }

    pub fn start_bgm(&self) {
        let s = self.settings();
        if s.muted || !s.music_on {
            return;
        }
        self.bgm.set_volume(s.music_volume);
        self.play(&self.bgm);
    }

    pub fn stop_bgm(&self) {
        if let Err(err) = self.bgm.pause() {
            tracing::debug!(?err, "audio pause threw");
        }
    }

    /// First user gesture on the page: music may start from now on.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        tracing::debug!("audio unlocked");
        self.start_bgm();
        self.sync_controls();
    }

    /// Persist a toggle and bring playback and labels in line with it.
    pub fn update_settings(&mut self, patch: AudioPatch) {
        let s = settings::update(&self.store, patch);
        if s.music_allowed(self.unlocked) {
            self.start_bgm();
        } else {
            self.stop_bgm();
        }
        self.sync_controls();
    }

    pub fn set_music_volume(&mut self, volume: f64) {
        let s = settings::update(&self.store, AudioPatch { music_volume: Some(volume), ..AudioPatch::default() });
        self.bgm.set_volume(s.music_volume);
    }

    /// Refresh button labels and the slider from the stored settings.
    pub fn sync_controls(&self) {
        let s = self.settings();
        if let Some(btn) = &self.controls.music_btn {
            btn.set_text_content(Some(s.music_label()));
        }
        if let Some(btn) = &self.controls.mute_btn {
            btn.set_text_content(Some(s.mute_label()));
        }
        if let Some(slider) = &self.controls.volume {
            slider.set_value(&s.music_volume.to_string());
        }
        self.bgm.set_volume(s.music_volume);
        if s.muted || !s.music_on {
            self.stop_bgm();
        }
    }
}
