//! Browser glue: binds the pure [`Game`] to the page's canvas, HUD, overlay,
//! audio and input, and drives it from `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement,
    KeyboardEvent, PointerEvent, Window,
};

use crate::config::{self, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, GameConfig};
use crate::error::{PageError, PageResult};
use crate::game::{self, Game, GameEvent, Input};
use crate::rng::Rng;
use crate::settings::AudioPatch;

mod audio;
mod overlay;
pub mod page;
mod render;

use audio::{AudioBank, Sfx};
use overlay::WinOverlay;

const GAME_OVER_MESSAGE: &str = "Nooo 😭 Try again!";

pub(crate) fn window() -> PageResult<Window> {
    web_sys::window().ok_or(PageError::NoWindow)
}

pub(crate) fn document() -> PageResult<Document> {
    window()?.document().ok_or(PageError::NoDocument)
}

/// Look up `#id` and cast it, `Ok(None)` when the page simply lacks it.
pub(crate) fn optional_element<T: JsCast>(doc: &Document, id: &'static str) -> PageResult<Option<T>> {
    match doc.get_element_by_id(id) {
        Some(el) => el
            .dyn_into::<T>()
            .map(Some)
            .map_err(|_| PageError::WrongElementType { id, expected: std::any::type_name::<T>() }),
        None => Ok(None),
    }
}

pub(crate) fn page_test_mode() -> bool {
    window()
        .ok()
        .and_then(|w| w.location().search().ok())
        .map(|q| config::is_test_mode(&q))
        .unwrap_or(false)
}

struct Hud {
    caught: Option<Element>,
    missed: Option<Element>,
}

impl Hud {
    fn update(&self, game: &Game) {
        if let Some(el) = &self.caught {
            el.set_text_content(Some(&game.caught().to_string()));
        }
        if let Some(el) = &self.missed {
            el.set_text_content(Some(&game.missed().to_string()));
        }
    }
}

struct DebugBox {
    container: Element,
    text: Element,
}

/// Runtime state for the mounted mini-game.
struct CatchState {
    game: Game,
    input: Input,
    rng: Rng,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    hud: Hud,
    overlay: Option<WinOverlay>,
    audio: AudioBank,
    debug: Option<DebugBox>,
}

impl CatchState {
    fn reset(&mut self) {
        self.game.reset();
        self.hud.update(&self.game);
        if let Some(ov) = &self.overlay {
            ov.hide();
        }
        tracing::info!("round started");
    }

    fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            tracing::debug!(?event, caught = self.game.caught(), missed = self.game.missed());
            match event {
                GameEvent::Caught => {
                    self.audio.play_sfx(Sfx::Catch);
                    self.hud.update(&self.game);
                }
                GameEvent::Missed => {
                    self.audio.play_sfx(Sfx::Miss);
                    self.hud.update(&self.game);
                }
                GameEvent::Won => {
                    self.audio.play_sfx(Sfx::Win);
                    if let Some(ov) = &self.overlay {
                        ov.show();
                    }
                }
                GameEvent::GameOver => {
                    if let Ok(w) = window() {
                        w.alert_with_message(GAME_OVER_MESSAGE).ok();
                    }
                }
            }
        }
    }

    /// Maps a viewport x coordinate onto the canvas' internal resolution.
    fn pointer_to_canvas_x(&self, client_x: f64) -> f64 {
        let rect = self.canvas.get_bounding_client_rect();
        game::client_to_canvas_x(client_x, rect.left(), rect.width(), self.canvas.width() as f64)
    }
}

thread_local! {
    static CATCH_STATE: RefCell<Option<CatchState>> = const { RefCell::new(None) };
}

/// Run `f` against the mounted game, if any. Returns `None` before mount.
fn with_state<R>(f: impl FnOnce(&mut CatchState) -> R) -> Option<R> {
    CATCH_STATE.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub(crate) fn start_catch_game() -> PageResult<()> {
    let win = window()?;
    let doc = document()?;
    let test_mode = page_test_mode();
    crate::logging::init(test_mode);

    // Reuse the page canvas; create one only for bare host pages.
    let canvas: HtmlCanvasElement = match optional_element(&doc, "game")? {
        Some(c) => c,
        None => {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")?
                .dyn_into()
                .map_err(|_| PageError::WrongElementType { id: "game", expected: "HtmlCanvasElement" })?;
            c.set_id("game");
            c.set_width(DEFAULT_CANVAS_WIDTH);
            c.set_height(DEFAULT_CANVAS_HEIGHT);
            doc.body().ok_or(PageError::MissingElement("body"))?.append_child(&c)?;
            c
        }
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(PageError::NoContext)?
        .dyn_into()
        .map_err(|_| PageError::NoContext)?;

    let config = GameConfig::default().with_test_mode(test_mode);
    let game = Game::new(config, canvas.width() as f64, canvas.height() as f64);
    let hud = Hud { caught: doc.get_element_by_id("caught"), missed: doc.get_element_by_id("missed") };
    let debug = match (doc.get_element_by_id("debugBox"), doc.get_element_by_id("debugText")) {
        (Some(container), Some(text)) if test_mode => Some(DebugBox { container, text }),
        _ => None,
    };
    let overlay = WinOverlay::bind(&doc);
    let audio = AudioBank::load(&doc)?;

    let mut state = CatchState {
        game,
        input: Input::default(),
        rng: Rng::from_entropy(),
        canvas: canvas.clone(),
        ctx,
        hud,
        overlay,
        audio,
        debug,
    };
    state.audio.sync_controls();
    state.reset();
    CATCH_STATE.with(|cell| cell.replace(Some(state)));

    install_audio_controls(&win, &doc)?;
    install_keyboard(&win)?;
    install_pointer(&canvas)?;
    install_buttons(&doc)?;

    tracing::info!(test_mode, width = canvas.width(), height = canvas.height(), "heart catch mounted");
    start_catch_loop();
    Ok(())
}

fn install_audio_controls(win: &Window, doc: &Document) -> PageResult<()> {
    // Browsers only allow playback after a gesture on this page.
    {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::once(move |_evt: web_sys::Event| {
            with_state(|st| st.audio.unlock());
        });
        let opts = web_sys::AddEventListenerOptions::new();
        opts.set_once(true);
        win.add_event_listener_with_callback_and_add_event_listener_options(
            "pointerdown",
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        closure.forget();
    }

    if let Some(btn) = doc.get_element_by_id("musicBtn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_state(|st| {
                st.audio.play_sfx(Sfx::Click);
                let on = st.audio.settings().music_on;
                st.audio.update_settings(AudioPatch { music_on: Some(!on), ..AudioPatch::default() });
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(btn) = doc.get_element_by_id("muteBtn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_state(|st| {
                st.audio.play_sfx(Sfx::Click);
                let muted = st.audio.settings().muted;
                st.audio.update_settings(AudioPatch { muted: Some(!muted), ..AudioPatch::default() });
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(slider) = optional_element::<HtmlInputElement>(doc, "vol")? {
        let input = slider.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let Ok(v) = input.value().parse::<f64>() else { return };
            with_state(|st| st.audio.set_music_volume(v.clamp(0.0, 1.0)));
        }) as Box<dyn FnMut(_)>);
        slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn install_keyboard(win: &Window) -> PageResult<()> {
    let down = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        with_state(|st| match evt.key().as_str() {
            "ArrowLeft" => st.input.left = true,
            "ArrowRight" => st.input.right = true,
            _ => {}
        });
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("keydown", down.as_ref().unchecked_ref())?;
    down.forget();

    let up = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        with_state(|st| match evt.key().as_str() {
            "ArrowLeft" => st.input.left = false,
            "ArrowRight" => st.input.right = false,
            _ => {}
        });
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("keyup", up.as_ref().unchecked_ref())?;
    up.forget();
    Ok(())
}

fn install_pointer(canvas: &HtmlCanvasElement) -> PageResult<()> {
    {
        let capture = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
            with_state(|st| {
                st.input.pointer_active = true;
                let x = st.pointer_to_canvas_x(evt.client_x() as f64);
                st.game.set_pointer_x(x);
            });
            capture.set_pointer_capture(evt.pointer_id()).ok();
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
            with_state(|st| {
                if !st.input.pointer_active {
                    return;
                }
                let x = st.pointer_to_canvas_x(evt.client_x() as f64);
                st.game.set_pointer_x(x);
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: PointerEvent| {
            with_state(|st| st.input.pointer_active = false);
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn install_buttons(doc: &Document) -> PageResult<()> {
    if let Some(btn) = doc.get_element_by_id("restartBtn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_state(|st| {
                st.audio.play_sfx(Sfx::Click);
                st.reset();
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id("closeWinBtn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_state(|st| {
                st.audio.play_sfx(Sfx::Click);
                if let Some(ov) = &st.overlay {
                    ov.hide();
                }
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(f: &FrameCallback) {
    if let (Some(w), Some(cb)) = (web_sys::window(), f.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn start_catch_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_state(|st| catch_tick(st, ts));
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn catch_tick(state: &mut CatchState, now: f64) {
    let events = state.game.update(now, state.input, &mut state.rng);
    state.handle_events(&events);
    if let Some(dbg) = &state.debug {
        dbg.container.class_list().remove_1("hidden").ok();
        dbg.text.set_text_content(Some(&state.game.debug_text()));
    }
    render::draw_frame(&state.ctx, &state.game);
}
