//! Cosmetic page extras outside the canvas: the dodging "No" button, the
//! Valentine's countdown, and test-mode link rewriting.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use super::overlay::after;
use super::{document, optional_element, page_test_mode, window};
use crate::config;
use crate::countdown::{self, FEBRUARY, VALENTINES_DAY};
use crate::error::PageResult;
use crate::rng::Rng;
use crate::runaway::{self, Bounds};

const NO_CLICK_MESSAGE: &str = "Nice try 😭 but the answer is Yes.";
const FIRST_DODGE_MS: i32 = 500;
const COUNTDOWN_TICK_MS: i32 = 1_000;

pub(crate) fn setup() -> PageResult<()> {
    setup_runaway_button()?;
    setup_countdown()?;
    Ok(())
}

fn bounds(el: &Element) -> Bounds {
    let r = el.get_bounding_client_rect();
    Bounds { left: r.left(), top: r.top(), right: r.right(), bottom: r.bottom() }
}

fn dodge(button: &HtmlElement, card: &Element, rng: &mut Rng) {
    let style = button.style();
    style.set_property("position", "absolute").ok();
    let b = button.get_bounding_client_rect();
    let (x, y) = runaway::dodge_position(bounds(card), b.width(), b.height(), rng);
    style.set_property("left", &format!("{x}px")).ok();
    style.set_property("top", &format!("{y}px")).ok();
}

/// Makes `#noBtn` jump around inside `#card`. Pages without them are left alone.
fn setup_runaway_button() -> PageResult<()> {
    let doc = document()?;
    let (Some(button), Some(card)) =
        (optional_element::<HtmlElement>(&doc, "noBtn")?, doc.get_element_by_id("card"))
    else {
        return Ok(());
    };

    let rng = std::rc::Rc::new(std::cell::RefCell::new(Rng::from_entropy()));
    let make_dodge = {
        let button = button.clone();
        let card = card.clone();
        let rng = rng.clone();
        move || {
            let (button, card, rng) = (button.clone(), card.clone(), rng.clone());
            move || dodge(&button, &card, &mut rng.borrow_mut())
        }
    };

    {
        let run = make_dodge();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| run()) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let run = make_dodge();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            evt.prevent_default();
            run();
        }) as Box<dyn FnMut(_)>);
        let opts = web_sys::AddEventListenerOptions::new();
        opts.set_passive(false);
        button.add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        closure.forget();
    }
    {
        let run = make_dodge();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            if let Ok(w) = window() {
                w.alert_with_message(NO_CLICK_MESSAGE).ok();
            }
            run();
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    after(FIRST_DODGE_MS, make_dodge());
    tracing::debug!("runaway button armed");
    Ok(())
}

fn ms_into_day(d: &js_sys::Date) -> f64 {
    d.get_hours() as f64 * 3_600_000.0
        + d.get_minutes() as f64 * 60_000.0
        + d.get_seconds() as f64 * 1_000.0
        + d.get_milliseconds() as f64
}

/// Milliseconds until the next local Feb 14 midnight.
pub(crate) fn ms_until_valentines() -> f64 {
    let now = js_sys::Date::new_0();
    let year = countdown::valentines_target_year(
        now.get_full_year() as i32,
        now.get_month(),
        now.get_date(),
        ms_into_day(&now),
    );
    let target = js_sys::Date::new_with_year_month_day(year as u32, FEBRUARY as i32, VALENTINES_DAY as i32);
    target.get_time() - now.get_time()
}

pub(crate) fn is_valentines_day_today() -> bool {
    let now = js_sys::Date::new_0();
    countdown::is_valentines_day(now.get_month(), now.get_date())
}

/// Fills `#countdown` now and once a second after that.
fn setup_countdown() -> PageResult<()> {
    let doc = document()?;
    let Some(el) = doc.get_element_by_id("countdown") else {
        return Ok(());
    };
    let refresh = move || {
        let text = if is_valentines_day_today() {
            "It's Valentine's Day! 💘".to_string()
        } else {
            countdown::format_countdown(ms_until_valentines())
        };
        el.set_text_content(Some(&text));
    };
    refresh();
    let closure = Closure::wrap(Box::new(refresh) as Box<dyn FnMut()>);
    window()?.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        COUNTDOWN_TICK_MS,
    )?;
    closure.forget();
    Ok(())
}

/// Carries `?test=1` over to `url` when the current page is in test mode.
pub(crate) fn link_with_test_param(url: &str) -> String {
    config::with_test_param(url, page_test_mode())
}
