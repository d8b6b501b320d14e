//! Win overlay: toggled via the `show` class and filled with short-lived
//! floating hearts and sparkle bursts animated by page CSS.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use super::{window, with_state};
use crate::effects::{self, FloatingHeart, OverlayCue, SparkleBurst};
use crate::error::{PageError, PageResult};
use crate::rng::Rng;

const PARTICLE_SELECTOR: &str = ".float-heart, .sparkle";

/// Run `f` once after `delay_ms`. Scheduling failures are logged and dropped.
pub(crate) fn after(delay_ms: i32, f: impl FnOnce() + 'static) {
    let cb = Closure::once_into_js(f);
    let scheduled = window().and_then(|w| {
        w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)
            .map_err(PageError::from)
    });
    if let Err(err) = scheduled {
        tracing::warn!(%err, "setTimeout failed");
    }
}

fn remove_later(el: Element, delay_ms: i32) {
    after(delay_ms, move || el.remove());
}

pub struct WinOverlay {
    root: Element,
    doc: Document,
}

impl WinOverlay {
    pub fn bind(doc: &Document) -> Option<Self> {
        doc.get_element_by_id("winOverlay").map(|root| Self { root, doc: doc.clone() })
    }

    pub fn show(&self) {
        self.root.class_list().add_1("show").ok();
        self.root.set_attribute("aria-hidden", "false").ok();
        self.launch();
    }

    /// Hide and drop any particles still in flight.
    pub fn hide(&self) {
        self.root.class_list().remove_1("show").ok();
        self.root.set_attribute("aria-hidden", "true").ok();
        if let Ok(nodes) = self.root.query_selector_all(PARTICLE_SELECTOR) {
            for i in 0..nodes.length() {
                if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    el.remove();
                }
            }
        }
    }

    fn launch(&self) {
        for cue in effects::overlay_schedule() {
            match cue {
                OverlayCue::FloatingHeart { delay_ms } => after(delay_ms, || {
                    with_state(|st| {
                        if let Some(ov) = &st.overlay {
                            ov.spawn_floating_heart(&mut st.rng).ok();
                        }
                    });
                }),
                OverlayCue::SparkleBurst { delay_ms } => after(delay_ms, || {
                    with_state(|st| {
                        if let Some(ov) = &st.overlay {
                            ov.spawn_sparkle_burst(&mut st.rng).ok();
                        }
                    });
                }),
            }
        }
    }

    fn particle(&self, class: &str) -> PageResult<HtmlElement> {
        let el: HtmlElement = self
            .doc
            .create_element("div")?
            .dyn_into()
            .map_err(|_| PageError::WrongElementType { id: "winOverlay", expected: "HtmlElement" })?;
        el.set_class_name(class);
        Ok(el)
    }

    fn spawn_floating_heart(&self, rng: &mut Rng) -> PageResult<()> {
        let spec = FloatingHeart::random(rng);
        let el = self.particle("float-heart")?;
        el.set_text_content(Some(spec.glyph));
        let style = el.style();
        style.set_property("--x", &format!("{}px", spec.drift_x))?;
        style.set_property("--r", &format!("{}deg", spec.rotate_deg))?;
        style.set_property("--dur", &format!("{}ms", spec.duration_ms))?;
        style.set_property("left", &format!("{}%", spec.left_pct))?;
        style.set_property("font-size", &format!("{}px", spec.font_px))?;
        self.root.append_child(&el)?;
        remove_later(el.into(), spec.lifetime_ms());
        Ok(())
    }

    fn spawn_sparkle_burst(&self, rng: &mut Rng) -> PageResult<()> {
        let burst = SparkleBurst::random(rng);
        for s in &burst.sparkles {
            let el = self.particle("sparkle")?;
            let style = el.style();
            style.set_property("left", &format!("{}%", burst.center_x_pct))?;
            style.set_property("top", &format!("{}%", burst.center_y_pct))?;
            style.set_property("--dx", &format!("{}px", s.dx))?;
            style.set_property("--dy", &format!("{}px", s.dy))?;
            style.set_property("--dur", &format!("{}ms", s.duration_ms))?;
            self.root.append_child(&el)?;
            remove_later(el.into(), s.lifetime_ms());
        }
        Ok(())
    }
}
