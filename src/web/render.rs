use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::game::{Basket, Confetti, Game, HEART_GLYPH, Heart};

const HINT: &str = "Move: arrow keys (laptop) or drag (phone)";
const BASKET_RADIUS: f64 = 8.0;

pub fn draw_frame(ctx: &CanvasRenderingContext2d, game: &Game) {
    let (w, h) = (game.width(), game.height());
    ctx.clear_rect(0.0, 0.0, w, h);

    let g = ctx.create_linear_gradient(0.0, 0.0, w, h);
    g.add_color_stop(0.0, "#fff5f7").ok();
    g.add_color_stop(1.0, "#ffe8f1").ok();
    ctx.set_fill_style(&g);
    ctx.fill_rect(0.0, 0.0, w, h);

    for heart in game.hearts() {
        draw_heart(ctx, heart);
    }
    draw_basket(ctx, game.basket());
    for p in game.confetti() {
        draw_confetti(ctx, p);
    }

    ctx.set_fill_style(&JsValue::from_str("#2b2b2b"));
    ctx.set_font("14px system-ui");
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    ctx.fill_text(HINT, 12.0, 12.0).ok();
}

fn centred_glyph(ctx: &CanvasRenderingContext2d, size: f64) {
    ctx.set_font(&format!("{size}px system-ui"));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
}

fn draw_heart(ctx: &CanvasRenderingContext2d, heart: &Heart) {
    centred_glyph(ctx, heart.size);
    ctx.fill_text(HEART_GLYPH, heart.x, heart.y).ok();
}

fn draw_basket(ctx: &CanvasRenderingContext2d, b: &Basket) {
    round_rect(ctx, b.left(), b.y, b.w, b.h, BASKET_RADIUS);
    ctx.set_fill_style(&JsValue::from_str("#ffd1dc"));
    ctx.fill();

    // Rim sits slightly above and inside the body.
    round_rect(ctx, b.left() + 10.0, b.y - 10.0, b.w - 20.0, 12.0, BASKET_RADIUS);
    ctx.set_fill_style(&JsValue::from_str("#ff4d6d"));
    ctx.fill();
}

fn draw_confetti(ctx: &CanvasRenderingContext2d, p: &Confetti) {
    ctx.save();
    ctx.translate(p.x, p.y).ok();
    ctx.rotate(p.rotation()).ok();
    centred_glyph(ctx, p.size);
    ctx.fill_text(p.glyph, 0.0, 0.0).ok();
    ctx.restore();
}

/// Builds a rounded-rectangle path; the caller fills or strokes it.
fn round_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r).ok();
    ctx.arc_to(x + w, y + h, x, y + h, r).ok();
    ctx.arc_to(x, y + h, x, y, r).ok();
    ctx.arc_to(x, y, x + w, y, r).ok();
    ctx.close_path();
}
