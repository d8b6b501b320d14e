//! Parameters for the DOM particles on the win overlay. The web layer turns
//! these into absolutely positioned elements driven by CSS variables.

use crate::rng::Rng;

pub const FLOATING_HEART_COUNT: u32 = 22;
pub const SPARKLES_PER_BURST: usize = 14;

/// One timed step of the overlay celebration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayCue {
    FloatingHeart { delay_ms: i32 },
    SparkleBurst { delay_ms: i32 },
}

/// Every fourth heart is accompanied by a sparkle burst, slightly later.
pub fn overlay_schedule() -> Vec<OverlayCue> {
    let mut cues = Vec::new();
    for i in 0..FLOATING_HEART_COUNT as i32 {
        cues.push(OverlayCue::FloatingHeart { delay_ms: i * 90 });
        if i % 4 == 0 {
            cues.push(OverlayCue::SparkleBurst { delay_ms: i * 120 + 80 });
        }
    }
    cues
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingHeart {
    pub glyph: &'static str,
    /// Horizontal drift, px (`--x`).
    pub drift_x: i64,
    /// Final rotation, deg (`--r`).
    pub rotate_deg: i64,
    pub duration_ms: i64,
    /// Start position as a percentage of the overlay width.
    pub left_pct: i64,
    pub font_px: i64,
}

impl FloatingHeart {
    pub fn random(rng: &mut Rng) -> Self {
        let glyph = if rng.chance(0.7) { "💗" } else { "💖" };
        Self {
            glyph,
            drift_x: rng.rand_int(-220, 220),
            rotate_deg: rng.rand_int(-60, 60),
            duration_ms: rng.rand_int(1700, 2600),
            left_pct: rng.rand_int(10, 90),
            font_px: rng.rand_int(18, 34),
        }
    }

    pub fn lifetime_ms(&self) -> i32 {
        (self.duration_ms + 300) as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sparkle {
    pub dx: f64,
    pub dy: f64,
    pub duration_ms: i64,
}

impl Sparkle {
    pub fn lifetime_ms(&self) -> i32 {
        (self.duration_ms + 80) as i32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SparkleBurst {
    pub center_x_pct: i64,
    pub center_y_pct: i64,
    pub sparkles: Vec<Sparkle>,
}

impl SparkleBurst {
    pub fn random(rng: &mut Rng) -> Self {
        let center_x_pct = rng.rand_int(25, 75);
        let center_y_pct = rng.rand_int(25, 70);
        let sparkles = (0..SPARKLES_PER_BURST)
            .map(|_| {
                let angle = rng.next_f64() * std::f64::consts::TAU;
                let dist = rng.rand_int(40, 140) as f64;
                Sparkle {
                    dx: angle.cos() * dist,
                    dy: angle.sin() * dist,
                    duration_ms: rng.rand_int(650, 1000),
                }
            })
            .collect();
        Self { center_x_pct, center_y_pct, sparkles }
    }
}
