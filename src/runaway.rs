//! Placement for the "No" button that dodges the cursor.

use crate::rng::Rng;

pub const DODGE_PADDING: f64 = 14.0;

/// Viewport-space rectangle, as read from `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Random top-left corner keeping a `w`×`h` button inside `container`. A
/// container too small for the button pins it to the padded top-left corner.
/// Fractional bounds are rounded inward so the padding is never eaten into.
pub fn dodge_position(container: Bounds, w: f64, h: f64, rng: &mut Rng) -> (f64, f64) {
    let min_x = container.left + DODGE_PADDING;
    let min_y = container.top + DODGE_PADDING;
    let max_x = container.right - w - DODGE_PADDING;
    let max_y = container.bottom - h - DODGE_PADDING;
    let x = rng.rand_int(min_x.ceil() as i64, max_x.floor() as i64);
    let y = rng.rand_int(min_y.ceil() as i64, max_y.floor() as i64);
    (x as f64, y as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_inside_padded_container() {
        let card = Bounds { left: 100.0, top: 50.0, right: 500.0, bottom: 350.0 };
        let mut rng = Rng::new(21);
        for _ in 0..1_000 {
            let (x, y) = dodge_position(card, 80.0, 40.0, &mut rng);
            assert!(x >= 114.0 && x <= 406.0, "x={x}");
            assert!(y >= 64.0 && y <= 296.0, "y={y}");
        }
    }

    #[test]
    fn fractional_bounds_round_inward() {
        let card = Bounds { left: 100.5, top: 50.25, right: 500.5, bottom: 350.75 };
        let mut rng = Rng::new(23);
        for _ in 0..1_000 {
            let (x, y) = dodge_position(card, 80.0, 40.0, &mut rng);
            assert!(x >= 114.5 && x <= 406.5, "x={x}");
            assert!(y >= 64.25 && y <= 296.75, "y={y}");
        }
        let snug = Bounds { left: 0.5, top: 0.5, right: 108.9, bottom: 68.9 };
        assert_eq!(dodge_position(snug, 80.0, 40.0, &mut rng), (15.0, 15.0));
    }

    #[test]
    fn tiny_container_pins_to_corner() {
        let card = Bounds { left: 10.0, top: 20.0, right: 60.0, bottom: 40.0 };
        let mut rng = Rng::new(22);
        assert_eq!(dodge_position(card, 80.0, 40.0, &mut rng), (24.0, 34.0));
    }
}
