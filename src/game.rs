//! Pure catch-the-hearts simulation. No browser APIs: the web layer feeds it
//! frame timestamps and input, then renders whatever state it ends up in.

use crate::config::{BASKET_BOTTOM_OFFSET, GameConfig};
use crate::rng::Rng;

/// Hearts spawn just above the visible area.
const HEART_SPAWN_Y: f64 = -20.0;
/// Horizontal margin kept between a new heart and the canvas edges.
const HEART_SPAWN_MARGIN: i64 = 18;
/// Hearts this far below the canvas count as missed.
const MISS_MARGIN: f64 = 30.0;
/// Confetti this far below the canvas is discarded.
const CONFETTI_CULL_MARGIN: f64 = 70.0;

pub const HEART_GLYPH: &str = "💖";
pub const CONFETTI_HEART: &str = "💗";
pub const CONFETTI_SPARKLE: &str = "✨";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basket {
    /// Horizontal centre.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub speed: f64,
}

impl Basket {
    pub fn left(&self) -> f64 {
        self.x - self.w / 2.0
    }
    pub fn right(&self) -> f64 {
        self.x + self.w / 2.0
    }
}

/// Maps a viewport x coordinate onto a canvas whose CSS box starts at `left`
/// and is `rect_w` wide while holding `canvas_w` internal pixels. An unlaid-out
/// canvas (zero width) is treated as unscaled.
pub fn client_to_canvas_x(client_x: f64, left: f64, rect_w: f64, canvas_w: f64) -> f64 {
    if rect_w <= 0.0 {
        return client_x - left;
    }
    (client_x - left) * canvas_w / rect_w
}

/// A falling heart; `(x, y)` is the glyph centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heart {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Confetti {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub spin: f64,
    pub glyph: &'static str,
}

impl Confetti {
    pub fn rotation(&self) -> f64 {
        self.spin * self.y
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    /// While a pointer drag is active the arrow keys are ignored.
    pub pointer_active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Caught,
    Missed,
    Won,
    GameOver,
}

pub struct Game {
    config: GameConfig,
    width: f64,
    height: f64,
    basket: Basket,
    hearts: Vec<Heart>,
    confetti: Vec<Confetti>,
    last_spawn: f64,
    caught: u32,
    missed: u32,
    running: bool,
    won: bool,
}

impl Game {
    pub fn new(config: GameConfig, width: f64, height: f64) -> Self {
        let basket = Basket {
            x: width / 2.0,
            y: height - BASKET_BOTTOM_OFFSET,
            w: config.basket_width,
            h: config.basket_height,
            speed: config.basket_speed,
        };
        Self {
            config,
            width,
            height,
            basket,
            hearts: Vec::new(),
            confetti: Vec::new(),
            last_spawn: 0.0,
            caught: 0,
            missed: 0,
            running: true,
            won: false,
        }
    }

    /// Start a fresh round. The basket stays where the player left it.
    pub fn reset(&mut self) {
        self.hearts.clear();
        self.confetti.clear();
        self.last_spawn = 0.0;
        self.caught = 0;
        self.missed = 0;
        self.won = false;
        self.running = true;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn width(&self) -> f64 {
        self.width
    }
    pub fn height(&self) -> f64 {
        self.height
    }
    pub fn basket(&self) -> &Basket {
        &self.basket
    }
    pub fn hearts(&self) -> &[Heart] {
        &self.hearts
    }
    pub fn confetti(&self) -> &[Confetti] {
        &self.confetti
    }
    pub fn caught(&self) -> u32 {
        self.caught
    }
    pub fn missed(&self) -> u32 {
        self.missed
    }
    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Pointer drag: jump the basket centre to `x` (clamped on the next update).
    pub fn set_pointer_x(&mut self, x: f64) {
        self.basket.x = x;
    }

    pub fn spawn_heart(&mut self, now: f64, rng: &mut Rng) {
        let x = rng.rand_int(HEART_SPAWN_MARGIN, self.width as i64 - HEART_SPAWN_MARGIN) as f64;
        let size = rng.rand_int(18, 26) as f64;
        let speed = self.config.fall_speed + rng.next_f64() * self.config.speed_jitter;
        self.hearts.push(Heart { x, y: HEART_SPAWN_Y, size, speed });
        self.last_spawn = now;
    }

    /// Catch test against the basket, with extra slack above and below the rim.
    pub fn intersects(&self, heart: &Heart) -> bool {
        let b = &self.basket;
        let within_x = heart.x >= b.left() && heart.x <= b.right();
        let within_y = heart.y >= b.y - 20.0 && heart.y <= b.y + b.h + 10.0;
        within_x && within_y
    }

    /// Advance one frame. `now` is the animation-frame timestamp in ms.
    pub fn update(&mut self, now: f64, input: Input, rng: &mut Rng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }

        if !input.pointer_active {
            if input.left {
                self.basket.x -= self.basket.speed;
            }
            if input.right {
                self.basket.x += self.basket.speed;
            }
        }
        let half = self.basket.w / 2.0;
        self.basket.x = self.basket.x.clamp(half, (self.width - half).max(half));

        if now - self.last_spawn > self.config.spawn_interval_ms() {
            self.spawn_heart(now, rng);
        }

        for h in &mut self.hearts {
            h.y += h.speed;
        }

        // Resolve catches and misses in spawn order.
        let hearts = std::mem::take(&mut self.hearts);
        let mut remaining = Vec::with_capacity(hearts.len());
        for h in hearts {
            // A lost round freezes as-is; later hearts are not resolved.
            if !self.running {
                remaining.push(h);
                continue;
            }
            if self.intersects(&h) && !self.won {
                self.caught += 1;
                events.push(GameEvent::Caught);
                if self.caught >= self.config.win_count {
                    self.win(rng, &mut events);
                }
            } else if h.y > self.height + MISS_MARGIN {
                self.missed += 1;
                events.push(GameEvent::Missed);
                if self.missed >= self.config.max_misses && !self.won {
                    self.game_over(&mut events);
                }
            } else {
                remaining.push(h);
            }
        }
        self.hearts = remaining;

        self.update_confetti();
        events
    }

    fn win(&mut self, rng: &mut Rng, events: &mut Vec<GameEvent>) {
        if self.won {
            return;
        }
        self.won = true;
        events.push(GameEvent::Won);
        self.spawn_confetti(rng);
        tracing::info!(caught = self.caught, missed = self.missed, "round won");
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        if !self.running {
            return;
        }
        self.running = false;
        events.push(GameEvent::GameOver);
        tracing::info!(caught = self.caught, missed = self.missed, "round lost");
    }

    fn spawn_confetti(&mut self, rng: &mut Rng) {
        for _ in 0..self.config.confetti_count {
            let x = rng.rand_int(0, self.width as i64) as f64;
            let y = rng.rand_int(-60, 0) as f64;
            let vx = (rng.next_f64() - 0.5) * 2.4;
            let vy = 2.0 + rng.next_f64() * 3.8;
            let size = rng.rand_int(14, 22) as f64;
            let spin = (rng.next_f64() - 0.5) * 0.22;
            let glyph = if rng.chance(0.6) { CONFETTI_HEART } else { CONFETTI_SPARKLE };
            self.confetti.push(Confetti { x, y, vx, vy, size, spin, glyph });
        }
    }

    fn update_confetti(&mut self) {
        for p in &mut self.confetti {
            p.x += p.vx;
            p.y += p.vy;
            p.vx += (p.y * 0.01).sin() * 0.02;
        }
        let cull = self.height + CONFETTI_CULL_MARGIN;
        self.confetti.retain(|p| p.y < cull);
    }

    /// Readout shown in the debug box when `?test=1` is set.
    pub fn debug_text(&self) -> String {
        format!(
            "TEST MODE ON\nhearts={}\nconfetti={}\nwon={}\nbasketX={:.1}\nspawnEvery={}ms",
            self.hearts.len(),
            self.confetti.len(),
            self.won,
            self.basket.x,
            self.config.spawn_interval_ms()
        )
    }

    #[cfg(test)]
    fn push_heart(&mut self, heart: Heart) {
        self.hearts.push(heart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::new(GameConfig::default(), 420.0, 560.0)
    }

    #[test]
    fn pointer_scales_into_canvas_pixels() {
        assert_eq!(client_to_canvas_x(110.0, 10.0, 210.0, 420.0), 200.0);
        assert_eq!(client_to_canvas_x(10.0, 10.0, 210.0, 420.0), 0.0);
        assert_eq!(client_to_canvas_x(50.0, 10.0, 420.0, 420.0), 40.0);
    }

    #[test]
    fn zero_width_canvas_box_is_unscaled() {
        assert_eq!(client_to_canvas_x(75.0, 25.0, 0.0, 420.0), 50.0);
        assert_eq!(client_to_canvas_x(75.0, 25.0, -3.0, 420.0), 50.0);
    }

    // Far enough in the past that no spawn fires during the frame.
    fn quiet_now(g: &Game) -> f64 {
        g.last_spawn
    }

    fn heart_at(x: f64, y: f64) -> Heart {
        Heart { x, y, size: 20.0, speed: 0.0 }
    }

    #[test]
    fn basket_starts_centred_near_bottom() {
        let g = game();
        assert_eq!(g.basket().x, 210.0);
        assert_eq!(g.basket().y, 560.0 - 38.0);
        assert_eq!(g.basket().w, 110.0);
    }

    #[test]
    fn intersects_uses_inclusive_bounds_with_slack() {
        let g = game();
        let b = *g.basket();
        assert!(g.intersects(&heart_at(b.left(), b.y - 20.0)));
        assert!(g.intersects(&heart_at(b.right(), b.y + b.h + 10.0)));
        assert!(!g.intersects(&heart_at(b.left() - 0.5, b.y)));
        assert!(!g.intersects(&heart_at(b.x, b.y - 20.5)));
        assert!(!g.intersects(&heart_at(b.x, b.y + b.h + 10.5)));
    }

    #[test]
    fn spawn_respects_interval_and_margins() {
        let mut g = game();
        let mut rng = Rng::new(9);
        let ev = g.update(500.0, Input::default(), &mut rng);
        assert!(ev.is_empty());
        assert!(g.hearts().is_empty());
        g.update(551.0, Input::default(), &mut rng);
        assert_eq!(g.hearts().len(), 1);
        let h = g.hearts()[0];
        assert!(h.x >= 18.0 && h.x <= 402.0);
        assert!(h.size >= 18.0 && h.size <= 26.0);
        assert!(h.speed >= 2.6 && h.speed < 2.6 + 1.8);
        // Spawned at -20 and moved once this frame.
        assert!((h.y - (-20.0 + h.speed)).abs() < 1e-9);
        g.update(900.0, Input::default(), &mut rng);
        assert_eq!(g.hearts().len(), 1);
        g.update(1102.0, Input::default(), &mut rng);
        assert_eq!(g.hearts().len(), 2);
    }

    #[test]
    fn test_mode_spawns_faster() {
        let mut g = Game::new(GameConfig::default().with_test_mode(true), 420.0, 560.0);
        let mut rng = Rng::new(1);
        g.update(351.0, Input::default(), &mut rng);
        assert_eq!(g.hearts().len(), 1);
        assert!(g.debug_text().contains("spawnEvery=350ms"));
    }

    #[test]
    fn keyboard_moves_and_clamps_basket() {
        let mut g = game();
        let mut rng = Rng::new(3);
        let left = Input { left: true, ..Input::default() };
        g.update(0.0, left, &mut rng);
        assert_eq!(g.basket().x, 203.0);
        for _ in 0..100 {
            g.update(0.0, left, &mut rng);
        }
        assert_eq!(g.basket().x, 55.0);
        let both = Input { left: true, right: true, ..Input::default() };
        g.update(0.0, both, &mut rng);
        assert_eq!(g.basket().x, 55.0);
    }

    #[test]
    fn pointer_drag_overrides_keys_and_is_clamped() {
        let mut g = game();
        let mut rng = Rng::new(3);
        g.set_pointer_x(1_000.0);
        let input = Input { left: true, right: false, pointer_active: true };
        g.update(0.0, input, &mut rng);
        assert_eq!(g.basket().x, 420.0 - 55.0);
    }

    #[test]
    fn catching_increments_and_removes_heart() {
        let mut g = game();
        let mut rng = Rng::new(5);
        let b = *g.basket();
        g.push_heart(heart_at(b.x, b.y));
        let now = quiet_now(&g);
        let ev = g.update(now, Input::default(), &mut rng);
        assert_eq!(ev, vec![GameEvent::Caught]);
        assert_eq!(g.caught(), 1);
        assert!(g.hearts().is_empty());
    }

    #[test]
    fn heart_below_canvas_is_missed() {
        let mut g = game();
        let mut rng = Rng::new(5);
        g.push_heart(heart_at(10.0, 560.0 + 30.5));
        g.push_heart(heart_at(10.0, 560.0 + 30.0));
        let now = quiet_now(&g);
        let ev = g.update(now, Input::default(), &mut rng);
        assert_eq!(ev, vec![GameEvent::Missed]);
        assert_eq!(g.missed(), 1);
        assert_eq!(g.hearts().len(), 1);
    }

    #[test]
    fn reaching_win_count_wins_once_and_spawns_confetti() {
        let mut g = game();
        let mut rng = Rng::new(11);
        let b = *g.basket();
        for _ in 0..15 {
            g.push_heart(heart_at(b.x, b.y));
        }
        let now = quiet_now(&g);
        let ev = g.update(now, Input::default(), &mut rng);
        let caught = ev.iter().filter(|e| **e == GameEvent::Caught).count();
        let won = ev.iter().filter(|e| **e == GameEvent::Won).count();
        assert_eq!(caught, 14);
        assert_eq!(won, 1);
        assert!(g.is_won());
        assert!(g.is_running());
        assert_eq!(g.caught(), 14);
        assert_eq!(g.confetti().len(), 90);
        // The 15th heart sits in the basket but no longer counts.
        assert_eq!(g.hearts().len(), 1);
    }

    #[test]
    fn misses_after_win_never_end_the_round() {
        let mut g = game();
        let mut rng = Rng::new(11);
        let b = *g.basket();
        for _ in 0..14 {
            g.push_heart(heart_at(b.x, b.y));
        }
        g.update(quiet_now(&g), Input::default(), &mut rng);
        for _ in 0..20 {
            g.push_heart(heart_at(10.0, 1_000.0));
        }
        let ev = g.update(quiet_now(&g), Input::default(), &mut rng);
        assert!(!ev.contains(&GameEvent::GameOver));
        assert_eq!(g.missed(), 20);
        assert!(g.is_running());
    }

    #[test]
    fn max_misses_stops_the_round() {
        let mut g = game();
        let mut rng = Rng::new(13);
        for _ in 0..12 {
            g.push_heart(heart_at(10.0, 1_000.0));
        }
        let ev = g.update(quiet_now(&g), Input::default(), &mut rng);
        assert_eq!(ev.last(), Some(&GameEvent::GameOver));
        assert_eq!(ev.iter().filter(|e| **e == GameEvent::GameOver).count(), 1);
        assert!(!g.is_running());
        // Stopped rounds ignore further frames.
        g.push_heart(heart_at(10.0, 1_000.0));
        assert!(g.update(10_000.0, Input::default(), &mut rng).is_empty());
        assert_eq!(g.missed(), 12);
    }

    #[test]
    fn hearts_after_the_losing_miss_are_left_alone() {
        let mut g = game();
        let mut rng = Rng::new(13);
        for _ in 0..14 {
            g.push_heart(heart_at(10.0, 1_000.0));
        }
        let events = g.update(quiet_now(&g), Input::default(), &mut rng);
        assert_eq!(g.missed(), 12);
        assert_eq!(g.hearts().len(), 2);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::GameOver).count(), 1);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Missed).count(), 12);
    }

    #[test]
    fn reset_restores_a_fresh_round() {
        let mut g = game();
        let mut rng = Rng::new(17);
        for _ in 0..12 {
            g.push_heart(heart_at(10.0, 1_000.0));
        }
        g.set_pointer_x(100.0);
        g.update(quiet_now(&g), Input { pointer_active: true, ..Input::default() }, &mut rng);
        g.reset();
        assert!(g.is_running());
        assert!(!g.is_won());
        assert_eq!((g.caught(), g.missed()), (0, 0));
        assert!(g.hearts().is_empty() && g.confetti().is_empty());
        assert_eq!(g.basket().x, 100.0);
    }

    #[test]
    fn confetti_falls_and_is_culled() {
        let mut g = game();
        let mut rng = Rng::new(19);
        g.spawn_confetti(&mut rng);
        assert_eq!(g.confetti().len(), 90);
        for p in g.confetti() {
            assert!(p.y >= -60.0 && p.y <= 0.0);
            assert!(p.vy >= 2.0 && p.vy < 5.8);
            assert!(p.glyph == CONFETTI_HEART || p.glyph == CONFETTI_SPARKLE);
        }
        for _ in 0..400 {
            g.update_confetti();
        }
        assert!(g.confetti().is_empty());
    }

    #[test]
    fn debug_text_layout() {
        let g = game();
        assert_eq!(
            g.debug_text(),
            "TEST MODE ON\nhearts=0\nconfetti=0\nwon=false\nbasketX=210.0\nspawnEvery=550ms"
        );
    }
}
