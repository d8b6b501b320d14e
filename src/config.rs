//! Gameplay tuning and the `?test=1` toggle.

/// Hearts that must be caught to win a round.
pub const WIN_COUNT: u32 = 14;
/// Misses allowed before the round is lost.
pub const MAX_MISSES: u32 = 12;
/// Spawn interval in milliseconds.
pub const HEART_SPAWN_MS: f64 = 550.0;
/// Faster spawn interval used in test mode so rounds finish quickly.
pub const TEST_SPAWN_MS: f64 = 350.0;
/// Base fall speed in px per frame; each heart adds up to `HEART_SPEED_JITTER`.
pub const HEART_FALL_SPEED: f64 = 2.6;
pub const HEART_SPEED_JITTER: f64 = 1.8;
pub const CONFETTI_COUNT: usize = 90;

pub const BASKET_WIDTH: f64 = 110.0;
pub const BASKET_HEIGHT: f64 = 18.0;
pub const BASKET_SPEED: f64 = 7.0;
/// Distance from the basket's top edge to the bottom of the canvas.
pub const BASKET_BOTTOM_OFFSET: f64 = 38.0;

/// Used when the page canvas is created by us instead of found in the markup.
pub const DEFAULT_CANVAS_WIDTH: u32 = 420;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 560;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub win_count: u32,
    pub max_misses: u32,
    pub fall_speed: f64,
    pub speed_jitter: f64,
    pub basket_width: f64,
    pub basket_height: f64,
    pub basket_speed: f64,
    pub confetti_count: usize,
    pub test_mode: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_count: WIN_COUNT,
            max_misses: MAX_MISSES,
            fall_speed: HEART_FALL_SPEED,
            speed_jitter: HEART_SPEED_JITTER,
            basket_width: BASKET_WIDTH,
            basket_height: BASKET_HEIGHT,
            basket_speed: BASKET_SPEED,
            confetti_count: CONFETTI_COUNT,
            test_mode: false,
        }
    }
}

impl GameConfig {
    pub fn with_test_mode(mut self, on: bool) -> Self {
        self.test_mode = on;
        self
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        if self.test_mode { TEST_SPAWN_MS } else { HEART_SPAWN_MS }
    }
}

fn query_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| p.split_once('=').unwrap_or((p, "")))
}

/// True when the query string carries `test=1` (first occurrence of `test` wins).
pub fn is_test_mode(query: &str) -> bool {
    query_pairs(query)
        .find(|(k, _)| *k == "test")
        .map(|(_, v)| v == "1")
        .unwrap_or(false)
}

/// Path part of a link: fragment dropped, origin dropped for absolute URLs.
fn link_path(url: &str) -> &str {
    let path = url.split_once('#').map_or(url, |(p, _)| p);
    let path = path.split_once('?').map_or(path, |(p, _)| p);
    match path.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
        None => path,
    }
}

fn link_query(url: &str) -> &str {
    let url = url.split_once('#').map_or(url, |(u, _)| u);
    url.split_once('?').map_or("", |(_, q)| q)
}

/// Rewrites a same-site link so test mode survives navigation. The result is
/// `path?query` with `test=1` set in place of the first `test` pair (appended
/// when absent). Outside test mode the link is returned untouched.
pub fn with_test_param(url: &str, test_mode: bool) -> String {
    if !test_mode {
        return url.to_string();
    }
    let mut pairs: Vec<String> = Vec::new();
    let mut seen_test = false;
    for (k, v) in query_pairs(link_query(url)) {
        if k == "test" {
            if !seen_test {
                pairs.push("test=1".to_string());
                seen_test = true;
            }
        } else {
            pairs.push(format!("{k}={v}"));
        }
    }
    if !seen_test {
        pairs.push("test=1".to_string());
    }
    format!("{}?{}", link_path(url), pairs.join("&"))
}
