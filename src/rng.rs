//! Gameplay randomness. Not crypto secure; only the seed may come from the
//! browser crypto source.

/// xorshift64* generator.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u64,
}

const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: if seed == 0 { FALLBACK_SEED } else { seed } }
    }

    /// Seed from `getrandom` when available, otherwise from the page clock.
    pub fn from_entropy() -> Self {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            match getrandom::getrandom(&mut buf) {
                Ok(()) => return Self::new(u64::from_le_bytes(buf)),
                Err(err) => tracing::warn!(%err, "getrandom failed, seeding from clock"),
            }
        }
        Self::new(clock_seed())
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[min, max]`, both ends inclusive.
    pub fn rand_int(&mut self, min: i64, max: i64) -> i64 {
        if max < min {
            return min;
        }
        let span = (max - min + 1) as f64;
        (self.next_f64() * span).floor() as i64 + min
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn clock_seed() -> u64 {
    let now = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    // Mix the fractional milliseconds in; performance.now() is often a small number.
    (now * 1000.0) as u64 ^ (js_sys::Date::now() as u64).rotate_left(17)
}
