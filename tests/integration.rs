// Integration tests (native) for the `heart-catch` crate.
// These drive whole rounds through the public API without touching wasm/browser APIs.

use heart_catch::config::GameConfig;
use heart_catch::game::{Game, GameEvent, Input};
use heart_catch::rng::Rng;
use heart_catch::settings::{self, AudioPatch, AudioSettings, MemoryStore, SettingsStore};

const FRAME_MS: f64 = 16.0;

/// Run frames until the round ends or `max_frames` elapse; returns every event.
fn play(game: &mut Game, rng: &mut Rng, input: Input, max_frames: usize, stop_on_win: bool) -> Vec<GameEvent> {
    let mut now = 0.0;
    let mut all = Vec::new();
    for _ in 0..max_frames {
        now += FRAME_MS;
        let events = game.update(now, input, rng);
        let done = events.contains(&GameEvent::GameOver) || (stop_on_win && events.contains(&GameEvent::Won));
        all.extend(events);
        if done {
            break;
        }
    }
    all
}

// A basket spanning the whole canvas cannot miss anything.
fn wide_basket() -> GameConfig {
    GameConfig { basket_width: 420.0, ..GameConfig::default() }
}

#[test]
fn full_width_basket_wins_without_misses() {
    let mut game = Game::new(wide_basket(), 420.0, 560.0);
    let mut rng = Rng::new(2024);
    let events = play(&mut game, &mut rng, Input::default(), 5_000, true);
    assert!(game.is_won());
    assert!(game.is_running());
    assert_eq!(game.caught(), 14);
    assert_eq!(game.missed(), 0);
    assert_eq!(events.iter().filter(|e| **e == GameEvent::Won).count(), 1);
    assert!(!game.confetti().is_empty());
}

#[test]
fn basket_parked_off_to_the_side_loses() {
    let cfg = GameConfig { basket_width: 0.0, ..GameConfig::default() };
    let mut game = Game::new(cfg, 420.0, 560.0);
    game.set_pointer_x(-1_000.0);
    let mut rng = Rng::new(7);
    let input = Input { pointer_active: true, ..Input::default() };
    let events = play(&mut game, &mut rng, input, 5_000, false);
    assert_eq!(events.last(), Some(&GameEvent::GameOver));
    assert!(!game.is_running());
    assert_eq!(game.missed(), 12);
    assert_eq!(game.caught(), 0);
}

#[test]
fn restart_after_loss_allows_a_win() {
    let mut game = Game::new(wide_basket(), 420.0, 560.0);
    let mut rng = Rng::new(99);
    let mut lost = Game::new(GameConfig { basket_width: 0.0, ..GameConfig::default() }, 420.0, 560.0);
    lost.set_pointer_x(-1_000.0);
    play(&mut lost, &mut rng, Input { pointer_active: true, ..Input::default() }, 5_000, false);
    assert!(!lost.is_running());
    lost.reset();
    assert!(lost.is_running());
    assert_eq!((lost.caught(), lost.missed()), (0, 0));

    play(&mut game, &mut rng, Input::default(), 5_000, true);
    assert!(game.is_won());
    game.reset();
    assert!(!game.is_won());
    play(&mut game, &mut rng, Input::default(), 5_000, true);
    assert!(game.is_won());
}

#[test]
fn winning_round_keeps_counting_misses_but_never_ends() {
    let mut game = Game::new(wide_basket(), 420.0, 560.0);
    let mut rng = Rng::new(5);
    play(&mut game, &mut rng, Input::default(), 5_000, true);
    assert!(game.is_won());
    // After the win nothing is caught any more, so hearts fall through.
    let events = play(&mut game, &mut rng, Input::default(), 3_000, false);
    assert!(!events.contains(&GameEvent::Caught));
    assert!(!events.contains(&GameEvent::GameOver));
    assert!(game.missed() >= 12);
    assert!(game.is_running());
}

#[test]
fn audio_settings_round_trip_through_store() {
    let store = MemoryStore::default();
    assert_eq!(settings::load(&store), AudioSettings::default());
    settings::update(&store, AudioPatch { muted: Some(true), ..AudioPatch::default() });
    settings::update(&store, AudioPatch { sfx_volume: Some(0.1), ..AudioPatch::default() });
    let s = settings::load(&store);
    assert!(s.muted);
    assert_eq!(s.sfx_volume, 0.1);
    assert!(store.get_item(settings::AUDIO_SETTINGS_KEY).is_some());
}

#[test]
fn countdown_helpers_are_public() {
    assert_eq!(heart_catch::countdown::format_countdown(61_000.0), "0d 00h 01m 01s");
    assert_eq!(heart_catch::countdown::valentines_target_year(2026, 11, 31, 0.0), 2027);
}
