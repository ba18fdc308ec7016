use crate::board::{TileGraph, TileId};
use crate::constants::{SPAWN_FRACTION_AB, SPAWN_FRACTION_C, SPAWN_FRACTION_D, TILE_FLASH_MS};
use crate::events::Dispatcher;
use crate::types::{GameEvent, HunterKind, PelletKind, SoundCue};

/// Remaining-fraction thresholds that release each hunter.
const SPAWN_THRESHOLDS: [(HunterKind, f32); 4] = [
    (HunterKind::Direct, SPAWN_FRACTION_AB),
    (HunterKind::Ambush, SPAWN_FRACTION_AB),
    (HunterKind::Flank, SPAWN_FRACTION_C),
    (HunterKind::Shy, SPAWN_FRACTION_D),
];

/// Per-frame thresholds that depend on other managers' state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Thresholds {
    pub special_mode: Option<f32>,
    pub bonus: Option<f32>,
}

/// Pellet pickup, remaining-fraction triggers and the end-of-level tile flash.
#[derive(Clone, Debug, Default)]
pub struct Bookkeeping {
    spawn_posted: [bool; 4],
    win_posted: bool,
    flashing: bool,
    flash_on: bool,
    flash_clock_ms: u32,
}

impl Bookkeeping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Hunters go back home after a seeker death, so their releases re-arm.
    pub fn reset_from_death(&mut self) {
        self.spawn_posted = [false; 4];
    }

    pub fn start_flash(&mut self) {
        self.flashing = true;
        self.flash_on = true;
        self.flash_clock_ms = 0;
    }

    pub fn tile_flash(&self) -> bool {
        self.flashing && self.flash_on
    }

    pub fn update(
        &mut self,
        graph: &mut TileGraph,
        seeker_node: Option<TileId>,
        thresholds: Thresholds,
        ms: u32,
        out: &mut Dispatcher,
    ) {
        if let Some(tile) = seeker_node {
            collect_pellet(graph, tile, out);
        }
        self.post_triggers(graph.remaining_fraction(), thresholds, out);
        self.update_flash(ms);
    }

    fn post_triggers(&mut self, remaining: f32, thresholds: Thresholds, out: &mut Dispatcher) {
        for (kind, threshold) in SPAWN_THRESHOLDS {
            let posted = &mut self.spawn_posted[kind.index()];
            if !*posted && remaining < threshold {
                *posted = true;
                out.post(kind.spawn_event());
            }
        }

        if thresholds.special_mode.is_some_and(|dots| remaining < dots) {
            out.post(GameEvent::AdvanceSpecialMode);
        }

        if thresholds.bonus.is_some_and(|fraction| remaining < fraction) {
            out.post(GameEvent::ActivateBonus);
        }

        if remaining == 0.0 && !self.win_posted {
            self.win_posted = true;
            out.post(GameEvent::LevelWin);
        }
    }

    fn update_flash(&mut self, ms: u32) {
        if !self.flashing {
            return;
        }
        self.flash_clock_ms += ms;
        while self.flash_clock_ms >= TILE_FLASH_MS {
            self.flash_clock_ms -= TILE_FLASH_MS;
            self.flash_on = !self.flash_on;
        }
    }
}

fn collect_pellet(graph: &mut TileGraph, tile: TileId, out: &mut Dispatcher) {
    match graph.collect(tile) {
        Some(PelletKind::Small) => {
            out.sound(SoundCue::Pellet);
            out.post(GameEvent::PointsPellet);
        }
        Some(PelletKind::Power) => {
            out.sound(SoundCue::Pellet);
            out.post(GameEvent::PointsPowerPellet);
            out.post(GameEvent::FrightenHunters);
        }
        Some(PelletKind::None) | None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(out: &mut Dispatcher) -> Vec<GameEvent> {
        let mut seen = Vec::new();
        out.game.drain_with(|event, _| seen.push(event));
        seen
    }

    fn strip() -> TileGraph {
        TileGraph::build(&["#ooOoo#"]).expect("board")
    }

    #[test]
    fn first_frame_releases_the_first_two_hunters_once() {
        let mut graph = strip();
        let mut books = Bookkeeping::new();
        let mut out = Dispatcher::new();
        books.update(&mut graph, None, Thresholds::default(), 16, &mut out);
        assert_eq!(
            drain(&mut out),
            vec![GameEvent::SpawnHunterA, GameEvent::SpawnHunterB]
        );
        books.update(&mut graph, None, Thresholds::default(), 16, &mut out);
        assert!(out.game.is_empty());

        books.reset_from_death();
        books.update(&mut graph, None, Thresholds::default(), 16, &mut out);
        assert_eq!(drain(&mut out).len(), 2);
    }

    #[test]
    fn collecting_pellets_scores_and_frightens() {
        let mut graph = strip();
        let mut books = Bookkeeping::new();
        let mut out = Dispatcher::new();
        let small = graph.tile_at(0, 1).expect("tile");
        let power = graph.tile_at(0, 3).expect("tile");

        books.update(&mut graph, Some(small), Thresholds::default(), 16, &mut out);
        let events = drain(&mut out);
        assert_eq!(events[0], GameEvent::PointsPellet);
        assert!(events.contains(&GameEvent::SpawnHunterC));

        books.update(&mut graph, Some(power), Thresholds::default(), 16, &mut out);
        let events = drain(&mut out);
        assert_eq!(
            &events[..2],
            &[GameEvent::PointsPowerPellet, GameEvent::FrightenHunters]
        );
        assert_eq!(out.take_sounds(), vec![SoundCue::Pellet, SoundCue::Pellet]);

        books.update(&mut graph, Some(power), Thresholds::default(), 16, &mut out);
        assert!(drain(&mut out).is_empty());
    }

    #[test]
    fn later_spawns_follow_their_thresholds() {
        let mut graph = TileGraph::build(&["oooooooooo"]).expect("board");
        let mut books = Bookkeeping::new();
        let mut out = Dispatcher::new();
        books.update(&mut graph, None, Thresholds::default(), 16, &mut out);
        drain(&mut out);

        let mut released = Vec::new();
        for col in 0..4 {
            let tile = graph.tile_at(0, col).expect("tile");
            books.update(&mut graph, Some(tile), Thresholds::default(), 16, &mut out);
            released.extend(
                drain(&mut out)
                    .into_iter()
                    .filter(|event| matches!(event, GameEvent::SpawnHunterC | GameEvent::SpawnHunterD))
                    .map(|event| (col, event)),
            );
        }
        assert_eq!(
            released,
            vec![(1, GameEvent::SpawnHunterC), (3, GameEvent::SpawnHunterD)]
        );
    }

    #[test]
    fn clearing_the_board_posts_a_single_win() {
        let mut graph = TileGraph::build(&["#o#"]).expect("board");
        let tile = graph.tile_at(0, 1).expect("tile");
        let mut books = Bookkeeping::new();
        let mut out = Dispatcher::new();
        books.update(&mut graph, Some(tile), Thresholds::default(), 16, &mut out);
        assert!(drain(&mut out).contains(&GameEvent::LevelWin));
        books.update(&mut graph, Some(tile), Thresholds::default(), 16, &mut out);
        assert!(!drain(&mut out).contains(&GameEvent::LevelWin));
    }

    #[test]
    fn special_mode_and_bonus_repost_while_below_threshold() {
        let mut graph = strip();
        let mut books = Bookkeeping::new();
        let mut out = Dispatcher::new();
        let thresholds = Thresholds {
            special_mode: Some(1.5),
            bonus: Some(0.5),
        };
        for _ in 0..2 {
            books.update(&mut graph, None, thresholds, 16, &mut out);
        }
        let events = drain(&mut out);
        let special = events
            .iter()
            .filter(|event| **event == GameEvent::AdvanceSpecialMode)
            .count();
        assert_eq!(special, 2);
        assert!(!events.contains(&GameEvent::ActivateBonus));
    }

    #[test]
    fn tile_flash_toggles_every_quarter_second() {
        let mut books = Bookkeeping::new();
        let mut graph = strip();
        let mut out = Dispatcher::new();
        assert!(!books.tile_flash());
        books.start_flash();
        assert!(books.tile_flash());
        books.update(&mut graph, None, Thresholds::default(), 250, &mut out);
        assert!(!books.tile_flash());
        books.update(&mut graph, None, Thresholds::default(), 250, &mut out);
        assert!(books.tile_flash());
        books.reset();
        assert!(!books.tile_flash());
    }
}
