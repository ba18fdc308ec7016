use serde::Serialize;

use crate::board::{BoardError, ResolvedAnchors, TileGraph};
use crate::bonus::BonusItem;
use crate::bookkeeping::{Bookkeeping, Thresholds};
use crate::events::{self, Dispatcher};
use crate::flow_timers::FlowTimers;
use crate::rng::Rng;
use crate::roster::Roster;
use crate::stats::Stats;
use crate::types::{AppState, GameEvent, InputSnapshot, Snapshot, SoundCue, UiState};

mod dispatch;

#[derive(Clone, Debug)]
pub struct SimulationOptions {
    pub seed: u32,
    pub high_score: i32,
}

/// What happened during one `tick`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FrameReport {
    pub sounds: Vec<SoundCue>,
    pub handled: Vec<GameEvent>,
}

/// The whole game: every manager lives here and talks through the dispatcher.
#[derive(Clone, Debug)]
pub struct Simulation {
    graph: TileGraph,
    anchors: ResolvedAnchors,
    app_state: AppState,
    ui_state: UiState,
    stats: Stats,
    roster: Roster,
    bonus: BonusItem,
    books: Bookkeeping,
    timers: FlowTimers,
    dispatcher: Dispatcher,
    frame: u64,
    seed: u32,
}

impl Simulation {
    pub fn new(graph: TileGraph, options: SimulationOptions) -> Result<Self, BoardError> {
        let anchors = graph.require_anchors()?;
        let roster = Roster::new(&graph, &anchors, Rng::new(options.seed));
        let mut dispatcher = Dispatcher::new();
        // boots into the menu
        dispatcher.post(GameEvent::GameOver);

        Ok(Self {
            bonus: BonusItem::new(anchors.bonus),
            graph,
            anchors,
            app_state: AppState::InMenu,
            ui_state: UiState::Menu,
            stats: Stats::new(options.high_score),
            roster,
            books: Bookkeeping::new(),
            timers: FlowTimers::new(),
            dispatcher,
            frame: 0,
            seed: options.seed,
        })
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    pub fn ui_state(&self) -> UiState {
        self.ui_state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn anchors(&self) -> &ResolvedAnchors {
        &self.anchors
    }

    /// Sounds then gameplay events queued last frame are handled first,
    /// then the managers for the current application state run.
    pub fn tick(&mut self, ms: u32, input: &InputSnapshot) -> FrameReport {
        self.frame += 1;
        let sounds = self.dispatcher.take_sounds();
        let handled = events::drain(self, |sim| &mut sim.dispatcher.game, Self::handle);
        let mut report = FrameReport { sounds, handled };
        // handlers may queue sounds that are reported with the frame that caused them
        report.sounds.extend(self.dispatcher.take_sounds());

        match self.app_state {
            AppState::InMenu => self.update_menu(input),
            AppState::InGame => self.update_game(ms, input),
        }
        report
    }

    fn update_menu(&mut self, input: &InputSnapshot) {
        if self.ui_state == UiState::Menu && input.confirm {
            self.dispatcher.post(GameEvent::StartFromMenu);
            self.dispatcher.sound(SoundCue::Start);
            self.ui_state = UiState::Pregame1;
        }
    }

    fn update_game(&mut self, ms: u32, input: &InputSnapshot) {
        self.timers
            .update(ms, self.stats.lives(), &mut self.dispatcher);

        let thresholds = Thresholds {
            special_mode: self.stats.special_mode_dots(self.roster.special_mode()),
            bonus: self.bonus.activation_threshold(),
        };
        self.books.update(
            &mut self.graph,
            self.roster.seeker_node(),
            thresholds,
            ms,
            &mut self.dispatcher,
        );
        self.bonus
            .update(ms, self.roster.seeker_node(), &mut self.dispatcher);
        self.roster.update(
            &self.graph,
            input,
            self.stats.speeds(),
            ms,
            &mut self.dispatcher,
        );
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.frame,
            app_state: self.app_state,
            ui_state: self.ui_state,
            level: self.stats.level(),
            lives: self.stats.lives(),
            score: self.stats.score(),
            high_score: self.stats.high_score(),
            remaining_pellets: self.graph.remaining_pellets(),
            total_pellets: self.graph.total_pellets(),
            phase: self.roster.phase_step(),
            special_mode: self.roster.special_mode(),
            tile_flash: self.books.tile_flash(),
            seeker: self.roster.seeker.view(&self.graph),
            hunters: self
                .roster
                .hunters()
                .iter()
                .map(|hunter| hunter.view(&self.graph))
                .collect(),
            bonus: self.bonus.view(&self.graph),
            bonus_collected: self.bonus.collected().to_vec(),
        }
    }
}
