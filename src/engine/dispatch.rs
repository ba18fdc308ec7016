use super::*;

use crate::flow_timers::LevelOutcome;
use crate::types::HunterKind;

impl Simulation {
    pub(super) fn handle(&mut self, event: GameEvent) {
        match event {
            GameEvent::StartFromMenu => self.start_from_menu(),
            GameEvent::StartFromLevelWin => self.start_from_level_win(),
            GameEvent::StartFromLevelLoss => self.start_from_level_loss(),
            GameEvent::LevelWin => self.end_level(LevelOutcome::Win),
            GameEvent::LevelLose => self.end_level(LevelOutcome::Loss),
            GameEvent::GameOver => {
                self.app_state = AppState::InMenu;
                self.ui_state = UiState::Menu;
                self.dispatcher.reset();
            }
            GameEvent::UiEnterPregame => self.ui_state = UiState::Pregame2,
            GameEvent::UiEnterGame => self.ui_state = UiState::Game,
            GameEvent::Pause => {
                self.bonus.pause();
                self.roster.pause();
            }
            GameEvent::Unpause => {
                self.bonus.unpause();
                self.roster.unpause();
            }
            GameEvent::AgentsVisible => self.roster.show_agents(),
            GameEvent::HuntersInvisible => self.roster.hide_hunters(),
            GameEvent::SpawnHunterA => self.roster.spawn(HunterKind::Direct),
            GameEvent::SpawnHunterB => self.roster.spawn(HunterKind::Ambush),
            GameEvent::SpawnHunterC => self.roster.spawn(HunterKind::Flank),
            GameEvent::SpawnHunterD => self.roster.spawn(HunterKind::Shy),
            GameEvent::FrightenHunters => self.roster.frighten(self.stats.frightened_ms()),
            GameEvent::AdvanceSpecialMode => {
                self.roster.advance_special_mode();
            }
            GameEvent::HunterEliminated => {
                self.timers.start_post_kill();
                let earned = self.stats.hunter_eliminated();
                self.announce_extra_lives(earned);
            }
            GameEvent::ActivateBonus => self.bonus.activate(),
            GameEvent::PlaySeekerDeath => self.roster.play_seeker_death(),
            GameEvent::PlayTileFlash => self.books.start_flash(),
            GameEvent::ConsumeLife => self.stats.consume_life(),
            GameEvent::PointsPellet => {
                let earned = self.stats.pellet_collected();
                self.announce_extra_lives(earned);
            }
            GameEvent::PointsPowerPellet => {
                let earned = self.stats.power_pellet_collected();
                self.announce_extra_lives(earned);
            }
            GameEvent::PointsEliminationBonus => {
                let earned = self.stats.elimination_bonus();
                self.announce_extra_lives(earned);
            }
            GameEvent::PointsBonusItem => {
                let earned = self.stats.bonus_collected();
                self.announce_extra_lives(earned);
            }
        }
    }

    fn announce_extra_lives(&mut self, earned: u32) {
        for _ in 0..earned {
            self.dispatcher.sound(SoundCue::ExtraLife);
        }
    }

    fn start_from_menu(&mut self) {
        self.app_state = AppState::InGame;
        self.ui_state = UiState::Pregame1;
        self.stats.reset();
        self.timers.reset();
        self.graph.restore_pellets();
        self.books.reset();
        self.bonus.reset();
        self.roster.reset(&self.graph, self.stats.level());
        self.dispatcher.reset();
        self.timers.start_from_menu();
    }

    fn start_from_level_win(&mut self) {
        self.stats.next_level();
        if self.stats.is_kill_screen() {
            self.dispatcher.reset();
            self.dispatcher.post(GameEvent::GameOver);
            return;
        }
        self.timers.reset();
        self.graph.restore_pellets();
        self.books.reset();
        self.bonus.next_level(self.stats.bonus_kind());
        self.roster.reset(&self.graph, self.stats.level());
        self.dispatcher.reset();
        self.timers.start_from_win();
    }

    fn start_from_level_loss(&mut self) {
        self.roster.reset_from_death(&self.graph);
        self.bonus.reset_from_death();
        self.books.reset_from_death();
        self.timers.reset();
        self.dispatcher.reset();
        self.timers.start_from_loss();
    }

    fn end_level(&mut self, outcome: LevelOutcome) {
        self.bonus.pause();
        self.roster.pause();
        self.timers.start_end_level(outcome);
    }
}
