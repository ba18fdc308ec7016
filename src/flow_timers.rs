use crate::constants::{
    END_LEVEL_HALF_MS, END_LEVEL_MS, POST_KILL_PAUSE_MS, PRE_LEVEL_HALF_MS, PRE_LEVEL_MS,
    PRE_LEVEL_RESTART_MS,
};
use crate::events::Dispatcher;
use crate::types::{GameEvent, SoundCue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelOutcome {
    Win,
    Loss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Running,
    Half,
    Done,
}

#[derive(Clone, Copy, Debug)]
struct Countdown {
    remaining_ms: u32,
    half_ms: u32,
    half_fired: bool,
}

impl Countdown {
    fn new(duration_ms: u32, half_ms: u32) -> Self {
        Self {
            remaining_ms: duration_ms,
            half_ms,
            half_fired: false,
        }
    }

    /// Reports at most one mark per frame. A step that jumps past both marks
    /// reports the half now and the end on the next frame.
    fn tick(&mut self, ms: u32) -> Mark {
        self.remaining_ms = self.remaining_ms.saturating_sub(ms);
        if !self.half_fired && self.remaining_ms < self.half_ms {
            self.half_fired = true;
            Mark::Half
        } else if self.remaining_ms == 0 {
            Mark::Done
        } else {
            Mark::Running
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PreLevel {
    countdown: Countdown,
    consume_life: bool,
}

#[derive(Clone, Copy, Debug)]
struct EndLevel {
    countdown: Countdown,
    outcome: LevelOutcome,
}

/// Level-flow countdowns. Only the highest-priority running one advances each frame.
#[derive(Clone, Debug, Default)]
pub struct FlowTimers {
    pre_level: Option<PreLevel>,
    end_level: Option<EndLevel>,
    post_kill: Option<Countdown>,
}

impl FlowTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn start_from_menu(&mut self) {
        self.start_pre_level(PRE_LEVEL_MS, true);
    }

    pub fn start_from_win(&mut self) {
        self.start_pre_level(PRE_LEVEL_RESTART_MS, false);
    }

    pub fn start_from_loss(&mut self) {
        self.start_pre_level(PRE_LEVEL_RESTART_MS, true);
    }

    fn start_pre_level(&mut self, duration_ms: u32, consume_life: bool) {
        self.pre_level = Some(PreLevel {
            countdown: Countdown::new(duration_ms, PRE_LEVEL_HALF_MS),
            consume_life,
        });
    }

    pub fn start_end_level(&mut self, outcome: LevelOutcome) {
        self.end_level = Some(EndLevel {
            countdown: Countdown::new(END_LEVEL_MS, END_LEVEL_HALF_MS),
            outcome,
        });
    }

    pub fn start_post_kill(&mut self) {
        self.post_kill = Some(Countdown::new(POST_KILL_PAUSE_MS, 0));
    }

    /// `lives` is read when a lost level ends to choose between restart and game over.
    pub fn update(&mut self, ms: u32, lives: u32, out: &mut Dispatcher) {
        if let Some(pre) = self.pre_level.as_mut() {
            match pre.countdown.tick(ms) {
                Mark::Half => {
                    out.post(GameEvent::UiEnterPregame);
                    out.post(GameEvent::AgentsVisible);
                    if pre.consume_life {
                        out.post(GameEvent::ConsumeLife);
                    }
                }
                Mark::Done => {
                    self.pre_level = None;
                    out.post(GameEvent::UiEnterGame);
                    out.post(GameEvent::Unpause);
                }
                Mark::Running => {}
            }
            return;
        }

        if let Some(end) = self.end_level.as_mut() {
            let outcome = end.outcome;
            match end.countdown.tick(ms) {
                Mark::Half => {
                    out.post(GameEvent::HuntersInvisible);
                    match outcome {
                        LevelOutcome::Loss => {
                            out.post(GameEvent::PlaySeekerDeath);
                            out.sound(SoundCue::SeekerDeath);
                        }
                        LevelOutcome::Win => {
                            out.post(GameEvent::PointsEliminationBonus);
                            out.post(GameEvent::PlayTileFlash);
                        }
                    }
                }
                Mark::Done => {
                    self.end_level = None;
                    out.post(match outcome {
                        LevelOutcome::Loss if lives == 0 => GameEvent::GameOver,
                        LevelOutcome::Loss => GameEvent::StartFromLevelLoss,
                        LevelOutcome::Win => GameEvent::StartFromLevelWin,
                    });
                }
                Mark::Running => {}
            }
            return;
        }

        if let Some(post) = self.post_kill.as_mut() {
            if post.tick(ms) == Mark::Done {
                self.post_kill = None;
                out.post(GameEvent::Unpause);
            }
        }
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

    fn run(timers: &mut FlowTimers, frames: usize, lives: u32, out: &mut Dispatcher) -> Vec<GameEvent> {
        for _ in 0..frames {
            timers.update(16, lives, out);
        }
        drain(out)
    }

    #[test]
    fn menu_start_announces_halfway_then_unpauses() {
        let mut timers = FlowTimers::new();
        let mut out = Dispatcher::new();
        timers.start_from_menu();

        assert!(run(&mut timers, 125, 3, &mut out).is_empty());
        assert_eq!(
            run(&mut timers, 1, 3, &mut out),
            vec![
                GameEvent::UiEnterPregame,
                GameEvent::AgentsVisible,
                GameEvent::ConsumeLife
            ]
        );
        assert_eq!(
            run(&mut timers, 200, 3, &mut out),
            vec![GameEvent::UiEnterGame, GameEvent::Unpause]
        );
        assert!(timers.pre_level.is_none());
        assert!(timers.end_level.is_none());
        assert!(timers.post_kill.is_none());
    }

    #[test]
    fn restart_after_a_win_keeps_the_life() {
        let mut timers = FlowTimers::new();
        let mut out = Dispatcher::new();
        timers.start_from_win();
        let first = run(&mut timers, 1, 3, &mut out);
        assert_eq!(first, vec![GameEvent::UiEnterPregame, GameEvent::AgentsVisible]);
    }

    #[test]
    fn lost_level_plays_death_then_restarts_or_ends() {
        let mut timers = FlowTimers::new();
        let mut out = Dispatcher::new();
        timers.start_end_level(LevelOutcome::Loss);
        let events = run(&mut timers, 200, 2, &mut out);
        assert_eq!(
            events,
            vec![
                GameEvent::HuntersInvisible,
                GameEvent::PlaySeekerDeath,
                GameEvent::StartFromLevelLoss
            ]
        );
        assert_eq!(out.take_sounds(), vec![SoundCue::SeekerDeath]);

        timers.start_end_level(LevelOutcome::Loss);
        let events = run(&mut timers, 200, 0, &mut out);
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
    }

    #[test]
    fn won_level_awards_bonus_and_flashes() {
        let mut timers = FlowTimers::new();
        let mut out = Dispatcher::new();
        timers.start_end_level(LevelOutcome::Win);
        let events = run(&mut timers, 200, 1, &mut out);
        assert_eq!(
            events,
            vec![
                GameEvent::HuntersInvisible,
                GameEvent::PointsEliminationBonus,
                GameEvent::PlayTileFlash,
                GameEvent::StartFromLevelWin
            ]
        );
    }

    #[test]
    fn pre_level_blocks_other_timers() {
        let mut timers = FlowTimers::new();
        let mut out = Dispatcher::new();
        timers.start_post_kill();
        timers.start_from_menu();
        run(&mut timers, 100, 3, &mut out);
        assert!(timers.post_kill.is_some());
        assert!(timers.pre_level.is_some());

        let events = run(&mut timers, 300, 3, &mut out);
        assert!(timers.pre_level.is_none());
        assert!(timers.post_kill.is_none());
        assert_eq!(
            events.iter().filter(|event| **event == GameEvent::Unpause).count(),
            2
        );
    }

    #[test]
    fn post_kill_pause_lasts_750ms() {
        let mut timers = FlowTimers::new();
        let mut out = Dispatcher::new();
        timers.start_post_kill();
        timers.update(749, 3, &mut out);
        assert!(out.game.is_empty());
        timers.update(1, 3, &mut out);
        assert_eq!(drain(&mut out), vec![GameEvent::Unpause]);
    }

    #[test]
    fn a_long_step_reports_the_half_mark_before_finishing() {
        let mut timers = FlowTimers::new();
        let mut out = Dispatcher::new();
        timers.start_from_menu();
        timers.update(5_000, 3, &mut out);
        assert_eq!(
            drain(&mut out),
            vec![
                GameEvent::UiEnterPregame,
                GameEvent::AgentsVisible,
                GameEvent::ConsumeLife
            ]
        );
        timers.update(16, 3, &mut out);
        assert_eq!(
            drain(&mut out),
            vec![GameEvent::UiEnterGame, GameEvent::Unpause]
        );

        timers.start_end_level(LevelOutcome::Loss);
        timers.update(3_000, 1, &mut out);
        assert_eq!(
            drain(&mut out),
            vec![GameEvent::HuntersInvisible, GameEvent::PlaySeekerDeath]
        );
        timers.update(16, 1, &mut out);
        assert_eq!(drain(&mut out), vec![GameEvent::StartFromLevelLoss]);
    }
}
