use crate::constants::{
    level_table_index, ELIMINATIONS_FOR_BONUS, EXTRA_LIFE_THRESHOLDS, FRIGHTENED_MS_BY_LEVEL,
    POINTS_ELIMINATION_BONUS, POINTS_ELIMINATION_CHAIN, POINTS_PELLET, POINTS_POWER_PELLET,
    SPECIAL_MODE_STAGE2_BOOST, STARTING_LIVES,
};
use crate::types::{BonusKind, SpecialModeStage};

pub const KILL_SCREEN_LEVEL: u32 = 256;

/// Speed multipliers applied on top of the base agent speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedProfile {
    pub seeker: f32,
    pub seeker_eating: f32,
    pub seeker_frightened: f32,
    pub seeker_frightened_eating: f32,
    pub hunter: f32,
    pub hunter_frightened: f32,
    pub hunter_tunnel: f32,
    pub special_mode: f32,
}

impl SpeedProfile {
    pub fn level_one() -> Self {
        Self {
            seeker: 0.8,
            seeker_eating: 0.71,
            seeker_frightened: 0.9,
            seeker_frightened_eating: 0.79,
            hunter: 0.75,
            hunter_frightened: 0.5,
            hunter_tunnel: 0.4,
            special_mode: 0.8,
        }
    }

    pub fn special_mode_speed(&self, stage: SpecialModeStage) -> Option<f32> {
        match stage {
            SpecialModeStage::Off => None,
            SpecialModeStage::Stage1 => Some(self.special_mode),
            SpecialModeStage::Stage2 => Some(self.special_mode + SPECIAL_MODE_STAGE2_BOOST),
        }
    }

    fn shift_seeker(&mut self, sign: f32) {
        self.seeker += 0.1 * sign;
        self.seeker_eating += 0.08 * sign;
        self.seeker_frightened += 0.05 * sign;
        self.seeker_frightened_eating += 0.04 * sign;
    }
}

#[derive(Clone, Debug)]
pub struct Stats {
    level: u32,
    lives: u32,
    score: i32,
    high_score: i32,
    eliminations_on_pellet: u32,
    eliminations_this_level: u32,
    speeds: SpeedProfile,
    special_mode_dots: f32,
}

impl Stats {
    pub fn new(high_score: i32) -> Self {
        Self {
            level: 1,
            lives: STARTING_LIVES,
            score: 0,
            high_score: high_score.max(0),
            eliminations_on_pellet: 0,
            eliminations_this_level: 0,
            speeds: SpeedProfile::level_one(),
            special_mode_dots: 0.05,
        }
    }

    /// Fresh game; the high score survives.
    pub fn reset(&mut self) {
        *self = Self::new(self.high_score);
    }

    pub fn next_level(&mut self) {
        self.eliminations_on_pellet = 0;
        self.eliminations_this_level = 0;
        self.level += 1;

        match self.level {
            2 | 5 => {
                self.speeds.shift_seeker(1.0);
                self.speeds.hunter += 0.1;
                self.speeds.hunter_frightened += 0.05;
                self.speeds.hunter_tunnel += 0.05;
                self.speeds.special_mode += 0.1;
                self.special_mode_dots += 0.04;
            }
            3 | 6 | 9 => self.special_mode_dots += 0.04,
            12 | 15 | 19 => self.special_mode_dots += 0.08,
            21 => self.speeds.shift_seeker(-1.0),
            _ => {}
        }
    }

    pub fn is_kill_screen(&self) -> bool {
        self.level >= KILL_SCREEN_LEVEL
    }

    pub fn consume_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Adds points and returns how many extra lives the new total earned.
    pub fn award(&mut self, points: i32) -> u32 {
        let before = self.score;
        self.score += points;
        let earned = EXTRA_LIFE_THRESHOLDS
            .iter()
            .filter(|threshold| before < **threshold && self.score >= **threshold)
            .count() as u32;
        self.lives += earned;
        self.high_score = self.high_score.max(self.score);
        earned
    }

    pub fn pellet_collected(&mut self) -> u32 {
        self.award(POINTS_PELLET)
    }

    /// A power pellet restarts the elimination chain.
    pub fn power_pellet_collected(&mut self) -> u32 {
        self.eliminations_on_pellet = 0;
        self.award(POINTS_POWER_PELLET)
    }

    pub fn hunter_eliminated(&mut self) -> u32 {
        self.eliminations_on_pellet += 1;
        self.eliminations_this_level += 1;
        let points = POINTS_ELIMINATION_CHAIN
            .get(self.eliminations_on_pellet as usize - 1)
            .copied()
            .unwrap_or(0);
        self.award(points)
    }

    pub fn elimination_bonus(&mut self) -> u32 {
        if self.eliminations_this_level == ELIMINATIONS_FOR_BONUS {
            return self.award(POINTS_ELIMINATION_BONUS);
        }
        0
    }

    pub fn bonus_collected(&mut self) -> u32 {
        self.award(self.bonus_kind().points())
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn high_score(&self) -> i32 {
        self.high_score
    }

    pub fn speeds(&self) -> &SpeedProfile {
        &self.speeds
    }

    pub fn frightened_ms(&self) -> u32 {
        FRIGHTENED_MS_BY_LEVEL[level_table_index(self.level)]
    }

    pub fn special_mode_dots(&self, stage: SpecialModeStage) -> Option<f32> {
        match stage {
            SpecialModeStage::Off => Some(self.special_mode_dots),
            SpecialModeStage::Stage1 => Some(self.special_mode_dots / 2.0),
            SpecialModeStage::Stage2 => None,
        }
    }

    pub fn bonus_kind(&self) -> BonusKind {
        BonusKind::for_level(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn fresh_game_defaults() {
        let stats = Stats::new(4_200);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.lives(), 3);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.high_score(), 4_200);
        assert_eq!(stats.frightened_ms(), 6_000);
        assert_eq!(stats.bonus_kind(), BonusKind::Cherry);
    }

    #[test]
    fn crossing_ten_thousand_grants_one_life() {
        let mut stats = Stats::new(0);
        stats.award(9_990);
        assert_eq!(stats.pellet_collected(), 1);
        assert_eq!(stats.lives(), 4);
        assert_eq!(stats.pellet_collected(), 0);
        assert_eq!(stats.lives(), 4);
    }

    #[test]
    fn jumping_over_the_threshold_still_grants_exactly_one_life() {
        let mut stats = Stats::new(0);
        stats.award(9_000);
        assert_eq!(stats.award(2_000), 1);
        assert_eq!(stats.score(), 11_000);
        assert_eq!(stats.lives(), 4);
    }

    #[test]
    fn high_score_follows_score() {
        let mut stats = Stats::new(100);
        stats.award(50);
        assert_eq!(stats.high_score(), 100);
        stats.award(60);
        assert_eq!(stats.high_score(), 110);
        stats.reset();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.high_score(), 110);
    }

    #[test]
    fn elimination_chain_doubles_and_power_pellet_restarts_it() {
        let mut stats = Stats::new(0);
        for _ in 0..4 {
            stats.hunter_eliminated();
        }
        assert_eq!(stats.score(), 200 + 400 + 800 + 1_600);
        stats.power_pellet_collected();
        stats.hunter_eliminated();
        assert_eq!(stats.score(), 3_000 + 50 + 200);
    }

    #[test]
    fn elimination_bonus_needs_all_sixteen() {
        let mut stats = Stats::new(0);
        for _ in 0..4 {
            stats.power_pellet_collected();
            for _ in 0..4 {
                stats.hunter_eliminated();
            }
        }
        let before = stats.score();
        stats.elimination_bonus();
        assert_eq!(stats.score() - before, 12_000);

        stats.next_level();
        let before = stats.score();
        stats.elimination_bonus();
        assert_eq!(stats.score(), before);
    }

    #[test]
    fn level_two_speeds_up_everyone() {
        let mut stats = Stats::new(0);
        stats.next_level();
        let speeds = stats.speeds();
        assert!(approx_eq(speeds.seeker, 0.9));
        assert!(approx_eq(speeds.hunter, 0.85));
        assert!(approx_eq(speeds.hunter_tunnel, 0.45));
        assert!(approx_eq(
            stats.special_mode_dots(SpecialModeStage::Off).unwrap_or_default(),
            0.09
        ));
        assert_eq!(stats.bonus_kind(), BonusKind::Strawberry);
        assert_eq!(stats.frightened_ms(), 5_000);
    }

    #[test]
    fn level_twenty_one_slows_the_seeker_back_down() {
        let mut stats = Stats::new(0);
        for _ in 1..20 {
            stats.next_level();
        }
        let before = stats.speeds().seeker;
        stats.next_level();
        assert_eq!(stats.level(), 21);
        assert!(approx_eq(stats.speeds().seeker, before - 0.1));
        assert_eq!(stats.frightened_ms(), 0);
    }

    #[test]
    fn special_mode_thresholds_halve_for_stage_two() {
        let stats = Stats::new(0);
        assert_eq!(stats.special_mode_dots(SpecialModeStage::Stage1), Some(0.025));
        assert_eq!(stats.special_mode_dots(SpecialModeStage::Stage2), None);
        assert!(approx_eq(
            stats
                .speeds()
                .special_mode_speed(SpecialModeStage::Stage2)
                .unwrap_or_default(),
            0.85
        ));
    }

    #[test]
    fn lives_never_underflow() {
        let mut stats = Stats::new(0);
        for _ in 0..5 {
            stats.consume_life();
        }
        assert_eq!(stats.lives(), 0);
    }
}
