use crate::board::{TileGraph, TileId};
use crate::constants::{BONUS_FRACTION_FIRST, BONUS_FRACTION_SECOND, BONUS_VISIBLE_MS};
use crate::events::Dispatcher;
use crate::types::{BonusKind, BonusView, GameEvent, SoundCue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BonusPhase {
    Pending,
    First,
    Second,
}

/// The fruit shown twice per level at the bonus anchor.
#[derive(Clone, Debug)]
pub struct BonusItem {
    anchor: TileId,
    kind: BonusKind,
    phase: BonusPhase,
    remaining_ms: u32,
    visible: bool,
    paused: bool,
    collected: Vec<BonusKind>,
}

impl BonusItem {
    pub fn new(anchor: TileId) -> Self {
        let mut item = Self {
            anchor,
            kind: BonusKind::Cherry,
            phase: BonusPhase::Pending,
            remaining_ms: 0,
            visible: false,
            paused: true,
            collected: Vec::new(),
        };
        item.reset();
        item
    }

    /// New game.
    pub fn reset(&mut self) {
        self.reset_from_death();
        self.phase = BonusPhase::Pending;
        self.kind = BonusKind::Cherry;
        self.collected = vec![BonusKind::Cherry];
    }

    pub fn reset_from_death(&mut self) {
        self.remaining_ms = 0;
        self.visible = false;
        self.paused = true;
    }

    pub fn next_level(&mut self, kind: BonusKind) {
        self.reset_from_death();
        self.phase = BonusPhase::Pending;
        self.kind = kind;
    }

    /// Remaining-pellet fraction below which the next appearance triggers.
    pub fn activation_threshold(&self) -> Option<f32> {
        match self.phase {
            BonusPhase::Pending => Some(BONUS_FRACTION_FIRST),
            BonusPhase::First => Some(BONUS_FRACTION_SECOND),
            BonusPhase::Second => None,
        }
    }

    pub fn activate(&mut self) {
        self.phase = match self.phase {
            BonusPhase::Pending => BonusPhase::First,
            BonusPhase::First | BonusPhase::Second => BonusPhase::Second,
        };
        self.remaining_ms = BONUS_VISIBLE_MS;
        self.visible = true;
    }

    fn deactivate(&mut self) {
        self.visible = false;
        self.remaining_ms = 0;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn phase(&self) -> BonusPhase {
        self.phase
    }

    pub fn kind(&self) -> BonusKind {
        self.kind
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn collected(&self) -> &[BonusKind] {
        &self.collected
    }

    /// `seeker_node` is the seeker's tile when it rests AT_NODE.
    pub fn update(&mut self, ms: u32, seeker_node: Option<TileId>, out: &mut Dispatcher) {
        if !self.visible || self.paused {
            return;
        }
        if seeker_node == Some(self.anchor) {
            out.post(GameEvent::PointsBonusItem);
            out.sound(SoundCue::BonusItem);
            if !self.collected.contains(&self.kind) {
                self.collected.push(self.kind);
            }
            self.deactivate();
            return;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(ms);
        if self.remaining_ms == 0 {
            self.deactivate();
        }
    }

    pub fn view(&self, graph: &TileGraph) -> Option<BonusView> {
        if !self.visible {
            return None;
        }
        let tile = graph.tile(self.anchor);
        Some(BonusView {
            kind: self.kind,
            row: tile.row,
            col: tile.col,
            remaining_ms: self.remaining_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_item() -> BonusItem {
        let mut item = BonusItem::new(7);
        item.unpause();
        item.activate();
        item
    }

    #[test]
    fn appears_twice_per_level() {
        let mut item = BonusItem::new(7);
        assert_eq!(item.activation_threshold(), Some(0.71));
        item.activate();
        assert_eq!(item.phase(), BonusPhase::First);
        assert_eq!(item.activation_threshold(), Some(0.3));
        item.activate();
        assert_eq!(item.activation_threshold(), None);

        item.next_level(BonusKind::Strawberry);
        assert_eq!(item.phase(), BonusPhase::Pending);
        assert_eq!(item.kind(), BonusKind::Strawberry);
        assert!(!item.is_visible());
    }

    #[test]
    fn seeker_on_anchor_collects_it() {
        let mut item = active_item();
        let mut out = Dispatcher::new();
        item.update(16, Some(3), &mut out);
        assert!(item.is_visible());
        item.update(16, Some(7), &mut out);
        assert!(!item.is_visible());
        assert_eq!(out.game.pop(), Some(GameEvent::PointsBonusItem));
        assert_eq!(out.take_sounds(), vec![SoundCue::BonusItem]);
    }

    #[test]
    fn expires_after_ten_seconds() {
        let mut item = active_item();
        let mut out = Dispatcher::new();
        item.update(9_999, None, &mut out);
        assert!(item.is_visible());
        item.update(1, None, &mut out);
        assert!(!item.is_visible());
        assert!(out.game.is_empty());
    }

    #[test]
    fn paused_item_neither_ticks_nor_collects() {
        let mut item = active_item();
        item.pause();
        let mut out = Dispatcher::new();
        item.update(20_000, Some(7), &mut out);
        assert!(item.is_visible());
        assert!(out.game.is_empty());
    }

    #[test]
    fn collected_kinds_survive_levels_but_not_games() {
        let mut item = active_item();
        item.next_level(BonusKind::Peach);
        item.unpause();
        item.activate();
        item.update(16, Some(7), &mut Dispatcher::new());
        assert_eq!(item.collected(), &[BonusKind::Cherry, BonusKind::Peach]);
        item.next_level(BonusKind::Apple);
        assert_eq!(item.collected().len(), 2);
        item.reset();
        assert_eq!(item.collected(), &[BonusKind::Cherry]);
    }
}
