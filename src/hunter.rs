use crate::agent::Agent;
use crate::board::{TileGraph, TileId};
use crate::constants::{ANIM_FRAME_MS, BASE_SPEED, RETREAT_SPEED_MULTIPLIER, SHY_RADIUS_SQUARED};
use crate::rng::Rng;
use crate::stats::SpeedProfile;
use crate::types::{
    AgentView, Direction, HunterKind, HunterView, MovementState, PhaseMode, SpecialModeStage,
    SpriteState, TargetingState, TraverseKind, WorldPos,
};

const SPAWN_FACING: Direction = Direction::Left;
const AMBUSH_LOOK_AHEAD: usize = 4;
const FLANK_LOOK_AHEAD: usize = 2;

/// What the hunters need to know about the seeker when choosing a chase target.
#[derive(Clone, Copy, Debug)]
pub struct ChaseView {
    pub seeker_tile: TileId,
    pub seeker_facing: Direction,
    pub direct_tile: TileId,
}

/// Tile `count` steps ahead of `tile`. Facing up also shifts `count` tiles left,
/// which the ambush and flank strategies rely on.
pub fn ahead_of(graph: &TileGraph, tile: TileId, facing: Direction, count: usize) -> TileId {
    match facing {
        Direction::Up => graph.look_ahead(
            graph.look_ahead(tile, Direction::Up, count),
            Direction::Left,
            count,
        ),
        _ => graph.look_ahead(tile, facing, count),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Direct { stage: SpecialModeStage },
    Ambush,
    Flank,
    Shy,
}

impl Strategy {
    fn for_kind(kind: HunterKind) -> Self {
        match kind {
            HunterKind::Direct => Self::Direct {
                stage: SpecialModeStage::Off,
            },
            HunterKind::Ambush => Self::Ambush,
            HunterKind::Flank => Self::Flank,
            HunterKind::Shy => Self::Shy,
        }
    }

    fn chase_target(
        &self,
        graph: &TileGraph,
        view: &ChaseView,
        own_position: WorldPos,
        corner: TileId,
    ) -> TileId {
        match self {
            Self::Direct { .. } => view.seeker_tile,
            Self::Ambush => ahead_of(graph, view.seeker_tile, view.seeker_facing, AMBUSH_LOOK_AHEAD),
            Self::Flank => {
                let ahead = ahead_of(graph, view.seeker_tile, view.seeker_facing, FLANK_LOOK_AHEAD);
                let pivot = graph.tile(ahead);
                let direct = graph.tile(view.direct_tile);
                let col_delta = pivot.col as isize - direct.col as isize;
                let row_delta = pivot.row as isize - direct.row as isize;
                let horizontal = if col_delta >= 0 {
                    Direction::Right
                } else {
                    Direction::Left
                };
                let vertical = if row_delta >= 0 {
                    Direction::Down
                } else {
                    Direction::Up
                };
                let shifted = graph.look_ahead(ahead, horizontal, col_delta.unsigned_abs());
                graph.look_ahead(shifted, vertical, row_delta.unsigned_abs())
            }
            Self::Shy => {
                let gap = own_position.square_distance(graph.position(view.seeker_tile));
                if gap < SHY_RADIUS_SQUARED {
                    corner
                } else {
                    view.seeker_tile
                }
            }
        }
    }

    fn special_mode(&self) -> SpecialModeStage {
        match self {
            Self::Direct { stage } => *stage,
            _ => SpecialModeStage::Off,
        }
    }

    fn try_advance_special_mode(&mut self) -> bool {
        let Self::Direct { stage } = self else {
            return false;
        };
        *stage = match stage {
            SpecialModeStage::Off => SpecialModeStage::Stage1,
            SpecialModeStage::Stage1 => SpecialModeStage::Stage2,
            SpecialModeStage::Stage2 => return false,
        };
        true
    }
}

#[derive(Clone, Debug)]
pub struct Hunter {
    pub kind: HunterKind,
    pub agent: Agent,
    strategy: Strategy,
    targeting: TargetingState,
    home_phase: PhaseMode,
    target: TileId,
    corner: TileId,
    home_area: TileId,
    reverse_pending: bool,
    in_home: bool,
    frightened_ms: u32,
    frightened_duration_ms: u32,
    flashing: bool,
}

impl Hunter {
    pub fn new(
        graph: &TileGraph,
        kind: HunterKind,
        spawn: TileId,
        corner: TileId,
        home_area: TileId,
    ) -> Self {
        let mut hunter = Self {
            kind,
            agent: Agent::new(graph, spawn, SPAWN_FACING, ANIM_FRAME_MS),
            strategy: Strategy::for_kind(kind),
            targeting: TargetingState::Scattering,
            home_phase: PhaseMode::Scatter,
            target: corner,
            corner,
            home_area,
            reverse_pending: false,
            in_home: false,
            frightened_ms: 0,
            frightened_duration_ms: 0,
            flashing: false,
        };
        hunter.reset(graph);
        hunter
    }

    /// New level: back to spawn, scatter phase, special mode off.
    pub fn reset(&mut self, graph: &TileGraph) {
        self.home_phase = PhaseMode::Scatter;
        self.strategy = Strategy::for_kind(self.kind);
        self.reset_from_death(graph);
    }

    /// Seeker lost a life: back to spawn keeping the current phase.
    pub fn reset_from_death(&mut self, graph: &TileGraph) {
        self.agent.reset(graph, SPAWN_FACING, ANIM_FRAME_MS);
        if let Strategy::Direct { stage } = &mut self.strategy {
            *stage = SpecialModeStage::Off;
        }
        self.targeting = self.home_phase.targeting();
        self.target = self.corner;
        self.reverse_pending = false;
        self.frightened_ms = 0;
        self.flashing = false;

        let starts_outside = self.kind == HunterKind::Direct;
        self.in_home = !starts_outside;
        self.agent.alive = starts_outside;
    }

    pub fn targeting(&self) -> TargetingState {
        self.targeting
    }

    pub fn home_phase(&self) -> PhaseMode {
        self.home_phase
    }

    pub fn target(&self) -> TileId {
        self.target
    }

    pub fn in_home(&self) -> bool {
        self.in_home
    }

    pub fn is_frightened(&self) -> bool {
        self.targeting == TargetingState::Frightened
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    pub fn reverse_pending(&self) -> bool {
        self.reverse_pending
    }

    pub fn special_mode(&self) -> SpecialModeStage {
        self.strategy.special_mode()
    }

    /// Only honored while alive and outside the home.
    pub fn flag_reverse(&mut self) {
        if !self.in_home && self.agent.alive {
            self.reverse_pending = true;
        }
    }

    pub fn set_phase(&mut self, mode: PhaseMode) {
        if mode == PhaseMode::Scatter && self.special_mode() != SpecialModeStage::Off {
            return;
        }
        self.home_phase = mode;
        if self.agent.alive && !self.is_frightened() {
            self.targeting = mode.targeting();
        }
    }

    pub fn frighten(&mut self, duration_ms: u32) {
        if self.targeting == TargetingState::Retreating {
            return;
        }
        self.targeting = TargetingState::Frightened;
        self.frightened_ms = duration_ms;
        self.frightened_duration_ms = duration_ms;
        self.flashing = false;
        self.agent.anim.restart(ANIM_FRAME_MS, true);
        self.flag_reverse();
    }

    pub fn calm(&mut self) {
        if !self.is_frightened() {
            return;
        }
        self.targeting = self.home_phase.targeting();
        self.frightened_ms = 0;
        self.flashing = false;
    }

    /// Only a hunter outside the home can be eliminated.
    pub fn eliminate(&mut self) {
        if self.in_home {
            return;
        }
        self.calm();
        self.agent.alive = false;
        self.targeting = TargetingState::Retreating;
    }

    /// Releases a hunter waiting inside the home.
    pub fn spawn(&mut self) {
        if !self.in_home || self.agent.alive {
            return;
        }
        self.agent.alive = true;
        if !self.is_frightened() {
            self.targeting = self.home_phase.targeting();
        }
    }

    fn revive(&mut self) {
        self.agent.alive = true;
        self.targeting = self.home_phase.targeting();
    }

    /// Steps the special mode where the variant has one; a no-op otherwise.
    pub fn try_advance_special_mode(&mut self) -> bool {
        self.strategy.try_advance_special_mode()
    }

    pub fn update_timers(&mut self, ms: u32) {
        if self.agent.paused || !self.is_frightened() {
            return;
        }
        if self.frightened_ms == 0 {
            self.calm();
            return;
        }
        self.frightened_ms = self.frightened_ms.saturating_sub(ms);
        if self.frightened_ms < self.frightened_duration_ms / 4 {
            self.flashing = true;
        }
    }

    pub fn update_movement(&mut self, graph: &TileGraph, view: &ChaseView, rng: &mut Rng, ms: u32) {
        if self.agent.paused {
            return;
        }
        match self.agent.movement {
            MovementState::Traveling => self.agent.travel(graph, ms),
            MovementState::AtNode => {
                self.choose_target(graph, view);
                self.choose_next_tile(graph, rng);
            }
        }
    }

    fn choose_target(&mut self, graph: &TileGraph, view: &ChaseView) {
        self.target = match self.targeting {
            TargetingState::Chasing => {
                self.strategy
                    .chase_target(graph, view, self.agent.position, self.corner)
            }
            TargetingState::Scattering => self.corner,
            TargetingState::Retreating => self.home_area,
            TargetingState::Frightened => self.target,
        };
    }

    fn choose_next_tile(&mut self, graph: &TileGraph, rng: &mut Rng) {
        if self.reverse_pending {
            self.reverse_pending = false;
            if let Some(back) = self.forced(graph, self.agent.facing.opposite()) {
                self.agent.depart(graph, back.0, back.1);
                return;
            }
        }

        let frightened = self.is_frightened();
        let retreating = self.targeting == TargetingState::Retreating;
        let choice = match graph.tile(self.agent.current).traverse {
            TraverseKind::Open
            | TraverseKind::HunterOnly
            | TraverseKind::Tunnel
            | TraverseKind::Teleport => self.first_open(graph),
            TraverseKind::Intersection if frightened => self.random(graph, rng),
            TraverseKind::Intersection => self.closest(graph, None),
            TraverseKind::NoUpIntersection if frightened => self.random(graph, rng),
            TraverseKind::NoUpIntersection if retreating => self.closest(graph, None),
            TraverseKind::NoUpIntersection => self.closest(graph, Some(Direction::Up)),
            TraverseKind::HomeEnter => {
                self.in_home = false;
                if self.agent.alive {
                    self.closest(graph, Some(Direction::Down))
                } else {
                    self.forced(graph, Direction::Down)
                }
            }
            TraverseKind::HomeExit => {
                self.in_home = true;
                if self.agent.alive {
                    self.forced(graph, Direction::Up)
                } else {
                    let inward = self.forced(graph, Direction::Left);
                    if retreating {
                        self.revive();
                    }
                    inward
                }
            }
            TraverseKind::Blocked => None,
        };

        debug_assert!(
            choice.is_some(),
            "{:?} hunter has no exit from row {} col {}",
            self.kind,
            graph.tile(self.agent.current).row,
            graph.tile(self.agent.current).col
        );
        if let Some((dir, next)) = choice {
            self.agent.depart(graph, dir, next);
        }
    }

    fn reverse(&self) -> Direction {
        self.agent.facing.opposite()
    }

    fn forced(&self, graph: &TileGraph, dir: Direction) -> Option<(Direction, TileId)> {
        graph
            .neighbor(self.agent.current, dir)
            .filter(|next| graph.tile(*next).is_hunter_traversable())
            .map(|next| (dir, next))
    }

    fn first_open(&self, graph: &TileGraph) -> Option<(Direction, TileId)> {
        let reverse = self.reverse();
        Direction::PRIORITY
            .into_iter()
            .filter(|dir| *dir != reverse)
            .find_map(|dir| {
                graph
                    .neighbor(self.agent.current, dir)
                    .filter(|next| graph.tile(*next).is_traversable())
                    .map(|next| (dir, next))
            })
    }

    /// Greedy step toward the target; strict comparison keeps earlier directions on ties.
    fn closest(&self, graph: &TileGraph, forbidden: Option<Direction>) -> Option<(Direction, TileId)> {
        let reverse = self.reverse();
        let mut best: Option<(Direction, TileId)> = None;
        let mut best_distance = f32::INFINITY;
        for dir in Direction::PRIORITY {
            if dir == reverse || Some(dir) == forbidden {
                continue;
            }
            let Some(next) = graph.neighbor(self.agent.current, dir) else {
                continue;
            };
            if !graph.tile(next).is_hunter_traversable() {
                continue;
            }
            let distance = graph.square_distance(next, self.target);
            if distance < best_distance {
                best_distance = distance;
                best = Some((dir, next));
            }
        }
        best
    }

    fn random(&self, graph: &TileGraph, rng: &mut Rng) -> Option<(Direction, TileId)> {
        let dir = rng.direction();
        let pick = graph
            .neighbor(self.agent.current, dir)
            .filter(|next| dir != self.reverse() && graph.tile(*next).is_traversable());
        match pick {
            Some(next) => Some((dir, next)),
            None => self.first_open(graph),
        }
    }

    pub fn update_animation(&mut self, ms: u32) {
        if !self.agent.paused {
            self.agent.anim.advance(ms);
        }
    }

    pub fn update_speed(&mut self, graph: &TileGraph, speeds: &SpeedProfile) {
        let multiplier = match self.targeting {
            TargetingState::Frightened => speeds.hunter_frightened,
            TargetingState::Chasing | TargetingState::Scattering => {
                match speeds.special_mode_speed(self.special_mode()) {
                    Some(speed) => speed,
                    None if graph.tile(self.agent.current).is_tunnel() => speeds.hunter_tunnel,
                    None => speeds.hunter,
                }
            }
            TargetingState::Retreating if self.in_home => speeds.hunter,
            TargetingState::Retreating => RETREAT_SPEED_MULTIPLIER,
        };
        self.agent.speed = BASE_SPEED * multiplier;
    }

    pub fn sprite(&self) -> SpriteState {
        match self.targeting {
            TargetingState::Frightened if self.flashing => SpriteState::FrightenedFlash,
            TargetingState::Frightened => SpriteState::Frightened,
            TargetingState::Retreating if !self.in_home => SpriteState::Eyes,
            _ => SpriteState::Hunter,
        }
    }

    pub fn view(&self, graph: &TileGraph) -> HunterView {
        let tile = graph.tile(self.agent.current);
        let target = graph.tile(self.target);
        HunterView {
            kind: self.kind,
            agent: AgentView {
                x: self.agent.position.x,
                y: self.agent.position.y,
                row: tile.row,
                col: tile.col,
                facing: self.agent.facing,
                movement: self.agent.movement,
                sprite: self.sprite(),
                frame: self.agent.anim.frame,
                visible: self.agent.visible,
                alive: self.agent.alive,
            },
            targeting: self.targeting,
            in_home: self.in_home,
            target_row: target.row,
            target_col: target.col,
        }
    }
}
