use crate::agent::Agent;
use crate::board::{TileGraph, TileId};
use crate::constants::{BASE_SPEED, SEEKER_ANIM_FRAME_MS, SEEKER_DEATH_FRAME_MS};
use crate::stats::SpeedProfile;
use crate::types::{AgentView, Direction, InputSnapshot, MovementState, SpriteState};

const SPAWN_FACING: Direction = Direction::Up;

/// The player-controlled agent.
#[derive(Clone, Debug)]
pub struct Seeker {
    pub agent: Agent,
    dying: bool,
}

impl Seeker {
    pub fn new(graph: &TileGraph, spawn: TileId) -> Self {
        Self {
            agent: Agent::new(graph, spawn, SPAWN_FACING, SEEKER_ANIM_FRAME_MS),
            dying: false,
        }
    }

    pub fn reset(&mut self, graph: &TileGraph) {
        self.agent.reset(graph, SPAWN_FACING, SEEKER_ANIM_FRAME_MS);
        self.dying = false;
    }

    pub fn current_tile(&self) -> TileId {
        self.agent.current
    }

    /// First held key in priority order, or the current facing when none is held.
    pub fn requested_direction(&self, input: &InputSnapshot) -> Direction {
        Direction::PRIORITY
            .into_iter()
            .find(|dir| input.is_held(*dir))
            .unwrap_or(self.agent.facing)
    }

    pub fn update_movement(&mut self, graph: &TileGraph, input: &InputSnapshot, ms: u32) {
        if self.agent.paused || !self.agent.alive {
            return;
        }
        self.apply_input(graph, input);
        match self.agent.movement {
            MovementState::Traveling => self.agent.travel(graph, ms),
            MovementState::AtNode => self.choose_next_tile(graph),
        }
    }

    fn apply_input(&mut self, graph: &TileGraph, input: &InputSnapshot) {
        let wanted = self.requested_direction(input);
        if wanted == self.agent.facing {
            return;
        }
        let Some(next) = graph.neighbor(self.agent.current, wanted) else {
            return;
        };
        if !graph.tile(next).is_traversable() {
            return;
        }
        self.agent.facing = wanted;
        if self.agent.movement == MovementState::Traveling {
            self.agent.snap_to_current(graph);
        }
    }

    fn choose_next_tile(&mut self, graph: &TileGraph) {
        let facing = self.agent.facing;
        if let Some(next) = graph.neighbor(self.agent.current, facing) {
            if graph.tile(next).is_traversable() {
                self.agent.depart(graph, facing, next);
            }
        }
    }

    pub fn update_animation(&mut self, ms: u32) {
        if self.dying || (!self.agent.paused && !self.agent.is_at_node()) {
            self.agent.anim.advance(ms);
        }
    }

    pub fn update_speed(&mut self, graph: &TileGraph, speeds: &SpeedProfile, frightened: bool) {
        let eating = graph.has_pellet(self.agent.current);
        let multiplier = match (frightened, eating) {
            (true, true) => speeds.seeker_frightened_eating,
            (true, false) => speeds.seeker_frightened,
            (false, true) => speeds.seeker_eating,
            (false, false) => speeds.seeker,
        };
        self.agent.speed = BASE_SPEED * multiplier;
    }

    pub fn die(&mut self) {
        self.agent.alive = false;
    }

    pub fn play_death_animation(&mut self) {
        self.dying = true;
        self.agent.anim.restart(SEEKER_DEATH_FRAME_MS, false);
    }

    pub fn is_dying(&self) -> bool {
        self.dying
    }

    pub fn view(&self, graph: &TileGraph) -> AgentView {
        let tile = graph.tile(self.agent.current);
        AgentView {
            x: self.agent.position.x,
            y: self.agent.position.y,
            row: tile.row,
            col: tile.col,
            facing: self.agent.facing,
            movement: self.agent.movement,
            sprite: if self.dying {
                SpriteState::SeekerDying
            } else {
                SpriteState::Seeker
            },
            frame: self.agent.anim.frame,
            visible: self.agent.visible,
            alive: self.agent.alive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Stats;

    const CROSS: [&str; 5] = ["#####", "##.##", "#.5o#", "##.##", "#####"];

    fn make_seeker(graph: &TileGraph) -> Seeker {
        let spawn = graph.anchors().seeker_spawn.expect("spawn anchor");
        let mut seeker = Seeker::new(graph, spawn);
        seeker.agent.paused = false;
        seeker.agent.speed = 0.5;
        seeker
    }

    #[test]
    fn held_keys_resolve_in_priority_order() {
        let graph = TileGraph::build(&CROSS).expect("board");
        let seeker = make_seeker(&graph);
        let input = InputSnapshot {
            right: true,
            down: true,
            ..InputSnapshot::default()
        };
        assert_eq!(seeker.requested_direction(&input), Direction::Down);
        assert_eq!(
            seeker.requested_direction(&InputSnapshot::default()),
            Direction::Up
        );
    }

    #[test]
    fn turns_only_toward_traversable_neighbors() {
        let graph = TileGraph::build(&["#####", "#.5.#", "#####"]).expect("board");
        let mut seeker = make_seeker(&graph);
        seeker.update_movement(&graph, &InputSnapshot::holding(Direction::Down), 16);
        assert_eq!(seeker.agent.facing, Direction::Up);
        assert!(seeker.agent.is_at_node());

        seeker.update_movement(&graph, &InputSnapshot::holding(Direction::Right), 16);
        assert_eq!(seeker.agent.facing, Direction::Right);
        assert_eq!(seeker.agent.movement, MovementState::Traveling);
    }

    #[test]
    fn reversing_mid_segment_snaps_back_and_departs() {
        let graph = TileGraph::build(&CROSS).expect("board");
        let mut seeker = make_seeker(&graph);
        let spawn = seeker.current_tile();
        let east = graph.neighbor(spawn, Direction::Right).expect("east");
        let west = graph.neighbor(spawn, Direction::Left).expect("west");

        let right = InputSnapshot::holding(Direction::Right);
        seeker.update_movement(&graph, &right, 16);
        seeker.update_movement(&graph, &right, 16);
        assert_eq!(seeker.agent.next, east);

        seeker.update_movement(&graph, &InputSnapshot::holding(Direction::Left), 16);
        assert_eq!(seeker.agent.facing, Direction::Left);
        assert_eq!(seeker.agent.previous, spawn);
        assert_eq!(seeker.agent.next, west);
    }

    #[test]
    fn stops_when_facing_a_wall() {
        let graph = TileGraph::build(&["#####", "#.5##", "#####"]).expect("board");
        let mut seeker = make_seeker(&graph);
        seeker.agent.facing = Direction::Right;
        seeker.update_movement(&graph, &InputSnapshot::default(), 16);
        assert!(seeker.agent.is_at_node());
    }

    #[test]
    fn paused_or_dead_seeker_ignores_input() {
        let graph = TileGraph::build(&CROSS).expect("board");
        let mut seeker = make_seeker(&graph);
        seeker.die();
        seeker.update_movement(&graph, &InputSnapshot::holding(Direction::Left), 16);
        assert_eq!(seeker.agent.facing, Direction::Up);
        assert!(seeker.agent.is_at_node());
    }

    #[test]
    fn eating_slows_the_seeker() {
        let graph = TileGraph::build(&CROSS).expect("board");
        let mut seeker = make_seeker(&graph);
        let stats = Stats::new(0);
        seeker.update_speed(&graph, stats.speeds(), false);
        let plain = seeker.agent.speed;

        seeker.agent.current = graph.tile_at(2, 3).expect("pellet tile");
        seeker.update_speed(&graph, stats.speeds(), false);
        assert!(seeker.agent.speed < plain);

        seeker.update_speed(&graph, stats.speeds(), true);
        assert!((seeker.agent.speed - BASE_SPEED * stats.speeds().seeker_frightened_eating).abs() < 1e-6);
    }

    #[test]
    fn death_animation_marks_sprite() {
        let graph = TileGraph::build(&CROSS).expect("board");
        let mut seeker = make_seeker(&graph);
        seeker.die();
        seeker.play_death_animation();
        seeker.update_animation(SEEKER_DEATH_FRAME_MS);
        let view = seeker.view(&graph);
        assert_eq!(view.sprite, SpriteState::SeekerDying);
        assert_eq!(view.frame, 1);
        assert!(!view.alive);
    }
}
