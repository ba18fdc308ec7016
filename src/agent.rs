use crate::board::{TileGraph, TileId};
use crate::constants::{ANIM_FRAME_COUNT, ARRIVAL_FRACTION, MIDPOINT_FRACTION};
use crate::types::{Direction, MovementState, WorldPos};

#[derive(Clone, Debug)]
pub struct Animation {
    pub frame: u8,
    pub frame_ms: u32,
    pub looping: bool,
    clock_ms: u32,
}

impl Animation {
    pub fn new(frame_ms: u32) -> Self {
        Self {
            frame: 0,
            frame_ms,
            looping: true,
            clock_ms: 0,
        }
    }

    pub fn restart(&mut self, frame_ms: u32, looping: bool) {
        self.frame = 0;
        self.frame_ms = frame_ms;
        self.looping = looping;
        self.clock_ms = 0;
    }

    pub fn advance(&mut self, ms: u32) {
        if self.frame_ms == 0 {
            return;
        }
        self.clock_ms += ms;
        while self.clock_ms >= self.frame_ms {
            self.clock_ms -= self.frame_ms;
            if self.frame + 1 < ANIM_FRAME_COUNT {
                self.frame += 1;
            } else if self.looping {
                self.frame = 0;
            }
        }
    }

    pub fn finished(&self) -> bool {
        !self.looping && self.frame + 1 >= ANIM_FRAME_COUNT
    }
}

/// Movement state shared by the seeker and the hunters.
#[derive(Clone, Debug)]
pub struct Agent {
    pub spawn: TileId,
    pub current: TileId,
    pub previous: TileId,
    pub next: TileId,
    pub movement: MovementState,
    pub facing: Direction,
    pub position: WorldPos,
    pub speed: f32,
    pub alive: bool,
    pub paused: bool,
    pub visible: bool,
    pub anim: Animation,
    did_teleport: bool,
}

impl Agent {
    pub fn new(graph: &TileGraph, spawn: TileId, facing: Direction, frame_ms: u32) -> Self {
        Self {
            spawn,
            current: spawn,
            previous: spawn,
            next: spawn,
            movement: MovementState::AtNode,
            facing,
            position: graph.position(spawn),
            speed: 0.0,
            alive: true,
            paused: true,
            visible: false,
            anim: Animation::new(frame_ms),
            did_teleport: false,
        }
    }

    /// Back to the spawn tile: paused, hidden, alive, stationary.
    pub fn reset(&mut self, graph: &TileGraph, facing: Direction, frame_ms: u32) {
        *self = Self::new(graph, self.spawn, facing, frame_ms);
    }

    pub fn is_at_node(&self) -> bool {
        self.movement == MovementState::AtNode
    }

    /// Linear share of the previous->next segment already covered.
    pub fn travel_fraction(&self, graph: &TileGraph) -> f32 {
        let from = graph.position(self.previous);
        let span = from.square_distance(graph.position(self.next)).sqrt();
        if span <= f32::EPSILON {
            return 1.0;
        }
        from.square_distance(self.position).sqrt() / span
    }

    pub fn snap_to_current(&mut self, graph: &TileGraph) {
        self.position = graph.position(self.current);
        self.previous = self.current;
        self.next = self.current;
        self.movement = MovementState::AtNode;
    }

    /// Leaves the current node towards `target`, the neighbor in `dir`.
    pub fn depart(&mut self, graph: &TileGraph, dir: Direction, target: TileId) {
        self.facing = dir;
        if graph.tile(self.current).is_teleport()
            && graph.tile(target).is_teleport()
            && target != self.current
        {
            self.jump_through(graph, target);
            return;
        }
        self.previous = self.current;
        self.next = target;
        self.movement = MovementState::Traveling;
    }

    fn jump_through(&mut self, graph: &TileGraph, partner: TileId) {
        self.current = partner;
        self.previous = partner;
        self.position = graph.position(partner);
        self.did_teleport = true;
        match graph.neighbor(partner, self.facing) {
            Some(beyond) => {
                self.next = beyond;
                self.movement = MovementState::Traveling;
            }
            None => {
                self.next = partner;
                self.movement = MovementState::AtNode;
            }
        }
    }

    /// One frame of interpolation while TRAVELING.
    pub fn travel(&mut self, graph: &TileGraph, ms: u32) {
        if self.movement != MovementState::Traveling {
            return;
        }

        let fraction = self.travel_fraction(graph);
        if fraction >= ARRIVAL_FRACTION {
            self.current = self.next;
            self.position = graph.position(self.current);
            if graph.tile(self.current).is_teleport() && !self.did_teleport {
                if let Some(partner) = graph.neighbor(self.current, self.facing) {
                    if graph.tile(partner).is_teleport() {
                        self.jump_through(graph, partner);
                        return;
                    }
                }
            }
            self.did_teleport = false;
            self.snap_to_current(graph);
            return;
        }

        if fraction >= MIDPOINT_FRACTION {
            self.current = self.next;
        }
        let (dx, dy) = self.facing.unit();
        let step = self.speed * ms as f32;
        self.position.x += dx * step;
        self.position.y += dy * step;
    }
}
