use crate::board::{ResolvedAnchors, TileGraph, TileId};
use crate::events::Dispatcher;
use crate::hunter::{ChaseView, Hunter};
use crate::phase::{PhaseCycle, PhaseStep};
use crate::rng::Rng;
use crate::seeker::Seeker;
use crate::stats::SpeedProfile;
use crate::types::{
    GameEvent, HunterKind, InputSnapshot, PhaseMode, SoundCue, SpecialModeStage, TargetingState,
};

/// Owns every agent and drives them through one frame in a fixed order.
#[derive(Clone, Debug)]
pub struct Roster {
    pub seeker: Seeker,
    hunters: Vec<Hunter>,
    phase: PhaseCycle,
    rng: Rng,
    paused: bool,
}

impl Roster {
    pub fn new(graph: &TileGraph, anchors: &ResolvedAnchors, rng: Rng) -> Self {
        let hunters = HunterKind::ALL
            .into_iter()
            .map(|kind| {
                Hunter::new(
                    graph,
                    kind,
                    anchors.hunter_spawn(kind),
                    anchors.corner(kind),
                    anchors.home_area,
                )
            })
            .collect();
        Self {
            seeker: Seeker::new(graph, anchors.seeker_spawn),
            hunters,
            phase: PhaseCycle::new(1),
            rng,
            paused: true,
        }
    }

    /// Start of a level: every agent back to spawn and the phase cycle restarted.
    pub fn reset(&mut self, graph: &TileGraph, level: u32) {
        self.paused = true;
        self.phase.reset(level);
        self.seeker.reset(graph);
        for hunter in &mut self.hunters {
            hunter.reset(graph);
        }
    }

    /// Same level after a seeker death; the phase cycle keeps its place.
    pub fn reset_from_death(&mut self, graph: &TileGraph) {
        self.paused = true;
        self.seeker.reset(graph);
        for hunter in &mut self.hunters {
            hunter.reset_from_death(graph);
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.seeker.agent.paused = true;
        for hunter in &mut self.hunters {
            hunter.agent.paused = true;
        }
    }

    pub fn unpause(&mut self) {
        self.paused = false;
        self.seeker.agent.paused = false;
        for hunter in &mut self.hunters {
            hunter.agent.paused = false;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn show_agents(&mut self) {
        self.seeker.agent.visible = true;
        for hunter in &mut self.hunters {
            hunter.agent.visible = true;
        }
    }

    pub fn hide_hunters(&mut self) {
        for hunter in &mut self.hunters {
            hunter.agent.visible = false;
        }
    }

    pub fn hunters(&self) -> &[Hunter] {
        &self.hunters
    }

    pub fn hunter(&self, kind: HunterKind) -> &Hunter {
        &self.hunters[kind.index()]
    }

    pub fn hunter_mut(&mut self, kind: HunterKind) -> &mut Hunter {
        &mut self.hunters[kind.index()]
    }

    pub fn phase_step(&self) -> PhaseStep {
        self.phase.step()
    }

    pub fn spawn(&mut self, kind: HunterKind) {
        self.hunter_mut(kind).spawn();
    }

    pub fn frighten(&mut self, duration_ms: u32) {
        for hunter in &mut self.hunters {
            hunter.frighten(duration_ms);
        }
    }

    pub fn any_frightened(&self) -> bool {
        self.hunters.iter().any(Hunter::is_frightened)
    }

    /// True once no hunter waits inside the home.
    pub fn all_hunters_spawned(&self) -> bool {
        self.hunters.iter().all(|hunter| !hunter.in_home())
    }

    pub fn special_mode(&self) -> SpecialModeStage {
        self.hunter(HunterKind::Direct).special_mode()
    }

    /// Steps the direct hunter's special mode, which only happens once every hunter is out.
    pub fn advance_special_mode(&mut self) -> bool {
        if !self.all_hunters_spawned() {
            return false;
        }
        self.hunters
            .iter_mut()
            .fold(false, |advanced, hunter| hunter.try_advance_special_mode() || advanced)
    }

    pub fn play_seeker_death(&mut self) {
        self.seeker.play_death_animation();
    }

    /// The seeker's tile while it rests on a node.
    pub fn seeker_node(&self) -> Option<TileId> {
        self.seeker
            .agent
            .is_at_node()
            .then(|| self.seeker.current_tile())
    }

    pub fn update(
        &mut self,
        graph: &TileGraph,
        input: &InputSnapshot,
        speeds: &SpeedProfile,
        ms: u32,
        out: &mut Dispatcher,
    ) {
        self.update_timers(ms);
        self.update_movement(graph, input, ms);
        self.update_animation(ms);
        self.update_speed(graph, speeds);
        self.update_collisions(out);
    }

    /// The phase clock holds while any hunter is frightened, whatever the
    /// others are doing, including retreating or waiting at home.
    fn update_timers(&mut self, ms: u32) {
        for hunter in &mut self.hunters {
            hunter.update_timers(ms);
        }
        if self.paused || self.any_frightened() {
            return;
        }
        if let Some((_, mode)) = self.phase.advance(ms) {
            self.toggle_phase(mode);
        }
    }

    fn toggle_phase(&mut self, mode: PhaseMode) {
        for hunter in &mut self.hunters {
            hunter.flag_reverse();
            hunter.set_phase(mode);
        }
    }

    fn update_movement(&mut self, graph: &TileGraph, input: &InputSnapshot, ms: u32) {
        self.seeker.update_movement(graph, input, ms);
        let view = ChaseView {
            seeker_tile: self.seeker.current_tile(),
            seeker_facing: self.seeker.agent.facing,
            direct_tile: self.hunter(HunterKind::Direct).agent.current,
        };
        for hunter in &mut self.hunters {
            hunter.update_movement(graph, &view, &mut self.rng, ms);
        }
    }

    fn update_animation(&mut self, ms: u32) {
        self.seeker.update_animation(ms);
        for hunter in &mut self.hunters {
            hunter.update_animation(ms);
        }
    }

    fn update_speed(&mut self, graph: &TileGraph, speeds: &SpeedProfile) {
        let frightened = self.any_frightened();
        self.seeker.update_speed(graph, speeds, frightened);
        for hunter in &mut self.hunters {
            hunter.update_speed(graph, speeds);
        }
    }

    fn update_collisions(&mut self, out: &mut Dispatcher) {
        let seeker_tile = self.seeker.current_tile();
        for index in 0..self.hunters.len() {
            if self.hunters[index].agent.current != seeker_tile {
                continue;
            }
            match self.hunters[index].targeting() {
                TargetingState::Frightened => {
                    out.post(GameEvent::HunterEliminated);
                    out.sound(SoundCue::HunterDeath);
                    self.pause();
                    let hunter = &mut self.hunters[index];
                    hunter.eliminate();
                    hunter.agent.paused = false;
                }
                TargetingState::Retreating => {}
                TargetingState::Chasing | TargetingState::Scattering => {
                    if self.seeker.agent.alive {
                        out.post(GameEvent::LevelLose);
                        self.seeker.die();
                    }
                }
            }
        }
    }
}
