use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Fixed enumeration order used by every decision rule; earlier wins ties.
    pub const PRIORITY: [Direction; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    pub fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Left => 1,
            Self::Down => 2,
            Self::Right => 3,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Down => Self::Up,
            Self::Right => Self::Left,
        }
    }

    /// Unit step in world space, where up increases `y`.
    pub fn unit(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Down => (0.0, -1.0),
            Self::Right => (1.0, 0.0),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "left" => Some(Self::Left),
            "down" => Some(Self::Down),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraverseKind {
    Blocked,
    Open,
    HunterOnly,
    Intersection,
    NoUpIntersection,
    HomeExit,
    HomeEnter,
    Teleport,
    Tunnel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PelletKind {
    None,
    Small,
    Power,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub fn square_distance(self, other: WorldPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HunterKind {
    Direct,
    Ambush,
    Flank,
    Shy,
}

impl HunterKind {
    pub const ALL: [HunterKind; 4] = [Self::Direct, Self::Ambush, Self::Flank, Self::Shy];

    pub fn index(self) -> usize {
        match self {
            Self::Direct => 0,
            Self::Ambush => 1,
            Self::Flank => 2,
            Self::Shy => 3,
        }
    }

    pub fn spawn_event(self) -> GameEvent {
        match self {
            Self::Direct => GameEvent::SpawnHunterA,
            Self::Ambush => GameEvent::SpawnHunterB,
            Self::Flank => GameEvent::SpawnHunterC,
            Self::Shy => GameEvent::SpawnHunterD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementState {
    AtNode,
    Traveling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingState {
    Chasing,
    Scattering,
    Frightened,
    Retreating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseMode {
    Scatter,
    Chase,
}

impl PhaseMode {
    pub fn targeting(self) -> TargetingState {
        match self {
            Self::Scatter => TargetingState::Scattering,
            Self::Chase => TargetingState::Chasing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialModeStage {
    Off,
    Stage1,
    Stage2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Cherry,
    Strawberry,
    Peach,
    Apple,
    Grapes,
    Galaxian,
    Bell,
    Key,
}

impl BonusKind {
    pub fn for_level(level: u32) -> Self {
        match level {
            0 | 1 => Self::Cherry,
            2 => Self::Strawberry,
            3 | 4 => Self::Peach,
            5 | 6 => Self::Apple,
            7 | 8 => Self::Grapes,
            9 | 10 => Self::Galaxian,
            11 | 12 => Self::Bell,
            _ => Self::Key,
        }
    }

    pub fn points(self) -> i32 {
        match self {
            Self::Cherry => 100,
            Self::Strawberry => 300,
            Self::Peach => 500,
            Self::Apple => 700,
            Self::Grapes => 1_000,
            Self::Galaxian => 2_000,
            Self::Bell => 3_000,
            Self::Key => 5_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    InMenu,
    InGame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    Menu,
    Pregame1,
    Pregame2,
    Game,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    StartFromMenu,
    StartFromLevelWin,
    StartFromLevelLoss,
    LevelWin,
    LevelLose,
    GameOver,
    UiEnterPregame,
    UiEnterGame,
    Pause,
    Unpause,
    AgentsVisible,
    HuntersInvisible,
    SpawnHunterA,
    SpawnHunterB,
    SpawnHunterC,
    SpawnHunterD,
    FrightenHunters,
    AdvanceSpecialMode,
    HunterEliminated,
    ActivateBonus,
    PlaySeekerDeath,
    PlayTileFlash,
    ConsumeLife,
    PointsPellet,
    PointsPowerPellet,
    PointsEliminationBonus,
    PointsBonusItem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Start,
    ExtraLife,
    Pellet,
    BonusItem,
    SeekerDeath,
    HunterDeath,
}

/// Keys held (directions) or pressed (confirm) during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
    pub confirm: bool,
}

impl InputSnapshot {
    pub fn holding(dir: Direction) -> Self {
        let mut input = Self::default();
        match dir {
            Direction::Up => input.up = true,
            Direction::Left => input.left = true,
            Direction::Down => input.down = true,
            Direction::Right => input.right = true,
        }
        input
    }

    pub fn confirm() -> Self {
        Self {
            confirm: true,
            ..Self::default()
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Right => self.right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteState {
    Seeker,
    SeekerDying,
    Hunter,
    Frightened,
    FrightenedFlash,
    Eyes,
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentView {
    pub x: f32,
    pub y: f32,
    pub row: usize,
    pub col: usize,
    pub facing: Direction,
    pub movement: MovementState,
    pub sprite: SpriteState,
    pub frame: u8,
    pub visible: bool,
    pub alive: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct HunterView {
    pub kind: HunterKind,
    #[serde(flatten)]
    pub agent: AgentView,
    pub targeting: TargetingState,
    #[serde(rename = "inHome")]
    pub in_home: bool,
    #[serde(rename = "targetRow")]
    pub target_row: usize,
    #[serde(rename = "targetCol")]
    pub target_col: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct BonusView {
    pub kind: BonusKind,
    pub row: usize,
    pub col: usize,
    #[serde(rename = "remainingMs")]
    pub remaining_ms: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    #[serde(rename = "appState")]
    pub app_state: AppState,
    #[serde(rename = "uiState")]
    pub ui_state: UiState,
    pub level: u32,
    pub lives: u32,
    pub score: i32,
    #[serde(rename = "highScore")]
    pub high_score: i32,
    #[serde(rename = "remainingPellets")]
    pub remaining_pellets: u32,
    #[serde(rename = "totalPellets")]
    pub total_pellets: u32,
    pub phase: crate::phase::PhaseStep,
    #[serde(rename = "specialMode")]
    pub special_mode: SpecialModeStage,
    #[serde(rename = "tileFlash")]
    pub tile_flash: bool,
    pub seeker: AgentView,
    pub hunters: Vec<HunterView>,
    pub bonus: Option<BonusView>,
    #[serde(rename = "bonusCollected")]
    pub bonus_collected: Vec<BonusKind>,
}
