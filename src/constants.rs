pub const FRAME_RATE: u32 = 60;
pub const FRAME_MS: u32 = 1000 / FRAME_RATE;

pub const BOARD_ROWS: usize = 36;
pub const BOARD_COLS: usize = 28;
pub const TILE_SIZE: f32 = 104.0;
pub const AGENT_EXTENT: f32 = 156.0;

pub const BASE_SPEED: f32 = 0.56;
pub const RETREAT_SPEED_MULTIPLIER: f32 = 1.5;
pub const SPECIAL_MODE_STAGE2_BOOST: f32 = 0.05;

pub const MIDPOINT_FRACTION: f32 = 0.5;
pub const ARRIVAL_FRACTION: f32 = 0.99;

/// Hunter D targets its own corner while closer than this to the seeker.
pub const SHY_RADIUS_SQUARED: f32 = AGENT_EXTENT * AGENT_EXTENT * 8.0;

pub const ANIM_FRAME_COUNT: u8 = 6;
pub const ANIM_FRAME_MS: u32 = 100;
pub const SEEKER_ANIM_FRAME_MS: u32 = 50;
pub const SEEKER_DEATH_FRAME_MS: u32 = 250;
pub const TILE_FLASH_MS: u32 = 250;

pub const PRE_LEVEL_MS: u32 = 4_000;
pub const PRE_LEVEL_HALF_MS: u32 = 2_000;
pub const PRE_LEVEL_RESTART_MS: u32 = 1_999;
pub const END_LEVEL_MS: u32 = 3_000;
pub const END_LEVEL_HALF_MS: u32 = 1_500;
pub const POST_KILL_PAUSE_MS: u32 = 750;
pub const BONUS_VISIBLE_MS: u32 = 10_000;

pub const STARTING_LIVES: u32 = 3;
pub const POINTS_PELLET: i32 = 10;
pub const POINTS_POWER_PELLET: i32 = 50;
pub const POINTS_ELIMINATION_CHAIN: [i32; 4] = [200, 400, 800, 1_600];
pub const POINTS_ELIMINATION_BONUS: i32 = 12_000;
pub const ELIMINATIONS_FOR_BONUS: u32 = 16;
pub const EXTRA_LIFE_THRESHOLDS: [i32; 2] = [10_000, 100_000];

pub const SPAWN_FRACTION_AB: f32 = 2.0;
pub const SPAWN_FRACTION_C: f32 = 0.87;
pub const SPAWN_FRACTION_D: f32 = 0.66;
pub const BONUS_FRACTION_FIRST: f32 = 0.71;
pub const BONUS_FRACTION_SECOND: f32 = 0.3;

pub const LEVEL_TABLE_LEN: usize = 21;

pub const FRIGHTENED_MS_BY_LEVEL: [u32; LEVEL_TABLE_LEN] = [
    6_000, 5_000, 4_000, 3_000, 2_000, 5_000, 2_000, 2_000, 1_000, 5_000, 2_000, 1_000, 1_000,
    3_000, 1_000, 1_000, 0, 1_000, 0, 0, 0,
];

pub const PHASE_MS_LEVEL_1: [u32; 7] = [7_000, 20_000, 7_000, 20_000, 5_000, 20_000, 5_000];
pub const PHASE_MS_LEVELS_2_TO_4: [u32; 7] =
    [7_000, 20_000, 7_000, 20_000, 5_000, 1_033_984, 16];
pub const PHASE_MS_LEVEL_5_UP: [u32; 7] = [7_000, 20_000, 5_000, 20_000, 5_000, 1_037_984, 16];

pub fn phase_durations_for_level(level: u32) -> &'static [u32; 7] {
    match level {
        0 | 1 => &PHASE_MS_LEVEL_1,
        2..=4 => &PHASE_MS_LEVELS_2_TO_4,
        _ => &PHASE_MS_LEVEL_5_UP,
    }
}

pub fn level_table_index(level: u32) -> usize {
    (level.max(1) as usize - 1).min(LEVEL_TABLE_LEN - 1)
}
