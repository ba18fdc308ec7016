pub mod agent;
pub mod board;
pub mod bonus;
pub mod bookkeeping;
pub mod constants;
pub mod engine;
pub mod events;
pub mod flow_timers;
pub mod high_score_store;
pub mod hunter;
pub mod phase;
pub mod rng;
pub mod roster;
pub mod seeker;
pub mod stats;
pub mod types;
