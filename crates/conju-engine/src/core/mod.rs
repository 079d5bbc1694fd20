pub mod puzzle;
pub mod queue;
pub mod rng;
pub mod tense;
pub mod time;
