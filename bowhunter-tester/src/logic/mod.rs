pub mod game_tester;
pub mod player;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use tester::*;
