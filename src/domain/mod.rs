pub mod actor;
pub mod ball;
pub mod coily;
pub mod cube;
pub mod disc;
pub mod grid;
pub mod player;
