pub mod actor;
pub mod config;
pub mod constants;
pub mod dye;
pub mod energy;
pub mod engine;
pub mod executor;
pub mod geometry;
pub mod grid;
pub mod history;
pub mod ledger;
pub mod location;
pub mod outcome;
pub mod resolve;
pub mod resource;
pub mod search;
pub mod snapshot;
pub mod tool;
pub mod world;

pub use actor::*;
pub use config::PlacementConfig;
pub use engine::*;
pub use location::*;
pub use outcome::*;
pub use resource::*;
pub use world::*;
