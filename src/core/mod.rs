//! Core types for the actor and critic networks.

pub mod observation;
pub mod spaces;

pub use observation::{Action, Observation};
pub use spaces::SpaceConfig;
