//! The two composed networks and their shared masking primitive.
//!
//! - [`actor`]: policy network producing a masked categorical distribution
//!   and two spatial logit maps
//! - [`critic`]: value network scoring an observation/action pair
//! - [`masking`]: the mask-and-renormalize step applied to the actor's
//!   categorical output
//!
//! Both networks are pure functions of their inputs once constructed; they
//! share architecture but never parameters.

pub mod actor;
pub mod critic;
pub mod masking;


pub use actor::{Actor, ActorConfig, ActorOutput};
pub use critic::{Critic, CriticConfig};
pub use masking::{mask_valid_actions, MaskError};
