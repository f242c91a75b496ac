//! # Spatial Actor-Critic: Networks for Grid-Based RL
//!
//! Actor and critic networks for an agent observing a multi-channel minimap
//! grid, a multi-channel screen grid and a non-spatial feature vector, and
//! acting through a masked categorical action plus two screen coordinates.
//!
//! ## Architecture Overview
//!
//! ```text
//!               minimap [B,7,H,W]   screen [B,17,H,W]   nonspatial [B,A]
//!                    │                   │                   │
//!              SpatialEncoder      SpatialEncoder      DenseToSpatial
//!                    │                   │                   │
//!                    └───────── concat (channel axis) ───────┘
//!                                       │
//!                             fusion conv 3x3 → 64ch
//!                         ┌─────────────┼─────────────┐
//!                   categorical     screen1 1x1    screen2 1x1
//!                  head + masking    conv → map     conv → map
//! ```
//!
//! The critic fuses the same three observation encodings with two action
//! encodings (spatial maps through a conv stack, categorical vector through a
//! dense broadcast) and reduces the result to one scalar value per example.
//!
//! Every encoder instance owns its own weights: the two networks are
//! structurally parallel but never share parameters.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spatial_actor_critic::{Actor, ActorConfig, SpaceConfig};
//!
//! let spaces = SpaceConfig::new(541).with_grid_size(32);
//! let actor: Actor<B> = ActorConfig::new(spaces).init(&device);
//!
//! let output = actor.forward(&observation, valid_action_mask)?;
//! let (actions, log_probs) = output.sample_categorical();
//! ```

pub mod core;
pub mod networks;
pub mod nn;

pub use crate::core::observation::{Action, Observation};
pub use crate::core::spaces::SpaceConfig;

pub use crate::nn::dense_to_spatial::{broadcast_to_grid, DenseToSpatial, DenseToSpatialConfig};
pub use crate::nn::spatial_encoder::{SpatialEncoder, SpatialEncoderConfig};

pub use crate::networks::actor::{Actor, ActorConfig, ActorOutput};
pub use crate::networks::critic::{Critic, CriticConfig};
pub use crate::networks::masking::{mask_valid_actions, MaskError};
