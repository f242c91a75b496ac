//! Network building blocks shared by the actor and critic.
//!
//! These modules cover the encoder patterns that burn's standard library has
//! no single layer for:
//!
//! - [`spatial_encoder`]: two-stage convolutional encoder for grid inputs
//! - [`dense_to_spatial`]: dense projection broadcast to a spatial tile
//!
//! Each config's `init` constructs a fresh, independently initialized
//! instance. Call sites that need the same architecture twice (minimap and
//! screen, actor and critic) call `init` twice and get disjoint parameters.

pub mod dense_to_spatial;
pub mod spatial_encoder;

pub use dense_to_spatial::{broadcast_to_grid, DenseToSpatial, DenseToSpatialConfig};
pub use spatial_encoder::{SpatialEncoder, SpatialEncoderConfig, ENCODED_CHANNELS};
