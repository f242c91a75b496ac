//! Value network over observation/action pairs.
//!
//! The critic encodes the three observation modalities and the two action
//! modalities independently, fuses all five encodings by channel
//! concatenation, and reduces the fused state to one scalar value per
//! example. No validity masking is applied on this path.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Initializer, Linear, LinearConfig, PaddingConfig2d};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::core::observation::{Action, Observation};
use crate::core::spaces::SpaceConfig;
use crate::nn::dense_to_spatial::{DenseToSpatial, DenseToSpatialConfig};
use crate::nn::spatial_encoder::{SpatialEncoder, SpatialEncoderConfig, ENCODED_CHANNELS};

/// Channel width of the fused state representation.
const FUSED_CHANNELS: usize = 64;

/// Channels of the stacked spatial action input (screen1 and screen2 maps).
const ACTION_MAP_CHANNELS: usize = 2;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for [`Critic`].
#[derive(Debug, Clone)]
pub struct CriticConfig {
    /// Observation and action space description.
    pub spaces: SpaceConfig,
    /// Weight initialization scheme, applied uniformly to every submodule.
    pub initializer: Initializer,
}

impl CriticConfig {
    /// Create a configuration for the given spaces.
    pub fn new(spaces: SpaceConfig) -> Self {
        Self {
            spaces,
            initializer: Initializer::KaimingUniform {
                gain: 1.0,
                fan_out_only: false,
            },
        }
    }

    /// Set the weight initializer.
    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = initializer;
        self
    }

    /// Initialize a critic with fresh, independently initialized weights.
    ///
    /// The observation encoders are constructed here, not shared with any
    /// actor instance: the two networks are architecturally parallel but
    /// their parameters are disjoint.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Critic<B> {
        let spaces = &self.spaces;
        Critic {
            minimap_encoder: SpatialEncoderConfig::new(spaces.minimap_channels)
                .with_initializer(self.initializer.clone())
                .init(device),
            screen_encoder: SpatialEncoderConfig::new(spaces.screen_channels)
                .with_initializer(self.initializer.clone())
                .init(device),
            nonspatial_encoder: DenseToSpatialConfig::new(spaces.num_actions, spaces.grid_size)
                .with_initializer(self.initializer.clone())
                .init(device),
            action_spatial_encoder: SpatialEncoderConfig::new(ACTION_MAP_CHANNELS)
                .with_initializer(self.initializer.clone())
                .init(device),
            action_dense_encoder: DenseToSpatialConfig::new(spaces.num_actions, spaces.grid_size)
                .with_initializer(self.initializer.clone())
                .init(device),
            fusion: Conv2dConfig::new([5 * ENCODED_CHANNELS, FUSED_CHANNELS], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .with_initializer(self.initializer.clone())
                .init(device),
            reduce: Conv2dConfig::new([FUSED_CHANNELS, 1], [1, 1])
                .with_initializer(self.initializer.clone())
                .init(device),
            value: LinearConfig::new(spaces.grid_cells(), 1)
                .with_initializer(self.initializer.clone())
                .init(device),
        }
    }
}

// ============================================================================
// Critic
// ============================================================================

/// Value network: observation and action in, scalar value estimate out.
#[derive(Module, Debug)]
pub struct Critic<B: Backend> {
    /// Minimap observation encoder.
    minimap_encoder: SpatialEncoder<B>,
    /// Screen observation encoder.
    screen_encoder: SpatialEncoder<B>,
    /// Non-spatial observation encoder.
    nonspatial_encoder: DenseToSpatial<B>,
    /// Encoder for the stacked screen-coordinate action maps.
    action_spatial_encoder: SpatialEncoder<B>,
    /// Encoder for the categorical action vector.
    action_dense_encoder: DenseToSpatial<B>,
    /// Joint convolution over the five concatenated encodings.
    fusion: Conv2d<B>,
    /// Collapse the fused state to one channel before flattening.
    reduce: Conv2d<B>,
    /// Flattened grid to scalar value.
    value: Linear<B>,
}

impl<B: Backend> Critic<B> {
    /// Forward pass.
    ///
    /// Encodes the five modalities and fuses them in the fixed order
    /// (minimap, screen, nonspatial observation, spatial action, nonspatial
    /// action).
    ///
    /// # Arguments
    /// * `obs` - Observation batch
    /// * `action` - Action batch of the same batch size and grid dims
    ///
    /// # Returns
    /// Value estimates `[batch, 1]`.
    ///
    /// Shape mismatches panic in the tensor backend.
    pub fn forward(&self, obs: &Observation<B>, action: &Action<B>) -> Tensor<B, 2> {
        let m = self.minimap_encoder.forward(obs.minimap.clone());
        let s = self.screen_encoder.forward(obs.screen.clone());
        let n = self.nonspatial_encoder.forward(obs.nonspatial.clone());

        let action_maps = Tensor::cat(vec![action.screen1.clone(), action.screen2.clone()], 1);
        let a_spatial = self.action_spatial_encoder.forward(action_maps);
        let a_dense = self.action_dense_encoder.forward(action.categorical.clone());

        let fused = Tensor::cat(vec![m, s, n, a_spatial, a_dense], 1);
        let x = relu(self.fusion.forward(fused));
        let x = relu(self.reduce.forward(x));

        self.value.forward(x.flatten::<2>(1, 3))
    }
}
