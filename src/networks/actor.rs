//! Policy network over the structured observation space.
//!
//! The actor encodes the three observation modalities independently, fuses
//! them by channel concatenation and a joint convolution, and decodes the
//! fused state into:
//!
//! - a categorical distribution over the discrete action space, masked by
//!   per-example action validity;
//! - two raw spatial logit maps for the two screen-coordinate action
//!   parameters.
//!
//! The spatial maps are raw logits, not distributions: which of them is
//! consumed, and how, depends on the sampled categorical action.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Initializer, Linear, LinearConfig, PaddingConfig2d};
use burn::tensor::activation::{relu, softmax};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::core::observation::Observation;
use crate::core::spaces::SpaceConfig;
use crate::networks::masking::{mask_valid_actions, MaskError};
use crate::nn::dense_to_spatial::{DenseToSpatial, DenseToSpatialConfig};
use crate::nn::spatial_encoder::{SpatialEncoder, SpatialEncoderConfig, ENCODED_CHANNELS};

/// Channel width of the fused state representation.
const FUSED_CHANNELS: usize = 64;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for [`Actor`].
#[derive(Debug, Clone)]
pub struct ActorConfig {
    /// Observation and action space description.
    pub spaces: SpaceConfig,
    /// Weight initialization scheme, applied uniformly to every submodule.
    pub initializer: Initializer,
}

impl ActorConfig {
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

    /// Initialize an actor with fresh, independently initialized weights.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Actor<B> {
        let spaces = &self.spaces;
        Actor {
            minimap_encoder: SpatialEncoderConfig::new(spaces.minimap_channels)
                .with_initializer(self.initializer.clone())
                .init(device),
            screen_encoder: SpatialEncoderConfig::new(spaces.screen_channels)
                .with_initializer(self.initializer.clone())
                .init(device),
            nonspatial_encoder: DenseToSpatialConfig::new(spaces.num_actions, spaces.grid_size)
                .with_initializer(self.initializer.clone())
                .init(device),
            fusion: Conv2dConfig::new([3 * ENCODED_CHANNELS, FUSED_CHANNELS], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .with_initializer(self.initializer.clone())
                .init(device),
            categorical_conv: Conv2dConfig::new([FUSED_CHANNELS, 1], [1, 1])
                .with_initializer(self.initializer.clone())
                .init(device),
            categorical_fc: LinearConfig::new(spaces.grid_cells(), spaces.num_actions)
                .with_initializer(self.initializer.clone())
                .init(device),
            screen1_head: Conv2dConfig::new([FUSED_CHANNELS, 1], [1, 1])
                .with_initializer(self.initializer.clone())
                .init(device),
            screen2_head: Conv2dConfig::new([FUSED_CHANNELS, 1], [1, 1])
                .with_initializer(self.initializer.clone())
                .init(device),
        }
    }
}

// ============================================================================
// Actor
// ============================================================================

/// Policy network: observation and validity mask in, masked categorical
/// distribution and two spatial logit maps out.
#[derive(Module, Debug)]
pub struct Actor<B: Backend> {
    /// Minimap observation encoder.
    minimap_encoder: SpatialEncoder<B>,
    /// Screen observation encoder.
    screen_encoder: SpatialEncoder<B>,
    /// Non-spatial observation encoder.
    nonspatial_encoder: DenseToSpatial<B>,
    /// Joint convolution over the concatenated encodings.
    fusion: Conv2d<B>,
    /// Categorical head: collapse the fused state to one channel.
    categorical_conv: Conv2d<B>,
    /// Categorical head: flattened grid to action logits.
    categorical_fc: Linear<B>,
    /// First screen-coordinate head.
    screen1_head: Conv2d<B>,
    /// Second screen-coordinate head.
    screen2_head: Conv2d<B>,
}

impl<B: Backend> Actor<B> {
    /// Forward pass.
    ///
    /// Encodes the observation modalities, fuses them in the fixed order
    /// (minimap, screen, nonspatial), and decodes the policy outputs.
    ///
    /// # Arguments
    /// * `obs` - Observation batch; grid dims must match the configured size
    /// * `valid_actions` - 0/1 mask `[batch, num_actions]`
    ///
    /// # Returns
    /// [`ActorOutput`] with the masked categorical distribution and the two
    /// raw spatial logit maps `[batch, 1, grid, grid]`.
    ///
    /// # Errors
    /// [`MaskError::AllActionsMasked`] if any example's mask has no nonzero
    /// entry. Shape mismatches panic in the tensor backend.
    pub fn forward(
        &self,
        obs: &Observation<B>,
        valid_actions: Tensor<B, 2>,
    ) -> Result<ActorOutput<B>, MaskError> {
        let m = self.minimap_encoder.forward(obs.minimap.clone());
        let s = self.screen_encoder.forward(obs.screen.clone());
        let n = self.nonspatial_encoder.forward(obs.nonspatial.clone());

        let state = relu(self.fusion.forward(Tensor::cat(vec![m, s, n], 1)));

        let x = relu(self.categorical_conv.forward(state.clone()));
        let logits = self.categorical_fc.forward(x.flatten::<2>(1, 3));
        let categorical = mask_valid_actions(softmax(logits, 1), valid_actions)?;

        let screen1 = self.screen1_head.forward(state.clone());
        let screen2 = self.screen2_head.forward(state);

        Ok(ActorOutput {
            categorical,
            screen1,
            screen2,
        })
    }
}

// ============================================================================
// Actor output
// ============================================================================

/// Output of one actor forward pass.
#[derive(Debug, Clone)]
pub struct ActorOutput<B: Backend> {
    /// Masked categorical distribution `[batch, num_actions]`: illegal
    /// actions have probability exactly 0, legal ones sum to 1 per example.
    pub categorical: Tensor<B, 2>,
    /// Raw logit map for the first screen coordinate `[batch, 1, grid, grid]`.
    pub screen1: Tensor<B, 4>,
    /// Raw logit map for the second screen coordinate `[batch, 1, grid, grid]`.
    pub screen2: Tensor<B, 4>,
}

impl<B: Backend> ActorOutput<B> {
    /// Batch size.
    pub fn batch_size(&self) -> usize {
        self.categorical.dims()[0]
    }

    /// Number of discrete actions.
    pub fn num_actions(&self) -> usize {
        self.categorical.dims()[1]
    }

    /// Sample one categorical action per example.
    ///
    /// Returns `(actions, log_probs)`. Sampling draws from the masked
    /// distribution, so an illegal action (probability 0) is never returned.
    pub fn sample_categorical(&self) -> (Vec<u32>, Vec<f32>) {
        let data = self.categorical.clone().into_data();
        let probs: &[f32] = data.as_slice().expect("probs should be f32");
        let n_actions = self.num_actions();

        let mut actions = Vec::with_capacity(self.batch_size());
        let mut log_probs = Vec::with_capacity(self.batch_size());
        for row in probs.chunks(n_actions) {
            let selected = sample_index(row);
            actions.push(selected as u32);
            log_probs.push((row[selected] + 1e-8).ln());
        }
        (actions, log_probs)
    }

    /// Sample a `(row, col)` grid coordinate per example from the first
    /// spatial map, via softmax over its cells.
    pub fn sample_screen1(&self) -> Vec<(usize, usize)> {
        sample_spatial(&self.screen1)
    }

    /// Sample a `(row, col)` grid coordinate per example from the second
    /// spatial map, via softmax over its cells.
    pub fn sample_screen2(&self) -> Vec<(usize, usize)> {
        sample_spatial(&self.screen2)
    }

    /// Entropy of the masked categorical distribution, per example.
    pub fn entropy(&self) -> Tensor<B, 1> {
        let probs = self.categorical.clone();
        let log_probs = (probs.clone() + 1e-8).log();
        let neg_entropy: Tensor<B, 2> = (probs * log_probs).sum_dim(1);
        -neg_entropy.flatten::<1>(0, 1)
    }
}

/// Draw an index from one row of probabilities via cumulative sum.
///
/// Falls back to the last index with positive mass when floating-point drift
/// leaves the draw above the final cumulative value.
fn sample_index(probs: &[f32]) -> usize {
    let draw = fastrand::f32();
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (index, p) in probs.iter().enumerate() {
        if *p > 0.0 {
            last_positive = index;
        }
        cumulative += p;
        if draw < cumulative {
            return index;
        }
    }
    last_positive
}

/// Sample a grid coordinate per example from a spatial logit map.
fn sample_spatial<B: Backend>(map: &Tensor<B, 4>) -> Vec<(usize, usize)> {
    let [batch, _, _, width] = map.dims();
    let probs = softmax(map.clone().flatten::<2>(1, 3), 1);
    let data = probs.into_data();
    let slice: &[f32] = data.as_slice().expect("probs should be f32");
    let cells = slice.len() / batch;

    slice
        .chunks(cells)
        .map(|row| {
            let cell = sample_index(row);
            (cell / width, cell % width)
        })
        .collect()
}
