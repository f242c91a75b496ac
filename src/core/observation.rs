//! Observation and action records exchanged with the networks.
//!
//! Both records are plain bundles of tensors in batch-leading layout. They
//! are created fresh for every forward call; the networks never retain them.
//!
//! Shape errors (wrong channel count, mismatched grid resolution, mismatched
//! batch sizes) are surfaced by the tensor backend at the first operation
//! that consumes the offending tensor.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// One batch of structured observations.
#[derive(Debug, Clone)]
pub struct Observation<B: Backend> {
    /// Minimap feature grid: `[batch, minimap_channels, grid, grid]`.
    pub minimap: Tensor<B, 4>,
    /// Screen feature grid: `[batch, screen_channels, grid, grid]`.
    pub screen: Tensor<B, 4>,
    /// Non-spatial feature vector: `[batch, num_actions]`.
    pub nonspatial: Tensor<B, 2>,
}

impl<B: Backend> Observation<B> {
    /// Bundle the three observation modalities.
    pub fn new(minimap: Tensor<B, 4>, screen: Tensor<B, 4>, nonspatial: Tensor<B, 2>) -> Self {
        Self {
            minimap,
            screen,
            nonspatial,
        }
    }

    /// Batch size, taken from the minimap tensor.
    pub fn batch_size(&self) -> usize {
        self.minimap.dims()[0]
    }

    /// Grid side lengths `(height, width)` of the spatial observations.
    pub fn grid_dims(&self) -> (usize, usize) {
        let [_, _, h, w] = self.minimap.dims();
        (h, w)
    }
}

/// One batch of actions, as consumed by the critic.
///
/// The categorical component is a one-hot (or probability) vector over the
/// discrete action space; the two screen components are single-channel
/// spatial maps matching the observation grid.
#[derive(Debug, Clone)]
pub struct Action<B: Backend> {
    /// Categorical action vector: `[batch, num_actions]`.
    pub categorical: Tensor<B, 2>,
    /// First screen coordinate map: `[batch, 1, grid, grid]`.
    pub screen1: Tensor<B, 4>,
    /// Second screen coordinate map: `[batch, 1, grid, grid]`.
    pub screen2: Tensor<B, 4>,
}

impl<B: Backend> Action<B> {
    /// Bundle the three action components.
    pub fn new(categorical: Tensor<B, 2>, screen1: Tensor<B, 4>, screen2: Tensor<B, 4>) -> Self {
        Self {
            categorical,
            screen1,
            screen2,
        }
    }

    /// Batch size, taken from the categorical tensor.
    pub fn batch_size(&self) -> usize {
        self.categorical.dims()[0]
    }
}
