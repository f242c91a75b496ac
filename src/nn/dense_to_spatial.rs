//! Dense projection broadcast to a spatial tile.
//!
//! Non-spatial features (the action-space-sized observation vector, or the
//! categorical action vector on the critic path) are fused with convolutional
//! feature maps by channel concatenation. That requires lifting a `[batch, C]`
//! vector into a `[batch, C, H, W]` tensor whose value at every grid cell is
//! the same C-vector. [`broadcast_to_grid`] is that lift as a standalone op;
//! [`DenseToSpatial`] composes it with a dense layer and ReLU to form the
//! complete non-spatial encoder.

use burn::module::Module;
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::spatial_encoder::ENCODED_CHANNELS;

/// Replicate a per-example vector across every cell of an `height x width`
/// grid.
///
/// # Arguments
/// * `input` - Tensor of shape `[batch, channels]`
///
/// # Returns
/// Tensor of shape `[batch, channels, height, width]` where
/// `out[b, c, i, j] == input[b, c]` for every `(i, j)`.
pub fn broadcast_to_grid<B: Backend>(
    input: Tensor<B, 2>,
    height: usize,
    width: usize,
) -> Tensor<B, 4> {
    let input: Tensor<B, 3> = input.unsqueeze_dim(2);
    let input: Tensor<B, 4> = input.unsqueeze_dim(3);
    input.repeat_dim(2, height).repeat_dim(3, width)
}

/// Configuration for [`DenseToSpatial`].
#[derive(Debug, Clone)]
pub struct DenseToSpatialConfig {
    /// Length of the input vector.
    pub d_input: usize,
    /// Side length of the target grid.
    pub grid_size: usize,
    /// Weight initialization scheme for the dense layer.
    pub initializer: Initializer,
}

impl DenseToSpatialConfig {
    /// Create a configuration projecting `d_input` features onto a
    /// `grid_size x grid_size` grid.
    pub fn new(d_input: usize, grid_size: usize) -> Self {
        Self {
            d_input,
            grid_size,
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

    /// Initialize a fresh encoder with its own weights.
    pub fn init<B: Backend>(&self, device: &B::Device) -> DenseToSpatial<B> {
        DenseToSpatial {
            fc: LinearConfig::new(self.d_input, ENCODED_CHANNELS)
                .with_initializer(self.initializer.clone())
                .init(device),
            grid_size: self.grid_size,
        }
    }
}

/// Non-spatial encoder: dense layer, ReLU, broadcast to the grid.
#[derive(Module, Debug)]
pub struct DenseToSpatial<B: Backend> {
    /// Dense projection to [`ENCODED_CHANNELS`] units.
    fc: Linear<B>,
    /// Side length of the output grid.
    grid_size: usize,
}

impl<B: Backend> DenseToSpatial<B> {
    /// Encode a non-spatial vector.
    ///
    /// # Arguments
    /// * `input` - Tensor of shape `[batch, d_input]`
    ///
    /// # Returns
    /// Tensor of shape `[batch, 32, grid_size, grid_size]`.
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 4> {
        let x = relu(self.fc.forward(input));
        broadcast_to_grid(x, self.grid_size, self.grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_broadcast_tiles_exactly() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0], [3.0, 4.0]], &device);

        let tiled = broadcast_to_grid(input, 2, 3);
        assert_eq!(tiled.dims(), [2, 2, 2, 3]);

        let data = tiled.into_data();
        let slice: &[f32] = data.as_slice().unwrap();
        // Every cell of channel c in example b holds input[b, c].
        for (b, expected) in [[1.0f32, 2.0], [3.0, 4.0]].iter().enumerate() {
            for c in 0..2 {
                for cell in 0..6 {
                    assert_eq!(slice[b * 12 + c * 6 + cell], expected[c]);
                }
            }
        }
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let encoder: DenseToSpatial<TestBackend> = DenseToSpatialConfig::new(100, 16).init(&device);

        let input = Tensor::zeros([4, 100], &device);
        let output = encoder.forward(input);
        assert_eq!(output.dims(), [4, ENCODED_CHANNELS, 16, 16]);
    }

    #[test]
    fn test_forward_is_uniform_over_cells() {
        let device = Default::default();
        let encoder: DenseToSpatial<TestBackend> = DenseToSpatialConfig::new(8, 4).init(&device);

        let input = Tensor::random(
            [1, 8],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let output = encoder.forward(input);

        let data = output.into_data();
        let slice: &[f32] = data.as_slice().unwrap();
        for c in 0..ENCODED_CHANNELS {
            let first = slice[c * 16];
            for cell in 1..16 {
                assert_eq!(slice[c * 16 + cell], first);
            }
        }
    }
}
