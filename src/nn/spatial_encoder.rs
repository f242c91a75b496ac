//! Two-stage convolutional encoder for grid-shaped inputs.
//!
//! Transforms `[batch, in_channels, H, W]` into `[batch, 32, H, W]` through
//! a 5x5 and a 3x3 convolution, each followed by ReLU. Both stages use
//! stride 1 with "same" padding (`(kernel - 1) / 2`), so the spatial
//! dimensions are preserved. The fusion steps downstream concatenate
//! encoder outputs along the channel axis and rely on matching H and W.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Initializer, PaddingConfig2d};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Channel width of the intermediate convolution stage.
const HIDDEN_CHANNELS: usize = 16;

/// Channel width every encoder produces.
///
/// Fusion layers size their input as a multiple of this constant.
pub const ENCODED_CHANNELS: usize = 32;

/// Configuration for [`SpatialEncoder`].
#[derive(Debug, Clone)]
pub struct SpatialEncoderConfig {
    /// Number of input channels.
    pub in_channels: usize,
    /// Weight initialization scheme, applied uniformly to both stages.
    pub initializer: Initializer,
}

impl SpatialEncoderConfig {
    /// Create a configuration for `in_channels` input channels.
    pub fn new(in_channels: usize) -> Self {
        Self {
            in_channels,
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
    pub fn init<B: Backend>(&self, device: &B::Device) -> SpatialEncoder<B> {
        SpatialEncoder {
            conv1: Conv2dConfig::new([self.in_channels, HIDDEN_CHANNELS], [5, 5])
                .with_padding(PaddingConfig2d::Explicit(2, 2))
                .with_initializer(self.initializer.clone())
                .init(device),
            conv2: Conv2dConfig::new([HIDDEN_CHANNELS, ENCODED_CHANNELS], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .with_initializer(self.initializer.clone())
                .init(device),
        }
    }
}

/// Two-stage convolutional encoder with spatial-dimension-preserving padding.
#[derive(Module, Debug)]
pub struct SpatialEncoder<B: Backend> {
    /// 5x5 convolution expanding to the hidden channel width.
    conv1: Conv2d<B>,
    /// 3x3 convolution expanding to [`ENCODED_CHANNELS`].
    conv2: Conv2d<B>,
}

impl<B: Backend> SpatialEncoder<B> {
    /// Encode a grid input.
    ///
    /// # Arguments
    /// * `input` - Tensor of shape `[batch, in_channels, H, W]`
    ///
    /// # Returns
    /// Tensor of shape `[batch, 32, H, W]`, same H and W as the input.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = relu(self.conv1.forward(input));
        relu(self.conv2.forward(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_preserves_spatial_dims() {
        let device = Default::default();
        let encoder: SpatialEncoder<TestBackend> = SpatialEncoderConfig::new(7).init(&device);

        let input = Tensor::zeros([2, 7, 16, 16], &device);
        let output = encoder.forward(input);
        assert_eq!(output.dims(), [2, ENCODED_CHANNELS, 16, 16]);

        let input = Tensor::zeros([1, 7, 9, 9], &device);
        let output = encoder.forward(input);
        assert_eq!(output.dims(), [1, ENCODED_CHANNELS, 9, 9]);
    }

    #[test]
    fn test_output_is_rectified() {
        let device = Default::default();
        let encoder: SpatialEncoder<TestBackend> = SpatialEncoderConfig::new(3).init(&device);

        let input = Tensor::random(
            [2, 3, 8, 8],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let output = encoder.forward(input);

        let data = output.into_data();
        let slice: &[f32] = data.as_slice().unwrap();
        assert!(slice.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_instances_have_independent_weights() {
        let device = Default::default();
        let config = SpatialEncoderConfig::new(7);
        let a: SpatialEncoder<TestBackend> = config.init(&device);
        let b: SpatialEncoder<TestBackend> = config.init(&device);

        let wa = a.conv1.weight.val().into_data();
        let wb = b.conv1.weight.val().into_data();
        assert_ne!(
            wa.as_slice::<f32>().unwrap(),
            wb.as_slice::<f32>().unwrap(),
            "each init call must produce fresh weights"
        );
    }
}
