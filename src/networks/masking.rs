//! Validity masking for the categorical action distribution.
//!
//! The environment reports which discrete actions are legal in the current
//! state as a 0/1 vector per example. Masking is a two-step contract:
//!
//! 1. multiply the distribution elementwise by the mask, so every illegal
//!    action has probability exactly 0;
//! 2. divide by the per-example sum of the masked result, so the remaining
//!    probabilities sum to 1.
//!
//! The two steps are kept as one explicit function rather than folded into a
//! softmax variant, so the exact-zero guarantee on illegal actions can be
//! tested in isolation.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Error type for masking operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// The validity mask of an example has no nonzero entries, so the
    /// renormalization step is undefined.
    AllActionsMasked {
        /// Index of the first offending example within the batch.
        example: usize,
    },
}

impl std::fmt::Display for MaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskError::AllActionsMasked { example } => {
                write!(f, "validity mask for example {} has no valid action", example)
            }
        }
    }
}

impl std::error::Error for MaskError {}

/// Zero out illegal actions and renormalize the remainder.
///
/// # Arguments
/// * `probs` - Categorical probabilities `[batch, num_actions]`, strictly
///   positive per example (e.g. a softmax output)
/// * `valid_actions` - 0/1 validity mask `[batch, num_actions]`
///
/// # Returns
/// Masked distribution `[batch, num_actions]`: entries where the mask is 0
/// are exactly 0, and each example's entries sum to 1.
///
/// # Errors
/// [`MaskError::AllActionsMasked`] if any example's masked probability mass
/// is not positive; dividing by it would silently produce NaN or Inf.
pub fn mask_valid_actions<B: Backend>(
    probs: Tensor<B, 2>,
    valid_actions: Tensor<B, 2>,
) -> Result<Tensor<B, 2>, MaskError> {
    let masked = probs * valid_actions;
    let sums = masked.clone().sum_dim(1);

    let sums_data = sums.clone().into_data();
    let sums_slice: &[f32] = sums_data.as_slice().expect("mask sums should be f32");
    for (example, sum) in sums_slice.iter().enumerate() {
        if *sum <= 0.0 {
            return Err(MaskError::AllActionsMasked { example });
        }
    }

    Ok(masked / sums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::activation::softmax;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_masked_entries_are_exactly_zero() {
        let device = Default::default();
        let probs = softmax(
            Tensor::<TestBackend, 2>::random([3, 8], Distribution::Normal(0.0, 1.0), &device),
            1,
        );
        let mask = Tensor::from_floats(
            [
                [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
                [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            ],
            &device,
        );

        let masked = mask_valid_actions(probs, mask.clone()).unwrap();
        let data = masked.into_data();
        let slice: &[f32] = data.as_slice().unwrap();
        let mask_data = mask.into_data();
        let mask_slice: &[f32] = mask_data.as_slice().unwrap();

        for (value, mask_value) in slice.iter().zip(mask_slice) {
            if *mask_value == 0.0 {
                assert_eq!(*value, 0.0, "illegal action must have probability 0");
            }
        }
    }

    #[test]
    fn test_remainder_sums_to_one() {
        let device = Default::default();
        let probs = softmax(
            Tensor::<TestBackend, 2>::random([4, 10], Distribution::Normal(0.0, 1.0), &device),
            1,
        );
        let mask = Tensor::from_floats(
            [
                [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            ],
            &device,
        );

        let masked = mask_valid_actions(probs, mask).unwrap();
        let sums = masked.sum_dim(1).into_data();
        let slice: &[f32] = sums.as_slice().unwrap();
        for sum in slice {
            assert!((sum - 1.0).abs() < 1e-6, "masked row must sum to 1, got {}", sum);
        }
    }

    #[test]
    fn test_single_valid_action_gets_full_mass() {
        let device = Default::default();
        let probs = softmax(
            Tensor::<TestBackend, 2>::random([1, 6], Distribution::Normal(0.0, 1.0), &device),
            1,
        );
        let mask = Tensor::from_floats([[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]], &device);

        let masked = mask_valid_actions(probs, mask).unwrap();
        let data = masked.into_data();
        let slice: &[f32] = data.as_slice().unwrap();
        assert_eq!(slice, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_all_zero_mask_is_an_error() {
        let device = Default::default();
        let probs = softmax(
            Tensor::<TestBackend, 2>::random([3, 4], Distribution::Normal(0.0, 1.0), &device),
            1,
        );
        let mask = Tensor::from_floats(
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 1.0, 0.0],
            ],
            &device,
        );

        let result = mask_valid_actions(probs, mask);
        assert_eq!(result.unwrap_err(), MaskError::AllActionsMasked { example: 1 });
    }

    #[test]
    fn test_error_display() {
        let err = MaskError::AllActionsMasked { example: 7 };
        assert_eq!(
            err.to_string(),
            "validity mask for example 7 has no valid action"
        );
    }
}
