//! Transposed 1D convolution operator
//!
//! Libtorch exposes `conv_transpose2d` as the workhorse transposed-convolution
//! primitive. This operator upsamples a 1D signal by lifting it into a rank-4
//! tensor with a synthetic height axis, applying the 2D primitive with a
//! `(1, kernel_size)` kernel, and dropping the synthetic axis again.

use tch::{nn, Tensor};

/// Transposed 1D convolution with "same" padding.
///
/// For stride 1 the output length equals the input length; for stride `s`
/// the output length is exactly `s * input_length`.
#[derive(Debug)]
pub struct TransposedConv1d {
    ws: Tensor,
    bs: Tensor,
    kernel_size: i64,
    stride: i64,
}

impl TransposedConv1d {
    /// Create a new operator, registering weight and bias under `vs`.
    ///
    /// # Arguments
    ///
    /// * `vs` - Variable store path owning the learnable parameters
    /// * `in_channels` - Number of input channels
    /// * `out_channels` - Number of output channels
    /// * `kernel_size` - Kernel width (must be odd for "same" padding)
    /// * `stride` - Upsampling factor (1 = shape-preserving, 2 = doubling)
    pub fn new(
        vs: &nn::Path,
        in_channels: i64,
        out_channels: i64,
        kernel_size: i64,
        stride: i64,
    ) -> Self {
        let ws = vs.var(
            "weight",
            &[in_channels, out_channels, 1, kernel_size],
            nn::Init::Randn {
                mean: 0.0,
                stdev: 0.02,
            },
        );
        let bs = vs.var("bias", &[out_channels], nn::Init::Const(0.0));

        Self {
            ws,
            bs,
            kernel_size,
            stride,
        }
    }

    /// Forward pass.
    ///
    /// # Arguments
    ///
    /// * `xs` - Tensor of shape (batch, in_channels, length)
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch, out_channels, stride * length)
    pub fn forward(&self, xs: &Tensor) -> Tensor {
        let padding = (self.kernel_size - 1) / 2;
        let output_padding = self.stride - 1;

        // Lift to (batch, channels, 1, length), convolve, drop the height axis
        let x = xs.unsqueeze(2);
        let x = x.conv_transpose2d(
            &self.ws,
            Some(&self.bs),
            [1, self.stride],
            [0, padding],
            [0, output_padding],
            1,
            [1, 1],
        );
        x.squeeze_dim(2)
    }

    /// Output length for a given input length.
    pub fn output_length(&self, input_length: i64) -> i64 {
        let padding = (self.kernel_size - 1) / 2;
        let output_padding = self.stride - 1;
        (input_length - 1) * self.stride - 2 * padding + self.kernel_size + output_padding
    }
}
