//! Discriminator network
//!
//! The Discriminator classifies expression vectors as real or synthetic.
//! Four strided 1D convolutions downsample the input before a dense head
//! produces a single real/fake logit. The network carries no batch
//! normalization; the asymmetry against the generator is intentional.

use tch::{nn, nn::Module, nn::ModuleT, Tensor};

/// Negative slope for the leaky rectified activation.
const LEAKY_SLOPE: f64 = 0.2;

/// Discriminator network configuration
#[derive(Debug, Clone)]
pub struct DiscriminatorConfig {
    /// Length of the input expression vector (multiple of 4)
    pub sample_length: i64,
    /// Base channel depth; the four blocks use depth, 2x, 4x, 8x
    pub depth: i64,
    /// Dropout rate
    pub dropout: f64,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self {
            sample_length: 28,
            depth: 64,
            dropout: 0.4,
        }
    }
}

/// Discriminator network
///
/// Architecture:
/// 1. Conv1d blocks with depths d, 2d, 4d, 8d, kernel 5, "same" padding,
///    strides 2, 2, 2, 1, each followed by leaky ReLU and dropout
/// 2. Flatten and dense projection to a single logit
#[derive(Debug)]
pub struct Discriminator {
    config: DiscriminatorConfig,
    conv1: nn::Conv1D,
    conv2: nn::Conv1D,
    conv3: nn::Conv1D,
    conv4: nn::Conv1D,
    fc: nn::Linear,
}

fn leaky_relu(xs: &Tensor) -> Tensor {
    xs.maximum(&(xs * LEAKY_SLOPE))
}

impl Discriminator {
    /// Create a new Discriminator network
    pub fn new(vs: &nn::Path, config: DiscriminatorConfig) -> Self {
        let depth = config.depth;

        let down = nn::ConvConfig {
            stride: 2,
            padding: 2,
            ..Default::default()
        };
        let keep = nn::ConvConfig {
            stride: 1,
            padding: 2,
            ..Default::default()
        };

        // Input is a single-channel sequence
        let conv1 = nn::conv1d(vs / "conv1", 1, depth, 5, down);
        let conv2 = nn::conv1d(vs / "conv2", depth, depth * 2, 5, down);
        let conv3 = nn::conv1d(vs / "conv3", depth * 2, depth * 4, 5, down);
        let conv4 = nn::conv1d(vs / "conv4", depth * 4, depth * 8, 5, keep);

        // Three stride-2 convolutions with "same" padding leave ceil(len / 8)
        let final_len = (config.sample_length + 7) / 8;
        let fc = nn::linear(vs / "fc", depth * 8 * final_len, 1, Default::default());

        Self {
            config,
            conv1,
            conv2,
            conv3,
            conv4,
            fc,
        }
    }

    /// Forward pass.
    ///
    /// # Arguments
    ///
    /// * `input` - Tensor of shape (batch, sample_length, 1)
    /// * `train` - Whether in training mode (affects dropout)
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch, 1) with logits (not sigmoid)
    pub fn forward_t(&self, input: &Tensor, train: bool) -> Tensor {
        let dropout = self.config.dropout;

        // Transpose to (batch, channels, length) for Conv1D
        let x = input.transpose(1, 2);

        let x = leaky_relu(&self.conv1.forward(&x)).dropout(dropout, train);
        let x = leaky_relu(&self.conv2.forward(&x)).dropout(dropout, train);
        let x = leaky_relu(&self.conv3.forward(&x)).dropout(dropout, train);
        let x = leaky_relu(&self.conv4.forward(&x)).dropout(dropout, train);

        let batch_size = x.size()[0];
        let x = x.view([batch_size, -1]);

        self.fc.forward(&x)
    }

    /// Classify samples (inference mode).
    ///
    /// Returns the probability of each sample being real, in [0, 1].
    pub fn classify(&self, input: &Tensor) -> Tensor {
        self.forward_t(input, false).sigmoid()
    }

    /// Get configuration
    pub fn config(&self) -> &DiscriminatorConfig {
        &self.config
    }
}

impl ModuleT for Discriminator {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        Discriminator::forward_t(self, xs, train)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{nn::VarStore, Device};

    #[test]
    fn test_discriminator_output_shape() {
        let vs = VarStore::new(Device::Cpu);
        let config = DiscriminatorConfig {
            sample_length: 28,
            depth: 8,
            dropout: 0.4,
        };
        let disc = Discriminator::new(&vs.root(), config);

        let input = Tensor::randn([4, 28, 1], (tch::Kind::Float, Device::Cpu));
        let output = disc.forward_t(&input, false);

        assert_eq!(output.size(), vec![4, 1]);
    }

    #[test]
    fn test_discriminator_handles_short_sequences() {
        // img_rows = 12 (raw length 10 padded up) must survive all four blocks
        let vs = VarStore::new(Device::Cpu);
        let config = DiscriminatorConfig {
            sample_length: 12,
            depth: 8,
            dropout: 0.4,
        };
        let disc = Discriminator::new(&vs.root(), config);

        let input = Tensor::randn([2, 12, 1], (tch::Kind::Float, Device::Cpu));
        let output = disc.forward_t(&input, false);

        assert_eq!(output.size(), vec![2, 1]);
    }

    #[test]
    fn test_discriminator_classify_probabilities() {
        let vs = VarStore::new(Device::Cpu);
        let config = DiscriminatorConfig {
            sample_length: 28,
            depth: 8,
            dropout: 0.4,
        };
        let disc = Discriminator::new(&vs.root(), config);

        let input = Tensor::randn([8, 28, 1], (tch::Kind::Float, Device::Cpu));
        let probs = disc.classify(&input);

        let min_val: f64 = probs.min().double_value(&[]);
        let max_val: f64 = probs.max().double_value(&[]);
        assert!(min_val >= 0.0 && max_val <= 1.0);
    }
}
