//! Generator network
//!
//! The Generator transforms latent noise vectors into synthetic expression
//! vectors. A dense projection seeds a quarter-length feature map which is
//! upsampled back to the full sample length through nearest-neighbor
//! upsampling and transposed 1D convolutions.

use tch::{nn, nn::Module, nn::ModuleT, Device, Tensor};

use super::conv_transpose::TransposedConv1d;

/// Generator network configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Size of the latent noise vector
    pub latent_dim: i64,
    /// Length of the output expression vector (multiple of 4)
    pub sample_length: i64,
    /// Channel depth of the initial feature map; halved at each upsampling
    /// stage. The original architecture used 256 without validating the
    /// choice, so it is configurable here.
    pub depth: i64,
    /// Dropout rate applied after the dense projection
    pub dropout: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            latent_dim: 100,
            sample_length: 28,
            depth: 256,
            dropout: 0.4,
        }
    }
}

/// Generator network
///
/// Architecture:
/// 1. Dense projection from latent space to a (depth, sample_length/4) map,
///    batch norm, tanh, dropout
/// 2. Two upsample-by-2 stages, each a transposed convolution to half the
///    channels with batch norm and tanh
/// 3. A shape-preserving transposed convolution to depth/8 channels
/// 4. Final transposed convolution to a single channel, linear activation —
///    the output is an unbounded real-valued signal, since expression
///    magnitudes are unconstrained
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    fc: nn::Linear,
    bn0: nn::BatchNorm,
    tconv1: TransposedConv1d,
    bn1: nn::BatchNorm,
    tconv2: TransposedConv1d,
    bn2: nn::BatchNorm,
    tconv3: TransposedConv1d,
    bn3: nn::BatchNorm,
    tconv4: TransposedConv1d,
}

impl Generator {
    /// Create a new Generator network
    pub fn new(vs: &nn::Path, config: GeneratorConfig) -> Self {
        let depth = config.depth;
        let dim = config.sample_length / 4;

        let fc = nn::linear(vs / "fc", config.latent_dim, dim * depth, Default::default());
        let bn0 = nn::batch_norm1d(vs / "bn0", depth, Default::default());

        let tconv1 = TransposedConv1d::new(&(vs / "tconv1"), depth, depth / 2, 5, 1);
        let bn1 = nn::batch_norm1d(vs / "bn1", depth / 2, Default::default());

        let tconv2 = TransposedConv1d::new(&(vs / "tconv2"), depth / 2, depth / 4, 5, 1);
        let bn2 = nn::batch_norm1d(vs / "bn2", depth / 4, Default::default());

        let tconv3 = TransposedConv1d::new(&(vs / "tconv3"), depth / 4, depth / 8, 5, 1);
        let bn3 = nn::batch_norm1d(vs / "bn3", depth / 8, Default::default());

        // Final layer: single channel, no batch norm, no activation
        let tconv4 = TransposedConv1d::new(&(vs / "tconv4"), depth / 8, 1, 5, 1);

        Self {
            config,
            fc,
            bn0,
            tconv1,
            bn1,
            tconv2,
            bn2,
            tconv3,
            bn3,
            tconv4,
        }
    }

    /// Generate synthetic samples from noise.
    ///
    /// # Arguments
    ///
    /// * `noise` - Tensor of shape (batch, latent_dim)
    /// * `train` - Whether in training mode (affects batch norm and dropout)
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch, sample_length, 1)
    pub fn forward_t(&self, noise: &Tensor, train: bool) -> Tensor {
        let batch_size = noise.size()[0];
        let depth = self.config.depth;
        let dim = self.config.sample_length / 4;

        // Project and reshape: (batch, latent) -> (batch, depth, dim)
        let x = self.fc.forward(noise);
        let x = x.view([batch_size, depth, dim]);
        let x = self.bn0.forward_t(&x, train).tanh();
        let x = x.dropout(self.config.dropout, train);

        // dim -> 2 * dim
        let x = x.upsample_nearest1d([2 * dim], None::<f64>);
        let x = self.tconv1.forward(&x);
        let x = self.bn1.forward_t(&x, train).tanh();

        // 2 * dim -> sample_length
        let x = x.upsample_nearest1d([4 * dim], None::<f64>);
        let x = self.tconv2.forward(&x);
        let x = self.bn2.forward_t(&x, train).tanh();

        let x = self.tconv3.forward(&x);
        let x = self.bn3.forward_t(&x, train).tanh();

        let x = self.tconv4.forward(&x);

        // Transpose to (batch, sample_length, 1)
        x.transpose(1, 2)
    }

    /// Generate samples (inference mode)
    pub fn generate(&self, noise: &Tensor) -> Tensor {
        tch::no_grad(|| self.forward_t(noise, false))
    }

    /// Generate samples from fresh uniform noise in [-1, 1]
    pub fn generate_random(&self, num_samples: i64, device: Device) -> Tensor {
        let noise = Tensor::rand(
            [num_samples, self.config.latent_dim],
            (tch::Kind::Float, device),
        ) * 2.0
            - 1.0;
        self.generate(&noise)
    }

    /// Get configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl ModuleT for Generator {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        Generator::forward_t(self, xs, train)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::nn::VarStore;

    #[test]
    fn test_generator_output_shape() {
        let vs = VarStore::new(Device::Cpu);
        let config = GeneratorConfig {
            latent_dim: 100,
            sample_length: 28,
            depth: 32,
            dropout: 0.4,
        };
        let gen = Generator::new(&vs.root(), config);

        let noise = Tensor::randn([4, 100], (tch::Kind::Float, Device::Cpu));
        let output = gen.generate(&noise);

        assert_eq!(output.size(), vec![4, 28, 1]);
    }

    #[test]
    fn test_generator_output_shape_short() {
        let vs = VarStore::new(Device::Cpu);
        let config = GeneratorConfig {
            latent_dim: 100,
            sample_length: 12,
            depth: 32,
            dropout: 0.4,
        };
        let gen = Generator::new(&vs.root(), config);

        let noise = Tensor::randn([1, 100], (tch::Kind::Float, Device::Cpu));
        let output = gen.generate(&noise);

        assert_eq!(output.size(), vec![1, 12, 1]);
    }

    #[test]
    fn test_generate_random_shape() {
        let vs = VarStore::new(Device::Cpu);
        let config = GeneratorConfig {
            latent_dim: 100,
            sample_length: 16,
            depth: 32,
            dropout: 0.4,
        };
        let gen = Generator::new(&vs.root(), config);

        let output = gen.generate_random(3, Device::Cpu);
        assert_eq!(output.size(), vec![3, 16, 1]);
    }
}
