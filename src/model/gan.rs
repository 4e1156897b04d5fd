//! GAN wrapper pairing the Generator and Discriminator
//!
//! Both networks are built exactly once at construction, each into its own
//! variable store. The adversarial objective is compiled over the generator
//! store only, so a generator update can never step discriminator weights
//! even though its forward pass runs through the discriminator.

use anyhow::{bail, Result};
use tch::{nn, nn::OptimizerConfig, nn::VarStore, Device, Kind, Tensor};

use super::discriminator::{Discriminator, DiscriminatorConfig};
use super::generator::{Generator, GeneratorConfig};

/// Learning rate for the discriminator objective.
pub const DISC_LR: f64 = 2e-4;
/// Per-step learning-rate decay for the discriminator objective.
pub const DISC_DECAY: f64 = 6e-8;
/// Learning rate for the adversarial objective.
pub const ADV_LR: f64 = 1e-4;
/// Per-step learning-rate decay for the adversarial objective.
pub const ADV_DECAY: f64 = 3e-8;

/// Paired GAN networks with partitioned parameter stores.
pub struct Gan {
    generator: Generator,
    discriminator: Discriminator,
    gen_vs: VarStore,
    disc_vs: VarStore,
    device: Device,
}

impl Gan {
    /// Create a new GAN.
    ///
    /// Fails when the sample length is not a positive multiple of 4 (the
    /// generator's two upsampling stages require it), when the two networks
    /// disagree on the sample length, or when the latent dimension or
    /// generator depth is unusable.
    pub fn new(
        gen_config: GeneratorConfig,
        disc_config: DiscriminatorConfig,
        device: Device,
    ) -> Result<Self> {
        if gen_config.sample_length <= 0 || gen_config.sample_length % 4 != 0 {
            bail!(
                "sample length must be a positive multiple of 4, got {}",
                gen_config.sample_length
            );
        }
        if gen_config.sample_length != disc_config.sample_length {
            bail!(
                "generator and discriminator sample lengths differ: {} vs {}",
                gen_config.sample_length,
                disc_config.sample_length
            );
        }
        if gen_config.latent_dim <= 0 {
            bail!("latent dimension must be positive, got {}", gen_config.latent_dim);
        }
        if gen_config.depth < 8 || gen_config.depth % 8 != 0 {
            bail!(
                "generator depth must be a multiple of 8, got {}",
                gen_config.depth
            );
        }

        let gen_vs = VarStore::new(device);
        let disc_vs = VarStore::new(device);

        let generator = Generator::new(&gen_vs.root(), gen_config);
        let discriminator = Discriminator::new(&disc_vs.root(), disc_config);

        Ok(Self {
            generator,
            discriminator,
            gen_vs,
            disc_vs,
            device,
        })
    }

    /// The generator instance. Every call returns the same network built at
    /// construction time.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// The discriminator instance. Every call returns the same network built
    /// at construction time.
    pub fn discriminator(&self) -> &Discriminator {
        &self.discriminator
    }

    /// Device the networks live on
    pub fn device(&self) -> Device {
        self.device
    }

    /// Length of generated samples
    pub fn sample_length(&self) -> i64 {
        self.generator.config().sample_length
    }

    /// Latent noise dimension
    pub fn latent_dim(&self) -> i64 {
        self.generator.config().latent_dim
    }

    /// Draw a batch of latent vectors, uniform in [-1, 1].
    pub fn latent_noise(&self, num_samples: i64) -> Tensor {
        Tensor::rand([num_samples, self.latent_dim()], (Kind::Float, self.device)) * 2.0 - 1.0
    }

    /// Generate synthetic samples from fresh noise (inference mode).
    pub fn generate(&self, num_samples: i64) -> Tensor {
        self.generator.generate(&self.latent_noise(num_samples))
    }

    /// Generate samples from specific noise vectors (inference mode).
    pub fn generate_from_noise(&self, noise: &Tensor) -> Tensor {
        self.generator.generate(noise)
    }

    /// Probability of each sample being real, in [0, 1].
    pub fn discriminate(&self, samples: &Tensor) -> Tensor {
        self.discriminator.classify(samples)
    }

    /// RMSProp optimizer over the discriminator parameters.
    pub fn discriminator_optimizer(&self, lr: f64) -> Result<nn::Optimizer> {
        let opt = nn::RmsProp {
            alpha: 0.99,
            eps: 1e-8,
            wd: 0.0,
            momentum: 0.0,
            centered: false,
        }
        .build(&self.disc_vs, lr)?;
        Ok(opt)
    }

    /// RMSProp optimizer over the generator parameters only.
    ///
    /// This is the explicit parameter-group partition: the adversarial loss
    /// backpropagates through the discriminator, but stepping this optimizer
    /// mutates nothing outside the generator's store.
    pub fn adversarial_optimizer(&self, lr: f64) -> Result<nn::Optimizer> {
        let opt = nn::RmsProp {
            alpha: 0.99,
            eps: 1e-8,
            wd: 0.0,
            momentum: 0.0,
            centered: false,
        }
        .build(&self.gen_vs, lr)?;
        Ok(opt)
    }
}
