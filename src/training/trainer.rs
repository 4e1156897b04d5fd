//! Adversarial training loop
//!
//! Each iteration updates the discriminator on a mixed real/fake batch, then
//! updates the generator through the composed adversarial objective. The
//! adversarial optimizer covers the generator's variable store only, so the
//! discriminator acts as a fixed feature extractor during that step.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tch::{Kind, Tensor};
use tracing::{info, warn};

use crate::data::ExpressionDataset;
use crate::model::{Gan, ADV_DECAY, ADV_LR, DISC_DECAY, DISC_LR};
use crate::viz;

use super::losses::{accuracy, adversarial_loss, discriminator_loss, mixed_batch_labels};
use super::metrics::TrainingMetrics;

/// Number of fixed latent vectors revisualized at every checkpoint.
const VIZ_SAMPLES: i64 = 16;

/// Training configuration
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Number of training iterations; the loop runs exactly this many times
    pub train_steps: usize,
    /// Real (and fake) samples per iteration
    pub batch_size: i64,
    /// Emit a visualization checkpoint every N steps; 0 disables checkpoints
    pub save_interval: usize,
    /// Discriminator learning rate
    pub disc_lr: f64,
    /// Discriminator per-step learning-rate decay
    pub disc_decay: f64,
    /// Adversarial (generator) learning rate
    pub adv_lr: f64,
    /// Adversarial per-step learning-rate decay
    pub adv_decay: f64,
    /// Directory receiving visualization checkpoints
    pub output_dir: PathBuf,
    /// Dataset name used in checkpoint filenames
    pub dataset_name: String,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            train_steps: 2000,
            batch_size: 256,
            save_interval: 0,
            disc_lr: DISC_LR,
            disc_decay: DISC_DECAY,
            adv_lr: ADV_LR,
            adv_decay: ADV_DECAY,
            output_dir: PathBuf::from("output"),
            dataset_name: "ALLAML".to_string(),
        }
    }
}

/// GAN trainer owning the networks and both compiled objectives.
///
/// The optimizers are built once at construction; the discriminator's
/// parameters are stepped only by `disc_opt` and the generator's only by
/// `adv_opt`.
pub struct Trainer {
    config: TrainerConfig,
    gan: Gan,
    disc_opt: tch::nn::Optimizer,
    adv_opt: tch::nn::Optimizer,
    metrics: TrainingMetrics,
}

impl Trainer {
    /// Create a new trainer around an existing GAN.
    pub fn new(gan: Gan, config: TrainerConfig) -> Result<Self> {
        if config.batch_size <= 0 {
            bail!("batch size must be positive, got {}", config.batch_size);
        }

        let disc_opt = gan.discriminator_optimizer(config.disc_lr)?;
        let adv_opt = gan.adversarial_optimizer(config.adv_lr)?;

        Ok(Self {
            config,
            gan,
            disc_opt,
            adv_opt,
            metrics: TrainingMetrics::new(),
        })
    }

    /// The trained networks
    pub fn gan(&self) -> &Gan {
        &self.gan
    }

    /// Metrics recorded so far
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    /// Configuration
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Run the adversarial loop for exactly `train_steps` iterations.
    ///
    /// Fails fast on a dataset/network length mismatch and aborts if either
    /// loss goes non-finite; there is no early stopping otherwise.
    pub fn train(&mut self, dataset: &ExpressionDataset) -> Result<&TrainingMetrics> {
        if dataset.is_empty() {
            bail!("cannot train on an empty dataset");
        }
        if dataset.img_rows() as i64 != self.gan.sample_length() {
            bail!(
                "dataset sample length {} does not match network sample length {}",
                dataset.img_rows(),
                self.gan.sample_length()
            );
        }

        let device = self.gan.device();
        let batch_size = self.config.batch_size;
        let x_train = dataset.to_tensor(device);
        let num_samples = dataset.len() as i64;

        // The same latent batch is revisualized at every checkpoint so the
        // generator's progress stays visually comparable across steps.
        let fixed_noise = if self.config.save_interval > 0 {
            std::fs::create_dir_all(&self.config.output_dir)?;
            Some(self.gan.latent_noise(VIZ_SAMPLES))
        } else {
            None
        };

        info!(
            "Starting training: {} steps, batch size {}, {} samples of length {}",
            self.config.train_steps,
            batch_size,
            num_samples,
            dataset.img_rows()
        );

        let pb = ProgressBar::new(self.config.train_steps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );

        for step in 0..self.config.train_steps {
            // ========== Discriminator update ==========
            let indices = Tensor::randint(num_samples, [batch_size], (Kind::Int64, device));
            let real = x_train.index_select(0, &indices);
            let fake = tch::no_grad(|| {
                self.gan
                    .generator()
                    .forward_t(&self.gan.latent_noise(batch_size), false)
            });

            let mixed = Tensor::cat(&[real, fake], 0);
            let labels = mixed_batch_labels(batch_size, device);

            let disc_logits = self.gan.discriminator().forward_t(&mixed, true);
            let d_loss = discriminator_loss(&disc_logits, &labels);

            self.disc_opt
                .set_lr(decayed_lr(self.config.disc_lr, self.config.disc_decay, step));
            self.disc_opt.zero_grad();
            d_loss.backward();
            self.disc_opt.step();

            let d_loss_value = d_loss.double_value(&[]);
            let d_acc = accuracy(&disc_logits, &labels);

            // ========== Generator update ==========
            let noise = self.gan.latent_noise(batch_size);
            let fake = self.gan.generator().forward_t(&noise, true);
            let fake_logits = self.gan.discriminator().forward_t(&fake, true);
            let a_loss = adversarial_loss(&fake_logits);

            self.adv_opt
                .set_lr(decayed_lr(self.config.adv_lr, self.config.adv_decay, step));
            self.adv_opt.zero_grad();
            a_loss.backward();
            self.adv_opt.step();

            let a_loss_value = a_loss.double_value(&[]);
            let a_targets = Tensor::ones_like(&fake_logits);
            let a_acc = accuracy(&fake_logits, &a_targets);

            if !d_loss_value.is_finite() || !a_loss_value.is_finite() {
                bail!(
                    "training diverged at step {}: discriminator loss {}, generator loss {}",
                    step,
                    d_loss_value,
                    a_loss_value
                );
            }

            self.metrics
                .record_step(step, d_loss_value, d_acc, a_loss_value, a_acc);

            info!(
                "{}: [Discriminator loss: {:.6}, acc: {:.6}]  [Generator loss: {:.6}, acc: {:.6}]",
                step, d_loss_value, d_acc, a_loss_value, a_acc
            );
            pb.set_message(format!("G: {:.4}, D: {:.4}", a_loss_value, d_loss_value));
            pb.inc(1);

            if self.metrics.check_mode_collapse(100) {
                warn!("Possible mode collapse detected; consider adjusting learning rates");
            }

            if let Some(noise) = &fixed_noise {
                if (step + 1) % self.config.save_interval == 0 {
                    self.save_checkpoint_image(noise, step + 1)?;
                }
            }
        }

        pb.finish_with_message("done");

        Ok(&self.metrics)
    }

    fn save_checkpoint_image(&self, fixed_noise: &Tensor, step: usize) -> Result<()> {
        let samples = self.gan.generate_from_noise(fixed_noise);
        let path = viz::fake_path(
            &self.config.output_dir,
            &self.config.dataset_name,
            Some(step),
        );
        viz::render_samples(&samples, &path)?;
        info!("Saved visualization checkpoint {}", path.display());
        Ok(())
    }
}

fn decayed_lr(base: f64, decay: f64, step: usize) -> f64 {
    base / (1.0 + decay * step as f64)
}

/// Convenience path helper shared by the CLI for final visualizations.
pub fn metrics_path(output_dir: &Path) -> PathBuf {
    output_dir.join("training_metrics.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiscriminatorConfig, GeneratorConfig};
    use ndarray::Array2;
    use tch::Device;

    fn tiny_dataset() -> ExpressionDataset {
        // 4 samples of raw length 10, padded to img_rows = 12
        let raw = Array2::from_shape_fn((4, 10), |(i, j)| (i * 10 + j) as f32 * 0.1);
        ExpressionDataset::from_matrix(&raw).unwrap()
    }

    fn tiny_trainer(config: TrainerConfig) -> Trainer {
        let gen_config = GeneratorConfig {
            latent_dim: 100,
            sample_length: 12,
            depth: 32,
            dropout: 0.4,
        };
        let disc_config = DiscriminatorConfig {
            sample_length: 12,
            depth: 8,
            dropout: 0.4,
        };
        let gan = Gan::new(gen_config, disc_config, Device::Cpu).unwrap();
        Trainer::new(gan, config).unwrap()
    }

    #[test]
    fn test_decayed_lr() {
        assert_eq!(decayed_lr(2e-4, 6e-8, 0), 2e-4);
        assert!(decayed_lr(2e-4, 6e-8, 1_000_000) < 2e-4);
    }

    #[test]
    fn test_train_records_per_step_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = tiny_dataset();
        let mut trainer = tiny_trainer(TrainerConfig {
            train_steps: 2,
            batch_size: 2,
            save_interval: 0,
            output_dir: dir.path().join("out"),
            ..Default::default()
        });

        let metrics = trainer.train(&dataset).unwrap();

        assert_eq!(metrics.len(), 2);
        for (i, record) in metrics.records().iter().enumerate() {
            assert_eq!(record.step, i);
            assert!(record.disc_loss.is_finite());
            assert!(record.gen_loss.is_finite());
        }

        // save_interval = 0 must not create any visualization output
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_train_emits_checkpoint_per_interval() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let dataset = tiny_dataset();
        let mut trainer = tiny_trainer(TrainerConfig {
            train_steps: 3,
            batch_size: 2,
            save_interval: 1,
            output_dir: out_dir.clone(),
            dataset_name: "ALLAML".to_string(),
            ..Default::default()
        });

        trainer.train(&dataset).unwrap();

        for step in 1..=3 {
            assert!(out_dir.join(format!("ALLAML_fake_{}.png", step)).exists());
        }
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 3);
    }

    #[test]
    fn test_train_rejects_length_mismatch() {
        let raw = Array2::<f32>::ones((4, 20));
        let dataset = ExpressionDataset::from_matrix(&raw).unwrap();
        let mut trainer = tiny_trainer(TrainerConfig {
            train_steps: 1,
            batch_size: 2,
            ..Default::default()
        });

        assert!(trainer.train(&dataset).is_err());
    }

    #[test]
    fn test_trainer_rejects_zero_batch() {
        let gen_config = GeneratorConfig {
            latent_dim: 100,
            sample_length: 12,
            depth: 32,
            dropout: 0.4,
        };
        let disc_config = DiscriminatorConfig {
            sample_length: 12,
            depth: 8,
            dropout: 0.4,
        };
        let gan = Gan::new(gen_config, disc_config, Device::Cpu).unwrap();

        let config = TrainerConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(Trainer::new(gan, config).is_err());
    }
}
