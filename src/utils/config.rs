//! Configuration management
//!
//! Unified configuration for data location, architecture and training,
//! loadable from JSON or TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{ADV_DECAY, ADV_LR, DISC_DECAY, DISC_LR};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data configuration
    pub data: DataConfig,
    /// Model configuration
    pub model: ModelConfig,
    /// Training configuration
    pub training: TrainingConfigFile,
}

/// Data-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset name; the matrix is read from `<data_dir>/<dataset>.csv`
    pub dataset: String,
    /// Directory containing expression matrices
    pub data_dir: String,
}

/// Model-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Latent dimension size
    pub latent_dim: i64,
    /// Initial generator channel depth (multiple of 8)
    pub gen_depth: i64,
    /// Base discriminator channel depth
    pub disc_depth: i64,
    /// Dropout rate for both networks
    pub dropout: f64,
}

/// Training-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfigFile {
    /// Number of training iterations
    pub train_steps: usize,
    /// Batch size
    pub batch_size: i64,
    /// Visualization checkpoint interval; 0 disables checkpoints
    pub save_interval: usize,
    /// Discriminator learning rate
    pub disc_lr: f64,
    /// Discriminator learning-rate decay
    pub disc_decay: f64,
    /// Adversarial learning rate
    pub adv_lr: f64,
    /// Adversarial learning-rate decay
    pub adv_decay: f64,
    /// Output directory for visualizations and metrics
    pub output_dir: String,
    /// Device: "cpu" or "cuda"
    pub device: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                dataset: "ALLAML".to_string(),
                data_dir: "data".to_string(),
            },
            model: ModelConfig {
                latent_dim: 100,
                gen_depth: 256,
                disc_depth: 64,
                dropout: 0.4,
            },
            training: TrainingConfigFile {
                train_steps: 2000,
                batch_size: 256,
                save_interval: 0,
                disc_lr: DISC_LR,
                disc_decay: DISC_DECAY,
                adv_lr: ADV_LR,
                adv_decay: ADV_DECAY,
                output_dir: "output".to_string(),
                device: "cpu".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_json(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_toml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_toml(&self, path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load a config file, dispatching on the extension
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if path.ends_with(".toml") {
            Self::from_toml(path)
        } else {
            Self::from_json(path)
        }
    }

    /// Get device from configuration
    pub fn get_device(&self) -> tch::Device {
        match self.training.device.to_lowercase().as_str() {
            "cuda" | "gpu" => {
                if tch::Cuda::is_available() {
                    tch::Device::Cuda(0)
                } else {
                    tracing::warn!("CUDA requested but not available, falling back to CPU");
                    tch::Device::Cpu
                }
            }
            _ => tch::Device::Cpu,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.data.dataset.is_empty() {
            anyhow::bail!("Dataset name must not be empty");
        }
        if self.model.latent_dim <= 0 {
            anyhow::bail!("Latent dimension must be > 0");
        }
        if self.model.gen_depth < 8 || self.model.gen_depth % 8 != 0 {
            anyhow::bail!("Generator depth must be a multiple of 8");
        }
        if self.model.disc_depth <= 0 {
            anyhow::bail!("Discriminator depth must be > 0");
        }
        if !(0.0..1.0).contains(&self.model.dropout) {
            anyhow::bail!("Dropout must be in [0, 1)");
        }
        if self.training.batch_size <= 0 {
            anyhow::bail!("Batch size must be > 0");
        }
        if self.training.train_steps == 0 {
            anyhow::bail!("Number of training steps must be > 0");
        }
        Ok(())
    }
}

/// Load a config file, creating it with defaults when missing.
pub fn ensure_config_exists(path: &str) -> anyhow::Result<Config> {
    if Path::new(path).exists() {
        Config::load(path)
    } else {
        let config = Config::default();
        if path.ends_with(".toml") {
            config.save_toml(path)?;
        } else {
            config.save_json(path)?;
        }
        Ok(config)
    }
}
