//! # Conv1D GAN for Synthetic Gene-Expression Vectors
//!
//! This crate trains a generative adversarial network that synthesizes
//! one-dimensional gene-expression-like feature vectors. The generator and
//! discriminator are 1D-convolutional networks built on libtorch via `tch`.
//!
//! ## Modules
//!
//! - `data`: expression-matrix loading and minimum-value padding
//! - `model`: generator, discriminator, transposed-conv operator and the
//!   GAN wrapper with partitioned parameter stores
//! - `training`: losses, per-step metrics and the adversarial loop
//! - `viz`: grayscale strip-plot rendering of sample batches
//! - `utils`: configuration and timing helpers

pub mod data;
pub mod model;
pub mod training;
pub mod utils;
pub mod viz;

pub use data::{load_matrix, ExpressionDataset};
pub use model::{Discriminator, DiscriminatorConfig, Gan, Generator, GeneratorConfig, TransposedConv1d};
pub use training::{StepRecord, Trainer, TrainerConfig, TrainingMetrics};
pub use utils::{Config, format_elapsed};
