//! Model module containing the GAN architecture components
//!
//! This module provides:
//! - A transposed 1D convolution operator built on the 2D primitive
//! - Generator network mapping latent noise to expression vectors
//! - Discriminator network scoring vectors as real or synthetic
//! - A GAN wrapper with partitioned parameter stores

mod conv_transpose;
mod discriminator;
mod gan;
mod generator;

pub use conv_transpose::TransposedConv1d;
pub use discriminator::{Discriminator, DiscriminatorConfig};
pub use gan::{Gan, ADV_DECAY, ADV_LR, DISC_DECAY, DISC_LR};
pub use generator::{Generator, GeneratorConfig};
