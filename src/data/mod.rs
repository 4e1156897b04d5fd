//! Data module for loading and preparing expression matrices
//!
//! This module provides:
//! - CSV loading of raw (num_samples, raw_length) expression matrices
//! - The padded, fixed-shape training dataset

mod dataset;
mod matrix;

pub use dataset::ExpressionDataset;
pub use matrix::load_matrix;
