//! Helper functions and configuration

mod config;
mod timer;

pub use config::{ensure_config_exists, Config, DataConfig, ModelConfig, TrainingConfigFile};
pub use timer::format_elapsed;
