//! Training module: losses, metrics and the adversarial loop

mod losses;
mod metrics;
mod trainer;

pub use losses::{accuracy, adversarial_loss, discriminator_loss, mixed_batch_labels};
pub use metrics::{StepRecord, TrainingMetrics};
pub use trainer::{metrics_path, Trainer, TrainerConfig};
