//! Loss functions and label construction for GAN training
//!
//! Both objectives use binary cross-entropy on logits with mean reduction.

use tch::{Device, Kind, Reduction, Tensor};

/// Binary cross-entropy between discriminator logits and targets.
pub fn discriminator_loss(logits: &Tensor, targets: &Tensor) -> Tensor {
    logits.binary_cross_entropy_with_logits::<Tensor>(targets, None, None, Reduction::Mean)
}

/// Adversarial loss: the generator wants the discriminator to call its
/// output real, so every target is 1.
pub fn adversarial_loss(fake_logits: &Tensor) -> Tensor {
    let targets = Tensor::ones_like(fake_logits);
    fake_logits.binary_cross_entropy_with_logits::<Tensor>(&targets, None, None, Reduction::Mean)
}

/// Labels for a mixed discriminator batch: `batch_size` ones (real) followed
/// by `batch_size` zeros (fake), shape (2 * batch_size, 1).
pub fn mixed_batch_labels(batch_size: i64, device: Device) -> Tensor {
    let real = Tensor::ones([batch_size, 1], (Kind::Float, device));
    let fake = Tensor::zeros([batch_size, 1], (Kind::Float, device));
    Tensor::cat(&[real, fake], 0)
}

/// Fraction of thresholded sigmoid predictions matching the targets.
pub fn accuracy(logits: &Tensor, targets: &Tensor) -> f64 {
    let predictions = logits.sigmoid().ge(0.5).to_kind(Kind::Float);
    predictions
        .eq_tensor(targets)
        .to_kind(Kind::Float)
        .mean(Kind::Float)
        .double_value(&[])
}
