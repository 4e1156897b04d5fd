//! Training metrics for monitoring GAN progress

use anyhow::Result;
use std::path::Path;

/// Loss and accuracy pair recorded for one optimizer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Training iteration index
    pub step: usize,
    /// Discriminator loss on the mixed real/fake batch
    pub disc_loss: f64,
    /// Discriminator accuracy on the mixed batch
    pub disc_acc: f64,
    /// Generator (adversarial) loss
    pub gen_loss: f64,
    /// Discriminator accuracy on the generator's step, from the generator's
    /// point of view: how often fakes were called real
    pub gen_acc: f64,
}

/// Per-step metrics collected during training
#[derive(Debug, Clone, Default)]
pub struct TrainingMetrics {
    records: Vec<StepRecord>,
}

impl TrainingMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one training step
    pub fn record_step(
        &mut self,
        step: usize,
        disc_loss: f64,
        disc_acc: f64,
        gen_loss: f64,
        gen_acc: f64,
    ) {
        self.records.push(StepRecord {
            step,
            disc_loss,
            disc_acc,
            gen_loss,
            gen_acc,
        });
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether any steps have been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All recorded steps
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// Moving average of the discriminator loss over the last `window` steps
    pub fn disc_loss_ma(&self, window: usize) -> f64 {
        moving_average(self.records.iter().map(|r| r.disc_loss), self.len(), window)
    }

    /// Moving average of the generator loss over the last `window` steps
    pub fn gen_loss_ma(&self, window: usize) -> f64 {
        moving_average(self.records.iter().map(|r| r.gen_loss), self.len(), window)
    }

    /// Heuristic mode-collapse check: the discriminator wins outright while
    /// the generator's loss diverges.
    pub fn check_mode_collapse(&self, window: usize) -> bool {
        if self.len() < window {
            return false;
        }
        self.disc_loss_ma(window) < 0.1 && self.gen_loss_ma(window) > 5.0
    }

    /// Save the full history to CSV
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(["step", "disc_loss", "disc_acc", "gen_loss", "gen_acc"])?;
        for record in &self.records {
            writer.write_record([
                record.step.to_string(),
                record.disc_loss.to_string(),
                record.disc_acc.to_string(),
                record.gen_loss.to_string(),
                record.gen_acc.to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Load a history previously written by [`TrainingMetrics::save_csv`]
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut metrics = Self::new();

        for result in reader.records() {
            let record = result?;
            metrics.records.push(StepRecord {
                step: record[0].parse()?,
                disc_loss: record[1].parse()?,
                disc_acc: record[2].parse()?,
                gen_loss: record[3].parse()?,
                gen_acc: record[4].parse()?,
            });
        }

        Ok(metrics)
    }
}

fn moving_average(values: impl DoubleEndedIterator<Item = f64>, len: usize, window: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    let n = window.min(len);
    let sum: f64 = values.rev().take(n).sum();
    sum / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_latest() {
        let mut metrics = TrainingMetrics::new();

        metrics.record_step(0, 1.5, 0.5, 0.8, 0.2);
        metrics.record_step(1, 1.3, 0.6, 0.75, 0.25);

        assert_eq!(metrics.len(), 2);
        let latest = metrics.latest().unwrap();
        assert_eq!(latest.step, 1);
        assert_eq!(latest.disc_loss, 1.3);
    }

    #[test]
    fn test_moving_averages() {
        let mut metrics = TrainingMetrics::new();
        metrics.record_step(0, 1.0, 0.5, 2.0, 0.5);
        metrics.record_step(1, 3.0, 0.5, 4.0, 0.5);

        assert_eq!(metrics.disc_loss_ma(2), 2.0);
        assert_eq!(metrics.gen_loss_ma(1), 4.0);
    }

    #[test]
    fn test_mode_collapse_detection() {
        let mut metrics = TrainingMetrics::new();
        for i in 0..10 {
            metrics.record_step(i, 0.01, 0.99, 8.0, 0.0);
        }

        assert!(metrics.check_mode_collapse(10));
        assert!(!metrics.check_mode_collapse(11));
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");

        let mut metrics = TrainingMetrics::new();
        metrics.record_step(0, 1.5, 0.5, 0.8, 0.2);
        metrics.record_step(1, 1.25, 0.625, 0.75, 0.25);
        metrics.save_csv(&path).unwrap();

        let loaded = TrainingMetrics::load_csv(&path).unwrap();
        assert_eq!(loaded.records(), metrics.records());
    }
}
