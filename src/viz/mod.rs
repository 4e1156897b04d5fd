//! Strip-plot rendering of sample batches
//!
//! Each expression vector is drawn as a horizontal grayscale strip, one
//! strip per sample stacked top to bottom, mirroring a one-column subplot
//! grid. Values are normalized per sample; a constant vector renders as a
//! uniform mid-gray strip.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::GrayImage;
use tch::{Device, Kind, Tensor};

/// Pixel height of each sample strip.
const STRIP_HEIGHT: u32 = 12;

/// Render a batch of samples to a grayscale PNG.
///
/// # Arguments
///
/// * `samples` - Tensor of shape (num_samples, length, 1)
/// * `path` - Output image path; I/O errors propagate to the caller
pub fn render_samples(samples: &Tensor, path: &Path) -> Result<()> {
    let size = samples.size();
    if size.len() != 3 || size[2] != 1 {
        bail!("expected samples of shape (n, length, 1), got {:?}", size);
    }
    let (num_samples, length) = (size[0] as usize, size[1] as usize);
    if num_samples == 0 || length == 0 {
        bail!("cannot render an empty sample batch");
    }

    let values: Vec<f32> = samples
        .to_device(Device::Cpu)
        .to_kind(Kind::Float)
        .flatten(0, -1)
        .try_into()?;

    let mut img = GrayImage::new(length as u32, num_samples as u32 * STRIP_HEIGHT);

    for i in 0..num_samples {
        let row = &values[i * length..(i + 1) * length];
        let min = row.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let span = max - min;

        for (x, &value) in row.iter().enumerate() {
            let level = if span > 0.0 {
                ((value - min) / span * 255.0).round() as u8
            } else {
                128
            };
            for dy in 0..STRIP_HEIGHT {
                img.put_pixel(x as u32, i as u32 * STRIP_HEIGHT + dy, image::Luma([level]));
            }
        }
    }

    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Path for a generated-sample image; `step` disambiguates checkpoints.
pub fn fake_path(output_dir: &Path, dataset: &str, step: Option<usize>) -> PathBuf {
    match step {
        Some(step) => output_dir.join(format!("{}_fake_{}.png", dataset, step)),
        None => output_dir.join(format!("{}_fake.png", dataset)),
    }
}

/// Path for a real-sample image.
pub fn real_path(output_dir: &Path, dataset: &str) -> PathBuf {
    output_dir.join(format!("{}_real.png", dataset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_samples_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");

        let samples = Tensor::randn([4, 12, 1], (Kind::Float, Device::Cpu));
        render_samples(&samples, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 12);
        assert_eq!(img.height(), 4 * STRIP_HEIGHT);
    }

    #[test]
    fn test_render_constant_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.png");

        let samples = Tensor::ones([1, 8, 1], (Kind::Float, Device::Cpu));
        render_samples(&samples, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_render_rejects_bad_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");

        let samples = Tensor::randn([4, 12], (Kind::Float, Device::Cpu));
        assert!(render_samples(&samples, &path).is_err());
    }

    #[test]
    fn test_render_propagates_io_errors() {
        let samples = Tensor::randn([1, 4, 1], (Kind::Float, Device::Cpu));
        let path = Path::new("/nonexistent-dir/grid.png");
        assert!(render_samples(&samples, path).is_err());
    }

    #[test]
    fn test_path_helpers() {
        let dir = Path::new("out");
        assert_eq!(
            fake_path(dir, "ALLAML", Some(10)),
            Path::new("out/ALLAML_fake_10.png")
        );
        assert_eq!(fake_path(dir, "ALLAML", None), Path::new("out/ALLAML_fake.png"));
        assert_eq!(real_path(dir, "ALLAML"), Path::new("out/ALLAML_real.png"));
    }
}
