//! Training dataset of padded expression vectors
//!
//! The generator's upsampling stages require sample lengths divisible by 4,
//! so raw vectors are right-padded up to the next multiple of 4. Padding
//! uses each row's own minimum value rather than zero, which keeps the pad
//! region inside the row's dynamic range.

use anyhow::{bail, Result};
use ndarray::{Array2, Array3};
use tch::{Device, Kind, Tensor};

/// Immutable collection of equal-length expression vectors,
/// shape (num_samples, img_rows, 1).
pub struct ExpressionDataset {
    data: Array3<f32>,
    raw_length: usize,
}

impl ExpressionDataset {
    /// Build a dataset from a raw (num_samples, raw_length) matrix,
    /// padding every row to the next multiple of 4.
    pub fn from_matrix(raw: &Array2<f32>) -> Result<Self> {
        let num_samples = raw.nrows();
        let raw_length = raw.ncols();

        if num_samples == 0 {
            bail!("dataset has no samples");
        }
        if raw_length == 0 {
            bail!("dataset samples have zero length");
        }

        let img_rows = Self::padded_length(raw_length);
        let mut data = Array3::<f32>::zeros((num_samples, img_rows, 1));

        for (i, row) in raw.outer_iter().enumerate() {
            let row_min = row.iter().cloned().fold(f32::INFINITY, f32::min);
            for j in 0..img_rows {
                data[[i, j, 0]] = if j < raw_length { row[j] } else { row_min };
            }
        }

        Ok(Self { data, raw_length })
    }

    /// Smallest multiple of 4 that is >= `raw_length`.
    pub fn padded_length(raw_length: usize) -> usize {
        raw_length.div_ceil(4) * 4
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.shape()[0]
    }

    /// Whether the dataset is empty (never true for a constructed dataset)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Padded sample length
    pub fn img_rows(&self) -> usize {
        self.data.shape()[1]
    }

    /// Length of the rows before padding
    pub fn raw_length(&self) -> usize {
        self.raw_length
    }

    /// Export the full dataset as a (num_samples, img_rows, 1) tensor.
    pub fn to_tensor(&self, device: Device) -> Tensor {
        let flat: Vec<f32> = self.data.iter().copied().collect();
        Tensor::from_slice(&flat)
            .view([self.len() as i64, self.img_rows() as i64, 1])
            .to_kind(Kind::Float)
            .to_device(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_padded_length() {
        assert_eq!(ExpressionDataset::padded_length(10), 12);
        assert_eq!(ExpressionDataset::padded_length(12), 12);
        assert_eq!(ExpressionDataset::padded_length(1), 4);
        assert_eq!(ExpressionDataset::padded_length(28), 28);
    }

    #[test]
    fn test_padding_uses_row_minimum() {
        let raw = array![[3.0_f32, 1.0, 2.0, 4.0, 5.0], [10.0, 20.0, 30.0, 40.0, 0.5]];
        let dataset = ExpressionDataset::from_matrix(&raw).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.img_rows(), 8);
        assert_eq!(dataset.raw_length(), 5);

        // Original entries preserved
        assert_eq!(dataset.data[[0, 0, 0]], 3.0);
        assert_eq!(dataset.data[[1, 4, 0]], 0.5);

        // Pad region filled with each row's own minimum
        for j in 5..8 {
            assert_eq!(dataset.data[[0, j, 0]], 1.0);
            assert_eq!(dataset.data[[1, j, 0]], 0.5);
        }
    }

    #[test]
    fn test_no_padding_when_multiple_of_four() {
        let raw = Array2::<f32>::ones((3, 12));
        let dataset = ExpressionDataset::from_matrix(&raw).unwrap();

        assert_eq!(dataset.img_rows(), 12);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let raw = Array2::<f32>::zeros((0, 10));
        assert!(ExpressionDataset::from_matrix(&raw).is_err());

        let raw = Array2::<f32>::zeros((4, 0));
        assert!(ExpressionDataset::from_matrix(&raw).is_err());
    }

    #[test]
    fn test_to_tensor_shape() {
        let raw = Array2::<f32>::ones((4, 10));
        let dataset = ExpressionDataset::from_matrix(&raw).unwrap();
        let tensor = dataset.to_tensor(Device::Cpu);

        assert_eq!(tensor.size(), vec![4, 12, 1]);
        assert_eq!(tensor.kind(), Kind::Float);
    }
}
