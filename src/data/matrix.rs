//! Expression-matrix file loading
//!
//! Training data is a plain numeric matrix with one row per sample and one
//! column per feature, stored as headerless CSV. The loader rejects empty
//! and ragged files up front so the training loop never sees them.

use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::Array2;

/// Load an expression matrix of shape (num_samples, raw_length).
pub fn load_matrix(path: &Path) -> Result<Array2<f32>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open expression matrix {}", path.display()))?;

    let mut values: Vec<f32> = Vec::new();
    let mut num_rows = 0usize;
    let mut row_len: Option<usize> = None;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;

        match row_len {
            None => row_len = Some(record.len()),
            Some(len) if record.len() != len => {
                bail!(
                    "ragged matrix in {}: row {} has {} columns, expected {}",
                    path.display(),
                    row_idx,
                    record.len(),
                    len
                );
            }
            Some(_) => {}
        }

        for (col_idx, field) in record.iter().enumerate() {
            let value: f32 = field.trim().parse().with_context(|| {
                format!(
                    "non-numeric value {:?} at row {}, column {} in {}",
                    field,
                    row_idx,
                    col_idx,
                    path.display()
                )
            })?;
            values.push(value);
        }

        num_rows += 1;
    }

    let row_len = match row_len {
        Some(len) if len > 0 && num_rows > 0 => len,
        _ => bail!("expression matrix {} is empty", path.display()),
    };

    Ok(Array2::from_shape_vec((num_rows, row_len), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_matrix() {
        let file = write_csv("1.0,2.0,3.0\n4.0,5.0,6.0\n");
        let matrix = load_matrix(file.path()).unwrap();

        assert_eq!(matrix.shape(), &[2, 3]);
        assert_eq!(matrix[[0, 0]], 1.0);
        assert_eq!(matrix[[1, 2]], 6.0);
    }

    #[test]
    fn test_load_matrix_rejects_empty() {
        let file = write_csv("");
        assert!(load_matrix(file.path()).is_err());
    }

    #[test]
    fn test_load_matrix_rejects_ragged() {
        let file = write_csv("1.0,2.0,3.0\n4.0,5.0\n");
        assert!(load_matrix(file.path()).is_err());
    }

    #[test]
    fn test_load_matrix_rejects_non_numeric() {
        let file = write_csv("1.0,two,3.0\n");
        assert!(load_matrix(file.path()).is_err());
    }
}
