use std::{io::BufRead, path::Path};

use nalgebra::Matrix4;

use super::dataset::DatasetError;

/// Reads a text matrix, one row per line, values separated by spaces, tabs or commas.
/// Blank lines and lines starting with `#` are skipped.
pub fn read_matrix_file<P: AsRef<Path>>(filepath: P) -> Result<Vec<Vec<f64>>, DatasetError> {
    let filepath = filepath.as_ref();
    let file = std::fs::File::open(filepath)?;
    let reader = std::io::BufReader::new(file);

    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = line
            .split(&[',', '\t', ' '])
            .filter(|token| !token.is_empty())
            .map(|token| token.parse::<f64>().ok())
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| {
                DatasetError::Parser(format!(
                    "invalid number in {}: {line:?}",
                    filepath.display()
                ))
            })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Converts the rows of a 4x4 matrix file.
pub fn rows_to_matrix4(rows: &[Vec<f64>]) -> Option<Matrix4<f64>> {
    if rows.len() != 4 || rows.iter().any(|row| row.len() != 4) {
        return None;
    }
    Some(Matrix4::from_fn(|r, c| rows[r][c]))
}
