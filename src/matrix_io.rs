// =============================================================================
// Sample Matrix I/O — CSV persistence for replay data
// =============================================================================
//
// Layout matches what pandas `DataFrame.to_csv` produces for a trial x arm
// frame: a header row of arm labels and a leading row-index column.
//
//   ,0,1,2
//   0,1,0,0
//   1,0,0,1
//
// On load the first line is skipped as a header when it starts with a blank
// cell or does not parse as data, and the index column is dropped when
// `index_column` is set. Plain 0/1 grids without either are accepted too.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::error::BanditError;

/// Parse CSV text into rows of cells.
pub fn parse_matrix(text: &str, index_column: bool) -> Result<Vec<Vec<u8>>, BanditError> {
    let mut rows = Vec::new();
    let mut first_line = true;
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let is_first = std::mem::replace(&mut first_line, false);
        // pandas header: blank index label followed by arm labels.
        if is_first && line.starts_with(',') {
            continue;
        }
        let mut cells = line.split(',').map(str::trim);
        if index_column {
            cells.next();
        }
        let parsed: Result<Vec<u8>, _> = cells.map(|c| c.parse::<u8>()).collect();
        match parsed {
            Ok(row) if !row.is_empty() => rows.push(row),
            Ok(_) => {
                return Err(BanditError::MatrixFormat {
                    line: line_no,
                    reason: "row has no outcome cells".into(),
                })
            }
            // Named header.
            Err(_) if is_first => continue,
            Err(e) => {
                return Err(BanditError::MatrixFormat {
                    line: line_no,
                    reason: e.to_string(),
                })
            }
        }
    }
    Ok(rows)
}

pub fn render_matrix(rows: &[Vec<u8>]) -> String {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    let mut out = String::new();
    let header: Vec<String> = (0..width).map(|a| a.to_string()).collect();
    out.push(',');
    out.push_str(&header.join(","));
    out.push('\n');
    for (t, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(u8::to_string).collect();
        out.push_str(&t.to_string());
        out.push(',');
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

pub fn read_matrix_csv(path: impl AsRef<Path>, index_column: bool) -> Result<Vec<Vec<u8>>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sample matrix from {}", path.display()))?;
    let rows = parse_matrix(&text, index_column)
        .with_context(|| format!("failed to parse sample matrix from {}", path.display()))?;
    info!(
        path = %path.display(),
        trials = rows.len(),
        arms = rows.first().map(Vec::len).unwrap_or(0),
        "sample matrix loaded"
    );
    Ok(rows)
}

/// Atomic write: `.tmp` sibling, then rename.
pub fn write_matrix_csv(path: impl AsRef<Path>, rows: &[Vec<u8>]) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("csv.tmp");
    std::fs::write(&tmp_path, render_matrix(rows))
        .with_context(|| format!("failed to write tmp matrix to {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename tmp matrix to {}", path.display()))?;
    info!(path = %path.display(), trials = rows.len(), "sample matrix saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pandas_layout() {
        let text = ",0,1,2\n0,1,0,0\n1,0,0,1\n";
        let rows = parse_matrix(text, true).unwrap();
        assert_eq!(rows, vec![vec![1, 0, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn parses_bare_grid() {
        let rows = parse_matrix("1,0\n0,1\n\n1,1\n", false).unwrap();
        assert_eq!(rows, vec![vec![1, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn garbage_after_header_is_an_error() {
        let err = parse_matrix("a,b\n1,0\nx,1\n", false).unwrap_err();
        assert!(matches!(err, BanditError::MatrixFormat { line: 3, .. }));
    }

    #[test]
    fn file_roundtrip_keeps_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        let rows = vec![vec![1, 0, 1], vec![0, 0, 0], vec![1, 1, 0]];
        write_matrix_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(",0,1,2\n0,1,0,1\n"));
        assert_eq!(read_matrix_csv(&path, true).unwrap(), rows);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_matrix_csv("/definitely/not/here.csv", true).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.csv"));
    }
}
