use anyhow::{Context, Result};

use crate::domain::RawTable;
use crate::errors::EngineError;

/// Read a delimited upload into headers + body rows. Ragged rows are kept;
/// downstream cell access treats missing cells as empty.
pub fn read_table(content: &str) -> Result<RawTable> {
    if content.trim().is_empty() {
        return Err(EngineError::EmptyFile.into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(EngineError::NoHeaders.into());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read data row")?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let table = read_table("Pos,Rider,Pts\n1,Alice,1000\n2,Bob,900\n").unwrap();
        assert_eq!(table.headers, vec!["Pos", "Rider", "Pts"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "Alice", "1000"]);
    }

    #[test]
    fn tolerates_ragged_rows() {
        let table = read_table("Pos,Rider,Pts\n1,Alice\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "Alice"]);
    }

    #[test]
    fn empty_content_is_a_typed_error() {
        let err = read_table("   \n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::EmptyFile)
        ));
    }

    #[test]
    fn blank_header_row_is_rejected() {
        let err = read_table(",,\n1,Alice,1000\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::NoHeaders)
        ));
    }
}
