//! Tabla CSV con encabezado. Las celdas se guardan como texto crudo; la
//! interpretación (faltantes, números) queda a cargo de cada step.
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("row {row} has {found} fields, header has {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Lee un CSV con encabezado. Las filas cortas se completan con celdas
    /// vacías (faltantes); las filas con más campos que el encabezado son
    /// un error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();
        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() > width {
                return Err(TableError::Ragged { row: i + 1,
                                                expected: width,
                                                found: record.len() });
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }
        Ok(Self { headers, rows })
    }

    pub fn read_path(path: &Path) -> Result<Self, TableError> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    /// Escribe encabezado + filas. Una tabla sin filas produce sólo el
    /// encabezado.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
        if !self.headers.is_empty() {
            wtr.write_record(&StringRecord::from(self.headers.clone()))?;
        }
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_path(&self, path: &Path) -> Result<(), TableError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.to_writer(std::fs::File::create(path)?)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| r[idx].as_str()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let t = Table::from_reader("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(t.rows, vec![vec!["1".to_string(), "2".into(), String::new()]]);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = Table::from_reader("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Ragged { row: 1, expected: 2, found: 3 }));
    }

    #[test]
    fn empty_table_writes_header_only() {
        let t = Table::new(vec!["id".into(), "price".into()], vec![]);
        let mut out = Vec::new();
        t.to_writer(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id,price\n");
    }

    #[test]
    fn quoted_fields_survive() {
        let t = Table::from_reader("name,price\n\"Cozy, bright\",120\n".as_bytes()).unwrap();
        assert_eq!(t.rows[0][0], "Cozy, bright");
        let mut out = Vec::new();
        t.to_writer(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "name,price\n\"Cozy, bright\",120\n");
    }
}
