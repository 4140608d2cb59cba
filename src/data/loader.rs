use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};

use crate::error::{LpfError, Result};

/// Where a CSV comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// File on the local filesystem
    Path(PathBuf),
    /// Remote file fetched over HTTP(S)
    Url(String),
    /// Bytes already in memory (dropped or uploaded file)
    Bytes { name: String, bytes: Vec<u8> },
}

impl DataSource {
    /// Pick `Url` for strings that look like HTTP(S) locations, `Path` otherwise.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }

    /// True when the source is named like a CSV file.
    ///
    /// URLs are always accepted; query strings make the extension unreliable.
    pub fn has_csv_name(&self) -> bool {
        match self {
            DataSource::Path(p) => has_csv_extension(p),
            DataSource::Url(_) => true,
            DataSource::Bytes { name, .. } => has_csv_extension(Path::new(name)),
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => write!(f, "{}", u),
            DataSource::Bytes { name, bytes } => write!(f, "{} ({} bytes)", name, bytes.len()),
        }
    }
}

/// Parsed CSV: a header row plus string cells
///
/// Cells are kept as (trimmed) text; nothing is converted at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl CsvTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        let idx = *self.index.get(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Required column names that are absent from the header.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Parse CSV text from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(LpfError::Load("no header row".to_string()));
        }

        let mut index = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            // First occurrence wins on duplicate names
            index.entry(header.clone()).or_insert(i);
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        log::debug!("Parsed CSV: {} columns, {} rows", headers.len(), rows.len());

        Ok(Self {
            headers,
            rows,
            index,
        })
    }
}

/// Load a CSV table from a path, URL or in-memory bytes.
///
/// # Errors
/// Returns `LpfError::Load` if the source cannot be read, the request fails
/// or returns an error status, or the CSV is malformed.
pub fn load_table(source: &DataSource) -> Result<CsvTable> {
    log::info!("Loading CSV from {}", source);
    match source {
        DataSource::Path(path) => {
            let file = File::open(path)
                .map_err(|e| LpfError::Load(format!("{}: {}", path.display(), e)))?;
            CsvTable::from_reader(BufReader::new(file))
        }
        DataSource::Url(url) => {
            let response = reqwest::blocking::get(url.as_str())?.error_for_status()?;
            let body = response.bytes()?;
            log::debug!("Fetched {} bytes from {}", body.len(), url);
            CsvTable::from_reader(&body[..])
        }
        DataSource::Bytes { bytes, .. } => CsvTable::from_reader(bytes.as_slice()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_all_columns() {
        let csv = "Time (s),Channel 1 (V),Channel 2 (V)\n0.0,1.5,9\n0.1,1.6,9\n";
        let table = CsvTable::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.headers().len(), 3);
        assert_eq!(table.row_count(), 2);
        let volts: Vec<&str> = table.column("Channel 1 (V)").unwrap().collect();
        assert_eq!(volts, vec!["1.5", "1.6"]);
    }

    #[test]
    fn test_cells_are_trimmed_not_converted() {
        let csv = "a, b\n 1e3 , x \n";
        let table = CsvTable::from_reader(csv.as_bytes()).unwrap();
        let b: Vec<&str> = table.column("b").unwrap().collect();
        assert_eq!(b, vec!["x"]);
        let a: Vec<&str> = table.column("a").unwrap().collect();
        assert_eq!(a, vec!["1e3"]);
    }

    #[test]
    fn test_ragged_rows_are_load_errors() {
        let csv = "a,b\n1,2\n3\n";
        let err = CsvTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LpfError::Load(_)));
    }

    #[test]
    fn test_empty_input_is_load_error() {
        let err = CsvTable::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, LpfError::Load(_)));
    }

    #[test]
    fn test_missing_columns_reported_in_order() {
        let table = CsvTable::from_reader("x,y\n1,2\n".as_bytes()).unwrap();
        assert_eq!(
            table.missing_columns(&["Time (s)", "y", "Channel 1 (V)"]),
            vec!["Time (s)".to_string(), "Channel 1 (V)".to_string()]
        );
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let source = DataSource::Path(PathBuf::from("/definitely/not/here.csv"));
        assert!(matches!(load_table(&source), Err(LpfError::Load(_))));
    }

    #[test]
    fn test_bytes_source() {
        let source = DataSource::Bytes {
            name: "upload.csv".to_string(),
            bytes: b"t,v\n0,1\n".to_vec(),
        };
        let table = load_table(&source).unwrap();
        assert_eq!(table.row_count(), 1);
        assert!(source.has_csv_name());
    }

    #[test]
    fn test_source_parse() {
        assert!(matches!(
            DataSource::parse("https://example.com/data"),
            DataSource::Url(_)
        ));
        assert!(matches!(DataSource::parse("data/run.csv"), DataSource::Path(_)));
        assert!(!DataSource::parse("data/run.txt").has_csv_name());
        assert!(DataSource::parse("data/RUN.CSV").has_csv_name());
    }
}
