//! Untyped CSV tables.
//!
//! Exports arrive without a declared schema, so every cell is kept as text and
//! columns are looked up by header name when a metric needs them. Numeric
//! coercion happens at the point of use through [`Table::numeric_column`].

use crate::error::{DashboardError, DashboardResult, InvalidAmount};
use crate::source::SourceKind;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Cell values treated as missing rather than as malformed numbers.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table in memory. Short rows are padded with empty cells.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Open the export for `kind` at `path`. Header whitespace is trimmed.
    pub fn from_path(kind: SourceKind, path: &Path) -> DashboardResult<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DashboardError::SourceNotFound {
                table: kind.display_name().to_string(),
                path: path.to_path_buf(),
            },
            _ => DashboardError::Io(e),
        })?;

        let table = Self::from_reader(kind.display_name(), file)?;
        debug!(
            table = %kind,
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "Loaded CSV export"
        );
        Ok(table)
    }

    /// Parse CSV with a header row from any reader.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> DashboardResult<Self> {
        let csv_err = |source: csv::Error| DashboardError::Csv {
            table: name.to_string(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(csv_err)?;
            if record.len() > headers.len() {
                return Err(DashboardError::RaggedRow {
                    table: name.to_string(),
                    row,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        let mut table = Self::new(name, headers, rows);
        table.normalize_headers();
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trim surrounding whitespace (and a stray byte-order mark) from every header.
    pub fn normalize_headers(&mut self) {
        for header in &mut self.headers {
            let trimmed = header.trim_start_matches('\u{feff}').trim();
            if trimmed.len() != header.len() {
                *header = trimmed.to_string();
            }
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// First header, in file order, accepted by `predicate`.
    pub fn find_column<F>(&self, predicate: F) -> Option<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.headers
            .iter()
            .map(String::as_str)
            .find(|h| predicate(h))
    }

    /// Raw text of one column.
    pub fn column(&self, name: &str) -> DashboardResult<Vec<&str>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DashboardError::missing_column(&self.name, name))?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// One column coerced to numbers. Currency symbols and thousands separators
    /// are stripped; empty and NA cells become `None`.
    pub fn numeric_column(&self, name: &str) -> DashboardResult<Vec<Option<f64>>> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, text)| {
                parse_amount(text).map_err(|_| DashboardError::InvalidNumber {
                    table: self.name.clone(),
                    column: name.to_string(),
                    row,
                    value: text.to_string(),
                })
            })
            .collect()
    }
}

/// True for cells a spreadsheet export uses to mean "no value".
pub fn is_null(text: &str) -> bool {
    NULL_TOKENS.contains(&text.trim())
}

/// Parse a spend-style value such as `$1,204.50`.
///
/// Returns `Ok(None)` for missing values so sums can skip them. Infinite
/// values are rejected.
pub fn parse_amount(text: &str) -> Result<Option<f64>, InvalidAmount> {
    if is_null(text) {
        return Ok(None);
    }
    let cleaned: String = text.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    let value: f64 = cleaned
        .trim()
        .parse()
        .map_err(|_| InvalidAmount(text.to_string()))?;
    if value.is_nan() {
        Ok(None)
    } else if value.is_infinite() {
        Err(InvalidAmount(text.to_string()))
    } else {
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ADS: &str =
        " Campaign ,Cost ,Conversions\nBrand,\"$1,200.50\",4\nRetarget,$80,0\nDisplay,,2\n";

    #[test]
    fn test_headers_are_trimmed() {
        let table = Table::from_reader("Google Ads", ADS.as_bytes()).unwrap();
        assert_eq!(table.headers(), &["Campaign", "Cost", "Conversions"]);
        assert_eq!(table.len(), 3);
        assert!(table.has_column("Cost"));
    }

    #[test]
    fn test_numeric_column_strips_currency() {
        let table = Table::from_reader("Google Ads", ADS.as_bytes()).unwrap();
        let cost = table.numeric_column("Cost").unwrap();
        assert_eq!(cost, vec![Some(1200.5), Some(80.0), None]);
    }

    #[test]
    fn test_numeric_column_rejects_garbage() {
        let table = Table::from_reader("Meta Ads", "Spend\n12\nabc\n".as_bytes()).unwrap();
        let err = table.numeric_column("Spend").unwrap_err();
        match err {
            DashboardError::InvalidNumber { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let table = Table::from_reader("CRM appointments", "Name\nA\n".as_bytes()).unwrap();
        assert!(matches!(
            table.column("Lead Status Type"),
            Err(DashboardError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_find_column_uses_file_order() {
        let table =
            Table::from_reader("Meta Ads", "Ad Set,Campaign name,Ad name\nx,y,z\n".as_bytes())
                .unwrap();
        let found = table.find_column(|h| {
            let lower = h.to_lowercase();
            lower.contains("campaign") || lower.contains("ad name")
        });
        assert_eq!(found, Some("Campaign name"));
    }

    #[test]
    fn test_short_rows_padded_long_rows_rejected() {
        let table = Table::from_reader("Churn summary", "a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.rows()[0], vec!["1", "2", ""]);

        let err = Table::from_reader("Churn summary", "a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::RaggedRow { found: 3, .. }));
    }

    #[test]
    fn test_parse_amount_null_tokens() {
        assert_eq!(parse_amount("  ").unwrap(), None);
        assert_eq!(parse_amount("NaN").unwrap(), None);
        assert_eq!(parse_amount("N/A").unwrap(), None);
        assert_eq!(parse_amount("-$5.25").unwrap(), Some(-5.25));
        assert!(parse_amount("12 USD").is_err());
    }

    #[test]
    fn test_parse_amount_rejects_infinity() {
        assert_eq!(parse_amount("inf"), Err(InvalidAmount("inf".to_string())));
        assert!(parse_amount("-Infinity").is_err());
        assert!(parse_amount("$1e400").is_err());

        let table = Table::from_reader("Google Ads", "Cost\n$5\ninfinity\n".as_bytes()).unwrap();
        assert!(matches!(
            table.numeric_column("Cost"),
            Err(DashboardError::InvalidNumber { row: 1, .. })
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            Table::from_path(SourceKind::Clusters, &dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::SourceNotFound { .. }));
        assert!(err.to_string().contains("Clustered leads"));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Cluster,UTM Source\n1,google\n2,facebook\n").unwrap();
        let table = Table::from_path(SourceKind::Clusters, file.path()).unwrap();
        assert_eq!(table.name(), "Clustered leads");
        assert_eq!(table.column("UTM Source").unwrap(), vec!["google", "facebook"]);
    }
}
