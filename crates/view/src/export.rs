//! Export serialization (CSV/JSON) and the download side effect.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

// ─────────────────────────────────────────────────────────────────────────────
// Formats and columns
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8",
            Self::Json => "application/json",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl core::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.extension())
    }
}

/// One output column: header label plus cell accessor (`None` is an empty cell).
pub struct ExportColumn<R> {
    pub label: &'static str,
    pub accessor: fn(&R) -> Option<String>,
}

impl<R> ExportColumn<R> {
    pub const fn new(label: &'static str, accessor: fn(&R) -> Option<String>) -> Self {
        Self { label, accessor }
    }

    pub fn cell(&self, record: &R) -> String {
        (self.accessor)(record).unwrap_or_default()
    }
}

impl<R> Clone for ExportColumn<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ExportColumn<R> {}

impl<R> core::fmt::Debug for ExportColumn<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExportColumn").field("label", &self.label).finish()
    }
}

/// What to export and how to name the file.
#[derive(Debug, Clone)]
pub struct ExportSpec<R> {
    pub format: ExportFormat,
    pub columns: Vec<ExportColumn<R>>,
    pub filename_prefix: String,
}

impl<R> ExportSpec<R> {
    pub fn new(
        format: ExportFormat,
        filename_prefix: impl Into<String>,
        columns: Vec<ExportColumn<R>>,
    ) -> Self {
        Self {
            format,
            columns,
            filename_prefix: filename_prefix.into(),
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn filename(&self, date: NaiveDate) -> String {
        export_filename(&self.filename_prefix, date, self.format)
    }

    /// Serialize `records` in the configured format.
    pub fn render(&self, records: &[R]) -> Result<Vec<u8>, ExportError> {
        match self.format {
            ExportFormat::Csv => Ok(to_csv(records, &self.columns).into_bytes()),
            ExportFormat::Json => Ok(to_json(records, &self.columns)?.into_bytes()),
            ExportFormat::Xlsx => Err(ExportError::UnsupportedFormat(self.format)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export format `{0}` is not supported")]
    UnsupportedFormat(ExportFormat),

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed csv at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },

    #[error("failed to download `{filename}`")]
    Download {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// CSV
// ─────────────────────────────────────────────────────────────────────────────

/// Quoted CSV: every cell wrapped in `"`, embedded quotes doubled, rows joined
/// with `\n`, no trailing newline.
pub fn to_csv<R>(records: &[R], columns: &[ExportColumn<R>]) -> String {
    let header = columns
        .iter()
        .map(|c| quote(c.label))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header);
    for record in records {
        let row = columns
            .iter()
            .map(|c| quote(&c.cell(record)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Read CSV text back into rows of cells (RFC 4180, `\n` or `\r\n` endings).
///
/// Quoted cells may contain commas, doubled quotes and newlines. Blank lines
/// are skipped.
pub fn parse_csv(input: &str) -> Result<Vec<Vec<String>>, ExportError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    cell.push(c);
                }
                _ => cell.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                row.push(std::mem::take(&mut cell));
                after_quote = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if !(row.is_empty() && cell.is_empty() && !after_quote) {
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                }
                after_quote = false;
                line += 1;
            }
            '"' if cell.is_empty() && !after_quote => in_quotes = true,
            _ if after_quote => {
                return Err(ExportError::MalformedCsv {
                    line,
                    reason: format!("unexpected `{c}` after closing quote"),
                });
            }
            _ => cell.push(c),
        }
    }

    if in_quotes {
        return Err(ExportError::MalformedCsv {
            line,
            reason: "unterminated quoted cell".to_string(),
        });
    }
    if !(row.is_empty() && cell.is_empty() && !after_quote) {
        row.push(cell);
        rows.push(row);
    }
    Ok(rows)
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON
// ─────────────────────────────────────────────────────────────────────────────

/// Pretty JSON array of objects keyed by column label; empty cells are `null`.
pub fn to_json<R>(records: &[R], columns: &[ExportColumn<R>]) -> Result<String, ExportError> {
    let rows: Vec<Value> = records
        .iter()
        .map(|record| {
            let object: Map<String, Value> = columns
                .iter()
                .map(|c| {
                    let value = (c.accessor)(record).map_or(Value::Null, Value::String);
                    (c.label.to_string(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Download
// ─────────────────────────────────────────────────────────────────────────────

/// `{prefix}-{YYYY-MM-DD}.{extension}`.
pub fn export_filename(prefix: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!("{prefix}-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Where exported bytes go (a browser download, a file, a test buffer).
pub trait DownloadSink {
    fn download(&self, bytes: &[u8], filename: &str, mime_type: &str) -> Result<(), ExportError>;
}

/// Writes downloads into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn download(&self, bytes: &[u8], filename: &str, _mime_type: &str) -> Result<(), ExportError> {
        let to_err = |source| ExportError::Download {
            filename: filename.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(to_err)?;
        std::fs::write(self.dir.join(filename), bytes).map_err(to_err)?;
        Ok(())
    }
}

/// Render `records` per `spec` and hand them to `sink`. Returns the filename.
pub fn export<R, S>(
    records: &[R],
    spec: &ExportSpec<R>,
    sink: &S,
    date: NaiveDate,
) -> Result<String, ExportError>
where
    S: DownloadSink + ?Sized,
{
    let bytes = spec.render(records)?;
    let filename = spec.filename(date);
    sink.download(&bytes, &filename, spec.format.mime_type())?;
    info!(rows = records.len(), filename = %filename, format = %spec.format, "export downloaded");
    Ok(filename)
}
