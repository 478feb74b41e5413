//! Loading of question records from a Fatebook CSV export.
//!
//! Rows are read positionally. A header that differs from
//! [`EXPECTED_HEADERS`] is reported but does not stop the load, while a row
//! whose timestamps or score cannot be parsed aborts it.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::timestamp::parse_timestamp;

/// Column layout of the export this tool was written against.
pub const EXPECTED_HEADERS: [&str; 17] = [
    "Question title",
    "Multiple choice option",
    "Forecast created by",
    "Forecast (scale = 0-1)",
    "Forecast created at",
    "Question created by",
    "Question created at",
    "Question resolve by",
    "Resolution",
    "Resolved at",
    "Your Brier score for this question",
    "Your relative Brier score for this question",
    "Question notes",
    "Question shared with",
    "Question shared publicly",
    "Question comments",
    "Question tags",
];

pub const TITLE: usize = 0;
pub const CREATED_AT: usize = 6;
pub const RESOLUTION: usize = 8;
pub const RESOLVED_AT: usize = 9;
pub const BRIER_SCORE: usize = 10;

/// Resolution value written for questions resolved as ambiguous.
pub const AMBIGUOUS_RESOLUTION: &str = "AMBIGUOUS";

/// A resolved question: when it was asked, when it resolved, and its Brier score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Record {
    pub created_at: DateTime<Utc>,
    pub resolved_at: DateTime<Utc>,
    pub score: f64,
}

/// What to do with questions resolved as ambiguous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousPolicy {
    Keep,
    #[default]
    Drop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub ambiguous: AmbiguousPolicy,
}

/// Row counts collected during a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub unresolved: usize,
    pub ambiguous: usize,
    pub duplicates: usize,
    pub kept: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    /// Set when the header did not match the loader's schema.
    pub schema_drift: bool,
    pub stats: LoadStats,
}

pub struct Loader {
    schema: Vec<String>,
    options: LoadOptions,
}

impl Loader {
    pub fn new<S: Into<String>>(schema: impl IntoIterator<Item = S>, options: LoadOptions) -> Self {
        Self {
            schema: schema.into_iter().map(Into::into).collect(),
            options,
        }
    }

    /// A loader for the Fatebook export layout.
    pub fn fatebook(options: LoadOptions) -> Self {
        Self::new(EXPECTED_HEADERS, options)
    }

    /// Opens and loads the CSV export at `path`.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load_path(&self, path: &Path) -> Result<LoadOutcome, LoadError> {
        let file = File::open(path)?;
        self.load_reader(file)
    }

    /// Loads an export from any reader. The first row is the header.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<LoadOutcome, LoadError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = rdr.headers()?.clone();
        self.load_rows(&header, rdr.records())
    }

    /// Filters, deduplicates and parses raw rows into records.
    ///
    /// Rows are dropped, in order, when the resolution is empty, when it is
    /// ambiguous and the options say so, or when `(title, created at)` has
    /// already been seen. The first occurrence of a question wins.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MalformedRow`] for a row that is too short or
    /// whose timestamps or score do not parse, and [`LoadError::Csv`] when
    /// the row iterator fails. Nothing is returned for a partial load.
    pub fn load_rows<I>(&self, header: &StringRecord, rows: I) -> Result<LoadOutcome, LoadError>
    where
        I: IntoIterator<Item = Result<StringRecord, csv::Error>>,
    {
        let schema_drift = !header.iter().eq(self.schema.iter().map(String::as_str));
        if schema_drift {
            warn!(
                expected_columns = self.schema.len(),
                found_columns = header.len(),
                "CSV headers have changed since this program was written, data may be parsed incorrectly"
            );
        }

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut records = Vec::new();
        let mut stats = LoadStats::default();

        for (idx, row) in rows.into_iter().enumerate() {
            let row = row?;
            // Header is line 1.
            let line = row
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);
            stats.rows_read += 1;

            let resolution = field(&row, RESOLUTION, line)?.trim();
            if resolution.is_empty() {
                debug!(line, "Skipping unresolved question");
                stats.unresolved += 1;
                continue;
            }

            if self.options.ambiguous == AmbiguousPolicy::Drop
                && resolution.eq_ignore_ascii_case(AMBIGUOUS_RESOLUTION)
            {
                debug!(line, "Skipping ambiguous question");
                stats.ambiguous += 1;
                continue;
            }

            let title = field(&row, TITLE, line)?;
            let created_raw = field(&row, CREATED_AT, line)?;
            if !seen.insert((title.to_string(), created_raw.to_string())) {
                debug!(line, title, "Skipping duplicate question");
                stats.duplicates += 1;
                continue;
            }

            records.push(parse_record(&row, line)?);
            stats.kept += 1;
        }

        info!(
            rows_read = stats.rows_read,
            unresolved = stats.unresolved,
            ambiguous = stats.ambiguous,
            duplicates = stats.duplicates,
            kept = stats.kept,
            schema_drift,
            "Export loaded"
        );

        Ok(LoadOutcome {
            records,
            schema_drift,
            stats,
        })
    }
}

fn column_name(idx: usize) -> &'static str {
    EXPECTED_HEADERS.get(idx).copied().unwrap_or("unknown")
}

fn field(row: &StringRecord, idx: usize, line: u64) -> Result<&str, LoadError> {
    row.get(idx).ok_or_else(|| LoadError::MalformedRow {
        line,
        column: column_name(idx),
        value: String::new(),
        reason: format!("row has {} columns", row.len()),
    })
}

fn parse_time_field(row: &StringRecord, idx: usize, line: u64) -> Result<DateTime<Utc>, LoadError> {
    let raw = field(row, idx, line)?;
    parse_timestamp(raw).map_err(|e| LoadError::MalformedRow {
        line,
        column: column_name(idx),
        value: raw.to_string(),
        reason: e.reason,
    })
}

fn parse_record(row: &StringRecord, line: u64) -> Result<Record, LoadError> {
    let created_at = parse_time_field(row, CREATED_AT, line)?;
    let resolved_at = parse_time_field(row, RESOLVED_AT, line)?;

    let raw_score = field(row, BRIER_SCORE, line)?;
    let malformed_score = |reason: String| LoadError::MalformedRow {
        line,
        column: column_name(BRIER_SCORE),
        value: raw_score.to_string(),
        reason,
    };
    let score: f64 = raw_score
        .trim()
        .parse()
        .map_err(|e: std::num::ParseFloatError| malformed_score(e.to_string()))?;
    if !score.is_finite() {
        return Err(malformed_score("score is not finite".to_string()));
    }

    Ok(Record {
        created_at,
        resolved_at,
        score,
    })
}
