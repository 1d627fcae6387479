use crate::error::{Result, SurveyError};
use csv::ReaderBuilder;
use encoding_rs::{Encoding, EUC_KR, UTF_8};
use std::{fs, path::Path};
use tracing::{debug, info};

/// Candidate encodings, tried in order. Statistics-portal exports arrive
/// either as UTF-8 (sometimes with a BOM) or as the legacy Korean code page;
/// `encoding_rs`'s EUC-KR covers the cp949 extensions.
const CANDIDATE_ENCODINGS: &[&Encoding] = &[UTF_8, EUC_KR];

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column names from the header row, as the file claims them.
    pub headers: Vec<String>,
    /// Data records, one `Vec<String>` per row. Field counts may vary; the
    /// reader is flexible and the cleaner indexes defensively.
    pub rows: Vec<Vec<String>>,
}

/// Diagnostics surfaced alongside a successful load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub encoding: &'static str,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug)]
pub struct Loaded {
    pub table: RawTable,
    pub report: LoadReport,
}

/// Read a survey export from disk, detecting its encoding.
pub fn load_survey_csv(path: &Path) -> Result<Loaded> {
    let bytes = fs::read(path)?;
    load_survey_bytes(&bytes, &path.display().to_string())
}

/// Decode and parse raw export bytes. `origin` names the source in errors
/// and logs (usually the file path).
pub fn load_survey_bytes(bytes: &[u8], origin: &str) -> Result<Loaded> {
    let (text, encoding) = decode_bytes(bytes).ok_or_else(|| SurveyError::Decode {
        origin: origin.to_string(),
        attempted: CANDIDATE_ENCODINGS.iter().map(|e| e.name()).collect(),
    })?;

    let table = parse_table(&text)?;
    let report = LoadReport {
        encoding,
        rows: table.rows.len(),
        columns: table.headers.len(),
    };
    info!(
        origin,
        encoding = report.encoding,
        rows = report.rows,
        columns = report.columns,
        "loaded survey export"
    );
    Ok(Loaded { table, report })
}

/// Try each candidate encoding in order; first decode without errors wins.
fn decode_bytes(bytes: &[u8]) -> Option<(String, &'static str)> {
    for encoding in CANDIDATE_ENCODINGS {
        let (text, used, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return Some((text.into_owned(), used.name()));
        }
        debug!(
            encoding = encoding.name(),
            "decode produced errors, trying next candidate"
        );
    }
    None
}

fn parse_table(text: &str) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let fields: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() {
            headers = fields;
        } else {
            rows.push(fields);
        }
    }

    Ok(RawTable { headers, rows })
}
