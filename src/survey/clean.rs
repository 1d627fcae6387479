use super::load::RawTable;
use crate::error::{Result, SurveyError};
use crate::quarter::Quarter;
use tracing::debug;

/// The five income-quintile labels a survey row may carry, lowest fifth
/// first. Rows with anything else (the `전체` overall-average footer, blank
/// spacers) are not data.
pub const QUINTILE_LABELS: [&str; 5] = ["1분위", "2분위", "3분위", "4분위", "5분위"];

fn is_quintile_label(value: &str) -> bool {
    QUINTILE_LABELS.contains(&value)
}

/// One surviving survey row. `values` is parallel to
/// [`CleanedTable::quarters`] and still holds the raw cell text; numeric
/// parsing happens at reshape time so a bad cell only costs one data point.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRow {
    pub quintile: String,
    pub category: String,
    pub values: Vec<String>,
}

/// The tidy wide table: only quintile rows, only canonical quarter columns,
/// no all-empty columns. Immutable once built; share it behind an `Arc` for
/// repeated reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    pub quarters: Vec<Quarter>,
    pub rows: Vec<CleanedRow>,
}

impl CleanedTable {
    /// Distinct quintile values in first-seen order, for a selection widget.
    pub fn quintile_values(&self) -> Vec<String> {
        distinct(self.rows.iter().map(|r| r.quintile.as_str()))
    }

    /// Distinct category values in first-seen order, for a multi-select.
    pub fn category_values(&self) -> Vec<String> {
        distinct(self.rows.iter().map(|r| r.category.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.iter().any(|s: &String| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// Clean a raw export into the tidy wide table.
///
/// Steps, in order: drop a repeated header row, keep only quintile-labelled
/// rows, keep only trailing columns that parse as a quarter and hold at
/// least one non-empty cell. Column names are normalized to `YYYYQn` as a
/// side effect of the structured parse, so running the cleaner over its own
/// canonical output changes nothing.
pub fn clean_table(raw: &RawTable) -> Result<CleanedTable> {
    if raw.headers.len() < 2 {
        return Err(SurveyError::MalformedTable {
            columns: raw.headers.len(),
        });
    }

    // Portal exports sometimes repeat the header as the first data record.
    let mut rows: &[Vec<String>] = &raw.rows;
    if let Some(first) = rows.first() {
        if first.first().map(|s| s.trim()) == Some(raw.headers[0].trim()) {
            debug!("dropping repeated header row");
            rows = &rows[1..];
        }
    }

    // Row filter: exact match against the five known labels, after trimming.
    // This also drops the overall-average footer.
    let kept: Vec<&Vec<String>> = rows
        .iter()
        .filter(|r| is_quintile_label(r.first().map(|s| s.trim()).unwrap_or("")))
        .collect();

    // Column allowlist: must parse as a quarter, and at least one kept row
    // must have a value in it. Non-quarter metadata columns (remarks, notes)
    // are dropped here even when populated.
    let mut quarters: Vec<Quarter> = Vec::new();
    let mut indices: Vec<usize> = Vec::new();
    for (idx, name) in raw.headers.iter().enumerate().skip(2) {
        let Some(quarter) = Quarter::parse_column(name) else {
            debug!(column = %name, "dropping non-quarter column");
            continue;
        };
        let populated = kept
            .iter()
            .any(|r| r.get(idx).map(|v| !v.trim().is_empty()).unwrap_or(false));
        if !populated {
            debug!(column = %quarter, "dropping empty quarter column");
            continue;
        }
        quarters.push(quarter);
        indices.push(idx);
    }

    let rows = kept
        .into_iter()
        .map(|r| CleanedRow {
            quintile: r.first().map(|s| s.trim().to_string()).unwrap_or_default(),
            category: r.get(1).map(|s| s.trim().to_string()).unwrap_or_default(),
            values: indices
                .iter()
                .map(|&i| r.get(i).map(|s| s.trim().to_string()).unwrap_or_default())
                .collect(),
        })
        .collect();

    Ok(CleanedTable { quarters, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn sample() -> RawTable {
        raw(
            &["소득분위", "항목", "2020/1", "2020/2", "비고"],
            &[
                // header repeated as a data record
                &["소득분위", "항목", "2020/1", "2020/2", "비고"],
                &["1분위", "소비지출", "100", "200", "주석"],
                &["2분위", "소비지출", "300", "400", "주석"],
                &["전체", "소비지출", "500", "600", "주석"],
            ],
        )
    }

    #[test]
    fn drops_repeated_header_row() {
        let table = clean_table(&sample()).unwrap();
        assert_eq!(table.rows[0].quintile, "1분위");
        assert_eq!(table.rows[0].values, vec!["100", "200"]);
    }

    #[test]
    fn excludes_overall_average_row() {
        let table = clean_table(&sample()).unwrap();
        assert!(table.rows.iter().all(|r| r.quintile != "전체"));
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn excludes_populated_non_quarter_column() {
        let table = clean_table(&sample()).unwrap();
        assert_eq!(
            table.quarters.iter().map(Quarter::to_string).collect::<Vec<_>>(),
            vec!["2020Q1", "2020Q2"]
        );
    }

    #[test]
    fn drops_entirely_empty_quarter_column() {
        let table = clean_table(&raw(
            &["소득분위", "항목", "2020/1", "2020/2"],
            &[
                &["1분위", "소비지출", "100", ""],
                &["2분위", "소비지출", "300", " "],
            ],
        ))
        .unwrap();
        assert_eq!(table.quarters.len(), 1);
        assert_eq!(table.rows[0].values, vec!["100"]);
    }

    #[test]
    fn keeps_column_populated_in_any_row() {
        let table = clean_table(&raw(
            &["소득분위", "항목", "2020/1"],
            &[&["1분위", "소비지출", ""], &["2분위", "소비지출", "300"]],
        ))
        .unwrap();
        assert_eq!(table.quarters.len(), 1);
    }

    #[test]
    fn trims_quintile_labels() {
        let table = clean_table(&raw(
            &["소득분위", "항목", "2020/1"],
            &[&[" 1분위 ", "소비지출", "100"]],
        ))
        .unwrap();
        assert_eq!(table.rows[0].quintile, "1분위");
    }

    #[test]
    fn fewer_than_two_columns_is_malformed() {
        let err = clean_table(&raw(&["소득분위"], &[])).unwrap_err();
        assert!(matches!(err, SurveyError::MalformedTable { columns: 1 }));
    }

    #[test]
    fn cleaning_canonical_output_is_a_fixed_point() {
        let cleaned = clean_table(&sample()).unwrap();

        // serialize back to raw form with canonical headers
        let mut headers = vec!["소득분위".to_string(), "항목".to_string()];
        headers.extend(cleaned.quarters.iter().map(Quarter::to_string));
        let rows = cleaned
            .rows
            .iter()
            .map(|r| {
                let mut row = vec![r.quintile.clone(), r.category.clone()];
                row.extend(r.values.iter().cloned());
                row
            })
            .collect();

        let again = clean_table(&RawTable { headers, rows }).unwrap();
        assert_eq!(again, cleaned);
    }

    #[test]
    fn selection_lists_are_distinct_in_first_seen_order() {
        let table = clean_table(&raw(
            &["소득분위", "항목", "2020/1"],
            &[
                &["1분위", "소비지출", "100"],
                &["1분위", "교통", "10"],
                &["2분위", "소비지출", "200"],
            ],
        ))
        .unwrap();
        assert_eq!(table.quintile_values(), vec!["1분위", "2분위"]);
        assert_eq!(table.category_values(), vec!["소비지출", "교통"]);
    }
}
