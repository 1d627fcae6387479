use super::clean::CleanedTable;
use crate::quarter::Quarter;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// One long-form observation: (quintile, category, quarter) → value.
/// `value` is `None` when the cell was empty or failed numeric parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    pub quintile: String,
    pub category: String,
    pub quarter: Quarter,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Parse a survey cell as a number. Exports use `,` thousands separators;
/// empty or malformed cells become missing values, never errors.
pub fn parse_cell(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Narrow the table to one quintile and a category subset, pivoted long.
///
/// Emits one record per (matched row, quarter column), rows in table order,
/// quarters ascending. A quintile absent from the table yields an empty
/// sequence; unknown categories simply match nothing.
pub fn reshape(table: &CleanedTable, quintile: &str, categories: &[String]) -> Vec<LongRecord> {
    let wanted: HashSet<&str> = categories.iter().map(String::as_str).collect();

    // quarters ascending regardless of the file's column order
    let mut order: Vec<usize> = (0..table.quarters.len()).collect();
    order.sort_by_key(|&i| table.quarters[i]);

    let mut records = Vec::new();
    for row in &table.rows {
        if row.quintile != quintile || !wanted.contains(row.category.as_str()) {
            continue;
        }
        for &i in &order {
            let quarter = table.quarters[i];
            records.push(LongRecord {
                quintile: row.quintile.clone(),
                category: row.category.clone(),
                quarter,
                date: quarter.start_date(),
                value: row.values.get(i).map(String::as_str).and_then(parse_cell),
            });
        }
    }

    if records.is_empty() {
        debug!(quintile, ?categories, "selection matched no rows");
    }
    records
}
