use ahash::AHashMap;

use crate::error::{ExplorerError, Result};
use crate::grouping::{GroupedCounts, KeyValue};

/// Decimal places kept in displayed percentages.
pub const PERCENT_PRECISION: i32 = 2;

/// Whether chart sizes encode raw counts or per-group percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMode {
    #[default]
    Absolute,
    Relative,
}

impl ValueMode {
    pub fn is_relative(&self) -> bool {
        matches!(self, ValueMode::Relative)
    }

    /// Name of the column a chart should size its marks by.
    pub fn size_column(&self) -> &'static str {
        match self {
            ValueMode::Absolute => "Count",
            ValueMode::Relative => "Percentage",
        }
    }
}

/// Rounds to `PERCENT_PRECISION` decimals, halves to even (`0.125` -> `0.12`).
pub fn round_percent(value: f64) -> f64 {
    let scale = 10f64.powi(PERCENT_PRECISION);
    (value * scale).round_ties_even() / scale
}

/// Unrounded `100 * value / sum(values)` for each value, or `None` when the
/// values sum to zero.
pub fn shares(values: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return None;
    }
    Some(values.iter().map(|v| 100.0 * v / total).collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelativeRow {
    pub key: Vec<KeyValue>,
    pub count: u64,
    /// Unrounded share of the outer group; `None` when the group totals zero.
    pub share: Option<f64>,
}

impl RelativeRow {
    /// Share rounded for display.
    pub fn percentage(&self) -> Option<f64> {
        self.share.map(round_percent)
    }
}

/// Grouped counts with a percentage-of-outer-group column.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeCounts {
    columns: Vec<&'static str>,
    outer: usize,
    rows: Vec<RelativeRow>,
}

impl RelativeCounts {
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn outer_column(&self) -> &'static str {
        self.columns[self.outer]
    }

    pub fn rows(&self) -> &[RelativeRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows sharing the given outer key, in key order.
    pub fn group<'a>(&'a self, outer: &'a KeyValue) -> impl Iterator<Item = &'a RelativeRow> + 'a {
        let idx = self.outer;
        self.rows.iter().filter(move |row| &row.key[idx] == outer)
    }
}

/// Adds a percentage-of-group column to `grouped`, where groups are the rows
/// sharing the value of `outer_column`.
pub fn to_relative(grouped: &GroupedCounts, outer_column: &str) -> Result<RelativeCounts> {
    let outer = grouped
        .column_index(outer_column)
        .ok_or_else(|| ExplorerError::UnknownColumn(outer_column.to_string()))?;

    let mut totals: AHashMap<&KeyValue, u64> = AHashMap::new();
    for row in grouped.rows() {
        *totals.entry(&row.key[outer]).or_default() += row.count;
    }

    let rows = grouped
        .rows()
        .iter()
        .map(|row| {
            let total = totals.get(&row.key[outer]).copied().unwrap_or(0);
            let share = (total > 0).then(|| 100.0 * row.count as f64 / total as f64);
            RelativeRow {
                key: row.key.clone(),
                count: row.count,
                share,
            }
        })
        .collect();

    Ok(RelativeCounts {
        columns: grouped.columns().to_vec(),
        outer,
        rows,
    })
}
