use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single numeric cell of the wide table, kept unparsed until a frame needs it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Value(f64),
    /// Empty, NaN or infinite cell, drawn as a gap
    Missing,
    /// Non-numeric text; fails at render time
    Malformed(String),
}

impl Cell {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("nan") {
            return Cell::Missing;
        }
        match value.parse::<f64>() {
            Ok(number) if !number.is_finite() => Cell::Missing,
            Ok(number) => Cell::Value(number),
            Err(_) => Cell::Malformed(value.to_string()),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Cell::Malformed(_))
    }
}

/// One row of the table: a date and one cell per series column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub cells: Vec<Cell>,
}

impl Record {
    pub fn new(date: NaiveDate, cells: Vec<Cell>) -> Self {
        Self { date, cells }
    }
}

/// Wide-format time series table: `Date` plus one column per series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    series: Vec<String>,
    records: Vec<Record>,
}

impl SeriesTable {
    /// Build a table, sorting records ascending by date.
    ///
    /// The sort is stable so rows sharing a date keep their file order.
    pub fn new(series: Vec<String>, mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| a.date.cmp(&b.date));
        Self { series, records }
    }

    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn series_index(&self, id: &str) -> Option<usize> {
        self.series.iter().position(|s| s == id)
    }

    pub fn date_at(&self, row: usize) -> Option<NaiveDate> {
        self.records.get(row).map(|r| r.date)
    }

    pub fn cell(&self, series: usize, row: usize) -> Option<&Cell> {
        self.records.get(row).and_then(|r| r.cells.get(series))
    }

    /// First and last date, if any records exist
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.records.windows(2).all(|w| w[0].date <= w[1].date)
    }

    /// Number of malformed cells per series, in series order
    pub fn malformed_counts(&self) -> Vec<usize> {
        (0..self.series.len())
            .map(|s| {
                self.records
                    .iter()
                    .filter(|r| r.cells.get(s).is_some_and(Cell::is_malformed))
                    .count()
            })
            .collect()
    }
}
