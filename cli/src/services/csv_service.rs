use crate::{
    error::{AnimatorError, Result},
    models::{Cell, Record, SeriesTable},
    utils::{format_table_date, parse_table_date, Logger, Timer},
};
use std::{fs::File, io::Read, path::PathBuf};

/// Header of the date column in the wide table
pub const DATE_COLUMN: &str = "Date";

/// Where a wide-format table is read from
pub enum DataSource {
    Path(PathBuf),
    Reader(Box<dyn Read + Send>),
    Url(String),
}

impl DataSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DataSource::Path(path.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        DataSource::Reader(Box::new(reader))
    }

    pub fn url(url: impl Into<String>) -> Self {
        DataSource::Url(url.into())
    }

    /// Treat `http://` and `https://` strings as URLs, everything else as a file path
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::url(location)
        } else {
            DataSource::path(location)
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Path(path) => path.display().to_string(),
            DataSource::Reader(_) => "<stream>".to_string(),
            DataSource::Url(url) => url.clone(),
        }
    }
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataSource({})", self.describe())
    }
}

/// Loads wide-format CSV tables into a date-sorted [`SeriesTable`]
#[derive(Debug)]
pub struct CSVDataService {
    client: reqwest::Client,
    logger: Logger,
}

impl CSVDataService {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            logger: Logger::new("CSV_SERVICE"),
        })
    }

    /// Load a table from any source
    pub async fn load(&self, source: DataSource) -> Result<SeriesTable> {
        let description = source.describe();
        let timer = Timer::start(&format!("load {}", description));

        let table = match source {
            DataSource::Path(path) => {
                let file = File::open(&path).map_err(|e| {
                    AnimatorError::parse(format!("cannot read {}: {}", path.display(), e))
                })?;
                parse_wide_csv(file)?
            }
            DataSource::Reader(reader) => parse_wide_csv(reader)?,
            DataSource::Url(url) => {
                let content = self.fetch(&url).await?;
                parse_wide_csv(content.as_bytes())?
            }
        };

        self.log_loaded(&description, &table);
        timer.log_elapsed("CSV_SERVICE");
        Ok(table)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let now = chrono::Utc::now();
        self.logger.info(&format!(
            "🌐 [FETCH_CSV] [{}] Downloading: {}",
            now.format("%Y-%m-%d %H:%M:%S UTC"),
            url
        ));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AnimatorError::parse(format!("cannot fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AnimatorError::parse(format!(
                "HTTP error {} for {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AnimatorError::parse(format!("cannot read body of {}: {}", url, e)))
    }

    fn log_loaded(&self, description: &str, table: &SeriesTable) {
        let range = table
            .date_range()
            .map(|(first, last)| format!("{} to {}", format_table_date(first), format_table_date(last)))
            .unwrap_or_else(|| "empty".to_string());

        self.logger.info(&format!(
            "✅ Loaded {}: {} records, series [{}], {}",
            description,
            table.len(),
            table.series().join(", "),
            range
        ));

        for (series, count) in table.series().iter().zip(table.malformed_counts()) {
            if count > 0 {
                self.logger.warn(&format!(
                    "Series {} has {} non-numeric cells; frames that reach them will fail",
                    series, count
                ));
            }
        }
    }
}

/// Parse wide-format CSV: a `Date` column plus one numeric column per series.
///
/// Numeric cells are kept as [`Cell`]s and only checked when a frame renders them.
pub fn parse_wide_csv<R: Read>(input: R) -> Result<SeriesTable> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AnimatorError::parse(format!("cannot read header row: {}", e)))?
        .clone();

    let date_index = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(DATE_COLUMN))
        .ok_or_else(|| AnimatorError::parse(format!("missing '{}' column", DATE_COLUMN)))?;

    let series: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_index)
        .map(|(_, h)| h.to_string())
        .collect();

    if series.is_empty() {
        return Err(AnimatorError::parse("no series columns next to the date column"));
    }

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = result.map_err(|e| AnimatorError::parse(format!("line {}: {}", line, e)))?;

        let raw_date = record.get(date_index).unwrap_or_default();
        let date = parse_table_date(raw_date)
            .map_err(|e| AnimatorError::parse(format!("line {}: {}", line, e)))?;

        let cells = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_index)
            .map(|(_, raw)| Cell::parse(raw))
            .collect();

        records.push(Record::new(date, cells));
    }

    Ok(SeriesTable::new(series, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    const SAMPLE: &str = "Date,bbri,bbni,bmri\n\
        2021-01-05,4300,6200,6500\n\
        2021-01-04,4200,6100,6400\n\
        2021-01-06,4350,,6550\n";

    #[test]
    fn test_parse_wide_csv_sorts_by_date() {
        let table = parse_wide_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.series(), &["bbri", "bbni", "bmri"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.date_at(0), NaiveDate::from_ymd_opt(2021, 1, 4));
        assert_eq!(table.cell(0, 0), Some(&Cell::Value(4200.0)));
        assert_eq!(table.cell(1, 2), Some(&Cell::Missing));
    }

    #[test]
    fn test_date_column_may_be_anywhere() {
        let csv = "bbri,date\n4200,2021-01-04\n";
        let table = parse_wide_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.series(), &["bbri"]);
        assert_eq!(table.cell(0, 0), Some(&Cell::Value(4200.0)));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let csv = "Date,bbri\n2021-01-04,4200\nnot-a-date,4300\n";
        let err = parse_wide_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AnimatorError::Parse(ref m) if m.contains("line 3")));
    }

    #[test]
    fn test_missing_date_column_is_parse_error() {
        let err = parse_wide_csv("Day,bbri\n2021-01-04,4200\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AnimatorError::Parse(_)));
    }

    #[test]
    fn test_no_series_columns_is_parse_error() {
        let err = parse_wide_csv("Date\n2021-01-04\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AnimatorError::Parse(_)));
    }

    #[test]
    fn test_malformed_numbers_load_without_error() {
        let csv = "Date,bbri\n2021-01-04,abc\n";
        let table = parse_wide_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.cell(0, 0), Some(&Cell::Malformed("abc".to_string())));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let csv = "Date,bbri,bmri\n2021-01-04,4200\n";
        let err = parse_wide_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AnimatorError::Parse(_)));
    }

    #[tokio::test]
    async fn test_load_from_path_and_reader() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let service = CSVDataService::new().unwrap();
        let from_path = service.load(DataSource::path(file.path())).await.unwrap();
        let from_reader = service
            .load(DataSource::reader(std::io::Cursor::new(SAMPLE.as_bytes().to_vec())))
            .await
            .unwrap();

        assert_eq!(from_path, from_reader);
    }

    #[tokio::test]
    async fn test_unreadable_path_is_parse_error() {
        let service = CSVDataService::new().unwrap();
        let err = service
            .load(DataSource::path("/definitely/not/here.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnimatorError::Parse(_)));
    }

    #[test]
    fn test_from_location() {
        assert!(matches!(DataSource::from_location("https://x/y.csv"), DataSource::Url(_)));
        assert!(matches!(DataSource::from_location("bank_wide.csv"), DataSource::Path(_)));
    }
}
