use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Date-only layouts accepted in the `Date` column, tried in order
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time layouts accepted in the `Date` column; the time part is dropped
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a table date cell into a calendar date
pub fn parse_table_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let value = raw.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }

    Err(anyhow::anyhow!("unrecognised date '{}'", value))
}

/// Format a date the way it is shown in logs and tick labels (YYYY-MM-DD)
pub fn format_table_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// January 1st of the given year
pub fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// First day of the given calendar quarter (1..=4)
pub fn quarter_start(year: i32, quarter: u32) -> Option<NaiveDate> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
}

/// Calendar quarter (1..=4) containing the date
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Format duration for logging
pub fn format_duration(duration_ms: f64) -> String {
    if duration_ms < 1000.0 {
        format!("{:.1}ms", duration_ms)
    } else if duration_ms < 60000.0 {
        format!("{:.1}s", duration_ms / 1000.0)
    } else {
        let minutes = (duration_ms / 60000.0).floor();
        let seconds = (duration_ms % 60000.0) / 1000.0;
        format!("{}m{:.1}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_table_date_formats() {
        assert_eq!(parse_table_date("2021-03-04").unwrap(), ymd(2021, 3, 4));
        assert_eq!(parse_table_date("2021/03/04").unwrap(), ymd(2021, 3, 4));
        assert_eq!(parse_table_date("03/04/2021").unwrap(), ymd(2021, 3, 4));
        assert_eq!(parse_table_date(" 2021-03-04 09:30:00 ").unwrap(), ymd(2021, 3, 4));
        assert_eq!(parse_table_date("2021-03-04T00:00:00+07:00").unwrap(), ymd(2021, 3, 4));
    }

    #[test]
    fn test_parse_table_date_rejects_garbage() {
        assert!(parse_table_date("yesterday").is_err());
        assert!(parse_table_date("2021-13-01").is_err());
        assert!(parse_table_date("").is_err());
    }

    #[test]
    fn test_quarter_helpers() {
        assert_eq!(quarter_start(2021, 1), Some(ymd(2021, 1, 1)));
        assert_eq!(quarter_start(2021, 4), Some(ymd(2021, 10, 1)));
        assert_eq!(quarter_start(2021, 5), None);
        assert_eq!(quarter_of(ymd(2021, 6, 30)), 2);
        assert_eq!(quarter_of(ymd(2021, 7, 1)), 3);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(12.34), "12.3ms");
        assert_eq!(format_duration(1500.0), "1.5s");
        assert_eq!(format_duration(61000.0), "1m1.0s");
    }
}
