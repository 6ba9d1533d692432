use crate::{
    error::{AnimatorError, Result},
    models::Color,
    utils::{format_table_date, quarter_start, year_start},
};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fixed look of the chart: canvas size, axis ranges, colors and text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    /// `{year}` is replaced with the data year
    pub title_template: String,
    pub title_color: Color,
    pub y_label: String,
    pub value_range: (f64, f64),
    /// Height at which the `Q1`..`Q4` labels sit
    pub quarter_label_value: f64,
    pub quarter_label_color: Color,
    pub band_colors: [Color; 4],
    pub band_opacity: f64,
    pub pad_color: Color,
    /// Days of padding shown after the year end
    pub pad_days: i64,
    /// Line width in points
    pub line_width: f64,
    pub title_font_pt: f64,
    pub label_font_pt: f64,
    pub tick_font_pt: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            title_template: "Stock Price movements of State-Owned Banks (Indonesia {year})".to_string(),
            title_color: Color::rgb(0x0e, 0x24, 0x33),
            y_label: "Price (Rupiah)".to_string(),
            value_range: (3000.0, 8000.0),
            quarter_label_value: 7750.0,
            quarter_label_color: Color::rgb(0x4f, 0x4f, 0x4f),
            band_colors: [
                Color::rgb(0x3b, 0xaf, 0xda),
                Color::rgb(0xf3, 0xb0, 0xc3),
                Color::rgb(0xff, 0xa5, 0x00),
                Color::rgb(0x55, 0xcb, 0xcd),
            ],
            band_opacity: 0.2,
            pad_color: Color::rgb(0xee, 0xee, 0xee),
            pad_days: 19,
            line_width: 2.0,
            title_font_pt: 15.0,
            label_font_pt: 13.0,
            tick_font_pt: 10.0,
        }
    }
}

impl ChartStyle {
    pub fn title_for(&self, year: i32) -> String {
        self.title_template.replace("{year}", &year.to_string())
    }
}

/// Start dates of the four quarters plus the start of the following year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterBoundaries {
    pub starts: [NaiveDate; 4],
    pub year_end: NaiveDate,
}

impl QuarterBoundaries {
    /// Calendar quarters of `year`: Jan 1, Apr 1, Jul 1, Oct 1 and Jan 1 of the next year
    pub fn for_year(year: i32) -> Result<Self> {
        let start = |q| {
            quarter_start(year, q)
                .ok_or_else(|| AnimatorError::config(format!("year {} is out of range", year)))
        };
        let year_end = year_start(year + 1)
            .ok_or_else(|| AnimatorError::config(format!("year {} is out of range", year)))?;

        Self::new([start(1)?, start(2)?, start(3)?, start(4)?], year_end)
    }

    pub fn new(starts: [NaiveDate; 4], year_end: NaiveDate) -> Result<Self> {
        let boundaries = Self { starts, year_end };
        boundaries.validate()?;
        Ok(boundaries)
    }

    /// Boundaries must be strictly ascending
    pub fn validate(&self) -> Result<()> {
        let all = self.all();
        if let Some(pair) = all.windows(2).find(|w| w[0] >= w[1]) {
            return Err(AnimatorError::config(format!(
                "quarter boundaries must ascend, got {} before {}",
                format_table_date(pair[0]),
                format_table_date(pair[1])
            )));
        }
        Ok(())
    }

    pub fn year(&self) -> i32 {
        self.starts[0].year()
    }

    fn all(&self) -> [NaiveDate; 5] {
        [self.starts[0], self.starts[1], self.starts[2], self.starts[3], self.year_end]
    }

    /// Half-open `[start, end)` interval of each quarter, in quarter order
    pub fn intervals(&self) -> [(NaiveDate, NaiveDate); 4] {
        let all = self.all();
        [(all[0], all[1]), (all[1], all[2]), (all[2], all[3]), (all[3], all[4])]
    }
}

/// A shaded vertical band across the plot area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub color: Color,
    pub opacity: f64,
}

/// Fixed text placed in data coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub date: NaiveDate,
    pub value: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub min_value: f64,
    pub max_value: f64,
}

impl AxisLimits {
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Static chart decorations, computed once per scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decorations {
    pub title: String,
    pub y_label: String,
    /// Four quarter bands followed by the padding band
    pub bands: Vec<Band>,
    pub quarter_labels: Vec<Annotation>,
    pub limits: AxisLimits,
}

impl Decorations {
    pub fn build(quarters: &QuarterBoundaries, style: &ChartStyle) -> Result<Self> {
        quarters.validate()?;

        let pad_end = quarters.year_end + Duration::days(style.pad_days);
        let limits = AxisLimits {
            start: quarters.starts[0],
            end: pad_end,
            min_value: style.value_range.0,
            max_value: style.value_range.1,
        };

        let mut bands: Vec<Band> = quarters
            .intervals()
            .iter()
            .zip(style.band_colors.iter())
            .map(|((start, end), color)| Band {
                start: *start,
                end: *end,
                color: *color,
                opacity: style.band_opacity,
            })
            .collect();
        bands.push(Band {
            start: quarters.year_end,
            end: pad_end,
            color: style.pad_color,
            opacity: 1.0,
        });

        let quarter_labels = quarters
            .starts
            .iter()
            .enumerate()
            .map(|(i, start)| Annotation {
                text: format!("Q{}", i + 1),
                date: label_date(*start),
                value: style.quarter_label_value,
                color: style.quarter_label_color,
            })
            .collect();

        Ok(Self {
            title: style.title_for(quarters.year()),
            y_label: style.y_label.clone(),
            bands,
            quarter_labels,
            limits,
        })
    }

    /// The four quarter bands, without padding
    pub fn quarter_bands(&self) -> &[Band] {
        &self.bands[..self.bands.len().min(4)]
    }
}

/// Quarter labels sit on the 15th of the month after the quarter starts
fn label_date(quarter_start: NaiveDate) -> NaiveDate {
    quarter_start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.with_day(15))
        .unwrap_or(quarter_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_bands_partition_the_year() {
        for year in [2020, 2021, 2023, 2024] {
            let quarters = QuarterBoundaries::for_year(year).unwrap();
            let decorations = Decorations::build(&quarters, &ChartStyle::default()).unwrap();
            let bands = decorations.quarter_bands();

            assert_eq!(bands.len(), 4);
            assert_eq!(bands[0].start, ymd(year, 1, 1));
            assert_eq!(bands[3].end, ymd(year + 1, 1, 1));
            for pair in bands.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert!(pair[0].start < pair[0].end);
            }

            let days: i64 = bands.iter().map(|b| (b.end - b.start).num_days()).sum();
            let year_days = (ymd(year + 1, 1, 1) - ymd(year, 1, 1)).num_days();
            assert_eq!(days, year_days);
        }
    }

    #[test]
    fn test_axis_limits_and_padding() {
        let quarters = QuarterBoundaries::for_year(2021).unwrap();
        let decorations = Decorations::build(&quarters, &ChartStyle::default()).unwrap();

        assert_eq!(decorations.limits.start, ymd(2021, 1, 1));
        assert_eq!(decorations.limits.end, ymd(2022, 1, 20));
        assert_eq!(decorations.limits.span_days(), 384);
        assert_eq!(decorations.limits.min_value, 3000.0);
        assert_eq!(decorations.limits.max_value, 8000.0);

        let pad = decorations.bands.last().unwrap();
        assert_eq!(pad.start, ymd(2022, 1, 1));
        assert_eq!(pad.opacity, 1.0);
    }

    #[test]
    fn test_quarter_labels_and_title() {
        let quarters = QuarterBoundaries::for_year(2021).unwrap();
        let decorations = Decorations::build(&quarters, &ChartStyle::default()).unwrap();

        let dates: Vec<NaiveDate> = decorations.quarter_labels.iter().map(|a| a.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2021, 2, 15), ymd(2021, 5, 15), ymd(2021, 8, 15), ymd(2021, 11, 15)]
        );
        assert_eq!(decorations.quarter_labels[2].text, "Q3");
        assert_eq!(
            decorations.title,
            "Stock Price movements of State-Owned Banks (Indonesia 2021)"
        );
    }

    #[test]
    fn test_unordered_boundaries_are_config_error() {
        let err = QuarterBoundaries::new(
            [ymd(2021, 1, 1), ymd(2021, 7, 1), ymd(2021, 4, 1), ymd(2021, 10, 1)],
            ymd(2022, 1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, AnimatorError::Config(_)));
    }
}
