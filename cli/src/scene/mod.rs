//! Chart scene: static decorations, per-series tracks and the frame update

pub mod canvas;
pub mod decorations;

pub use canvas::Canvas;
pub use decorations::{AxisLimits, Band, ChartStyle, Decorations, QuarterBoundaries};

use crate::{
    error::{AnimatorError, Result},
    models::{Cell, Color, ColorMap, SeriesTable},
    utils::{format_table_date, Logger},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A point in data coordinates; `None` marks a gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl PlotPoint {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub anchor: PlotPoint,
}

/// Mutable drawing state of one series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTrack {
    pub id: String,
    pub color: Color,
    pub(crate) series_index: usize,
    pub polyline: Vec<PlotPoint>,
    pub label: Label,
}

/// Handle of a visual element touched by a frame update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangedElement {
    Line(usize),
    Label(usize),
}

/// A built chart, ready to be played or exported once
#[derive(Debug)]
pub struct Scene {
    table: SeriesTable,
    decorations: Decorations,
    tracks: Vec<SeriesTrack>,
    canvas: Canvas,
    current_frame: Option<usize>,
    logger: Logger,
}

impl Scene {
    /// Build decorations and per-series state and acquire the canvas
    pub fn build(
        table: SeriesTable,
        colors: &ColorMap,
        quarters: &QuarterBoundaries,
        style: &ChartStyle,
    ) -> Result<Self> {
        if table.is_empty() {
            return Err(AnimatorError::config("cannot build a scene from an empty table"));
        }
        if !table.is_sorted() {
            return Err(AnimatorError::config("table records are not sorted by date"));
        }
        colors.check_covers(table.series())?;

        let decorations = Decorations::build(quarters, style)?;

        let first_date = table.records()[0].date;
        let tracks = table
            .series()
            .iter()
            .enumerate()
            .map(|(index, id)| SeriesTrack {
                id: id.clone(),
                color: colors.get(id).unwrap_or(Color::rgb(0, 0, 0)),
                series_index: index,
                polyline: Vec::new(),
                label: Label {
                    text: id.to_uppercase(),
                    anchor: PlotPoint::new(first_date, initial_value(table.cell(index, 0))),
                },
            })
            .collect();

        let canvas = Canvas::acquire(style, decorations.limits);

        let logger = Logger::new("SCENE");
        logger.info(&format!(
            "Built scene '{}': {} series, {} frames",
            decorations.title,
            table.series().len(),
            table.len()
        ));
        if first_date.year() != quarters.year() {
            logger.warn(&format!(
                "Data starts {} but quarter bands are for {}",
                format_table_date(first_date),
                quarters.year()
            ));
        }

        Ok(Self {
            table,
            decorations,
            tracks,
            canvas,
            current_frame: None,
            logger,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.table.len()
    }

    pub fn current_frame(&self) -> Option<usize> {
        self.current_frame
    }

    pub fn table(&self) -> &SeriesTable {
        &self.table
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn tracks(&self) -> &[SeriesTrack] {
        &self.tracks
    }

    pub fn track(&self, id: &str) -> Option<&SeriesTrack> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Show the frame at `frame_index`.
    ///
    /// Each polyline becomes the points of rows before `frame_index` and each
    /// label moves to the row at `frame_index`. Returns the elements that
    /// changed: all lines, then all labels.
    pub fn advance_frame(&mut self, frame_index: usize) -> Result<Vec<ChangedElement>> {
        if frame_index >= self.table.len() {
            return Err(AnimatorError::render(
                frame_index,
                format!("frame index outside 0..{}", self.table.len()),
            ));
        }

        for track in &mut self.tracks {
            if track.polyline.len() > frame_index {
                track.polyline.truncate(frame_index);
            } else {
                for row in track.polyline.len()..frame_index {
                    let point = resolve_point(&self.table, track, row, frame_index)?;
                    track.polyline.push(point);
                }
            }
            track.label.anchor = resolve_point(&self.table, track, frame_index, frame_index)?;
        }

        self.current_frame = Some(frame_index);
        if frame_index > 0 && frame_index % 50 == 0 {
            crate::log_frame_progress!("SCENE", frame_index, self.table.len());
        }

        let count = self.tracks.len();
        Ok((0..count)
            .map(ChangedElement::Line)
            .chain((0..count).map(ChangedElement::Label))
            .collect())
    }

    /// Canvas width and height in pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    /// Static layer as an SVG document
    pub fn render_background(&self) -> Result<String> {
        self.canvas.render_background(&self.decorations)
    }

    /// Current lines and labels as an SVG document
    pub fn render_overlay(&self) -> Result<String> {
        self.canvas
            .render_overlay(&self.tracks, self.current_frame.unwrap_or(0))
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }
}

fn initial_value(cell: Option<&Cell>) -> Option<f64> {
    match cell {
        Some(Cell::Value(value)) => Some(*value),
        _ => None,
    }
}

fn resolve_point(
    table: &SeriesTable,
    track: &SeriesTrack,
    row: usize,
    frame_index: usize,
) -> Result<PlotPoint> {
    let record = &table.records()[row];
    let value = match record.cells.get(track.series_index) {
        Some(Cell::Value(value)) => Some(*value),
        Some(Cell::Missing) | None => None,
        Some(Cell::Malformed(raw)) => {
            return Err(AnimatorError::render(
                frame_index,
                format!(
                    "series '{}' has non-numeric value '{}' at row {} ({})",
                    track.id,
                    raw,
                    row,
                    format_table_date(record.date)
                ),
            ))
        }
    };
    Ok(PlotPoint::new(record.date, value))
}
