use super::{
    decorations::{AxisLimits, ChartStyle, Decorations},
    PlotPoint, SeriesTrack,
};
use crate::{
    error::{AnimatorError, Result},
    models::Color,
    utils::Logger,
};
use chrono::NaiveDate;
use plotters::coord::types::{Monthly, RangedCoordf64};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Pixels per typographic point at the 100 dpi the chart is laid out for
const PX_PER_PT: f64 = 100.0 / 72.0;

/// Outer margins plus label areas put the plot at 100/40/70/60 px from the left/right/top/bottom edges
const MARGIN_LEFT: u32 = 30;
const MARGIN_RIGHT: u32 = 40;
const MARGIN_TOP: u32 = 70;
const MARGIN_BOTTOM: u32 = 10;
const Y_LABEL_AREA: u32 = 70;
const X_LABEL_AREA: u32 = 50;

const FONT_FAMILY: &str = "sans-serif";

type PriceChart<'a, 'b> =
    ChartContext<'a, SVGBackend<'b>, Cartesian2d<Monthly<NaiveDate>, RangedCoordf64>>;

/// SVG drawing surface for one scene.
///
/// Acquired when the scene is built and released when the scene is dropped,
/// whichever way play or export ends. Both layers share one chart layout so
/// the overlay lines up pixel for pixel with the background.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    limits: AxisLimits,
    style: ChartStyle,
    logger: Logger,
}

impl Canvas {
    pub fn acquire(style: &ChartStyle, limits: AxisLimits) -> Self {
        let logger = Logger::new("CANVAS");
        logger.debug(&format!(
            "Acquired {}x{} canvas for {} to {}",
            style.width, style.height, limits.start, limits.end
        ));

        Self {
            width: style.width,
            height: style.height,
            limits,
            style: style.clone(),
            logger,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn chart<'a, 'b>(
        &self,
        root: &'a DrawingArea<SVGBackend<'b>, Shift>,
        frame: usize,
    ) -> Result<PriceChart<'a, 'b>> {
        ChartBuilder::on(root)
            .margin_left(MARGIN_LEFT)
            .margin_right(MARGIN_RIGHT)
            .margin_top(MARGIN_TOP)
            .margin_bottom(MARGIN_BOTTOM)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(
                (self.limits.start..self.limits.end).monthly(),
                self.limits.min_value..self.limits.max_value,
            )
            .map_err(draw_error(frame))
    }

    /// Static layer: background, bands, ticks, quarter labels, frame, title and axis label
    pub fn render_background(&self, decorations: &Decorations) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(draw_error(0))?;
            let mut chart = self.chart(&root, 0)?;
            let (min, max) = (self.limits.min_value, self.limits.max_value);

            chart
                .draw_series(decorations.bands.iter().map(|band| {
                    Rectangle::new(
                        [(band.start, max), (band.end, min)],
                        rgb(band.color).mix(band.opacity).filled(),
                    )
                }))
                .map_err(draw_error(0))?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(16)
                .y_labels(11)
                .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m").to_string())
                .y_label_formatter(&|value: &f64| format!("{:.0}", value))
                .label_style((FONT_FAMILY, self.style.tick_font_pt * PX_PER_PT))
                .y_desc(decorations.y_label.as_str())
                .axis_desc_style((FONT_FAMILY, self.style.label_font_pt * PX_PER_PT))
                .draw()
                .map_err(draw_error(0))?;

            let label_font = (FONT_FAMILY, self.style.label_font_pt * PX_PER_PT).into_font();
            chart
                .draw_series(decorations.quarter_labels.iter().map(|annotation| {
                    Text::new(
                        annotation.text.clone(),
                        (annotation.date, annotation.value),
                        label_font.color(&rgb(annotation.color)),
                    )
                }))
                .map_err(draw_error(0))?;

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(self.limits.start, max), (self.limits.end, min)],
                    BLACK.stroke_width(1),
                )))
                .map_err(draw_error(0))?;

            let title_style = (FONT_FAMILY, self.style.title_font_pt * PX_PER_PT)
                .into_font()
                .style(FontStyle::Bold)
                .color(&rgb(self.style.title_color))
                .pos(Pos::new(HPos::Center, VPos::Center));
            let plot_left = (MARGIN_LEFT + Y_LABEL_AREA) as i32;
            let plot_right = self.width as i32 - MARGIN_RIGHT as i32;
            root.draw(&Text::new(
                decorations.title.clone(),
                ((plot_left + plot_right) / 2, MARGIN_TOP as i32 / 2),
                title_style,
            ))
            .map_err(draw_error(0))?;

            root.present().map_err(draw_error(0))?;
        }
        Ok(svg)
    }

    /// Dynamic layer: polylines and labels on a transparent background
    pub fn render_overlay(&self, tracks: &[SeriesTrack], frame: usize) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            let mut chart = self.chart(&root, frame)?;

            let stroke = (self.style.line_width * PX_PER_PT).round().max(1.0) as u32;
            for track in tracks {
                let style = rgb(track.color).stroke_width(stroke);
                chart
                    .draw_series(
                        line_runs(&track.polyline)
                            .into_iter()
                            .map(|run| PathElement::new(run, style)),
                    )
                    .map_err(draw_error(frame))?;
            }

            let label_font = (FONT_FAMILY, self.style.label_font_pt * PX_PER_PT).into_font();
            chart
                .draw_series(tracks.iter().filter_map(|track| {
                    let value = track.label.anchor.value?;
                    Some(Text::new(
                        track.label.text.clone(),
                        (track.label.anchor.date, value),
                        label_font.color(&rgb(track.color)),
                    ))
                }))
                .map_err(draw_error(frame))?;

            root.present().map_err(draw_error(frame))?;
        }
        Ok(svg)
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        self.logger.debug("Released canvas");
    }
}

/// Contiguous stretches of a polyline; a missing value ends the current stretch
pub(crate) fn line_runs(polyline: &[PlotPoint]) -> Vec<Vec<(NaiveDate, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for point in polyline {
        match point.value {
            Some(value) => current.push((point.date, value)),
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }

    runs
}

fn rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn draw_error<E>(frame: usize) -> impl Fn(DrawingAreaErrorKind<E>) -> AnimatorError
where
    E: std::error::Error + Send + Sync,
{
    move |e| AnimatorError::render(frame, format!("drawing failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{decorations::QuarterBoundaries, Label};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn canvas_and_decorations() -> (Canvas, Decorations) {
        let style = ChartStyle::default();
        let quarters = QuarterBoundaries::for_year(2021).unwrap();
        let decorations = Decorations::build(&quarters, &style).unwrap();
        (Canvas::acquire(&style, decorations.limits), decorations)
    }

    fn bbri_track(polyline: Vec<PlotPoint>, anchor: PlotPoint) -> SeriesTrack {
        SeriesTrack {
            id: "bbri".to_string(),
            color: Color::rgb(0x64, 0x03, 0x03),
            series_index: 0,
            polyline,
            label: Label {
                text: "BBRI".to_string(),
                anchor,
            },
        }
    }

    #[test]
    fn test_plot_area_placement() {
        let (canvas, _) = canvas_and_decorations();
        let mut svg = String::new();
        let root = SVGBackend::with_string(&mut svg, (canvas.width(), canvas.height()))
            .into_drawing_area();
        let chart = canvas.chart(&root, 0).unwrap();

        let (left, bottom) = chart.backend_coord(&(ymd(2021, 1, 1), 3000.0));
        let (right, top) = chart.backend_coord(&(ymd(2022, 1, 20), 8000.0));
        assert!((left - 100).abs() <= 1, "left edge at {}", left);
        assert!((right - 1160).abs() <= 1, "right edge at {}", right);
        assert!((top - 70).abs() <= 1, "top edge at {}", top);
        assert!((bottom - 740).abs() <= 1, "bottom edge at {}", bottom);

        let (_, q_label) = chart.backend_coord(&(ymd(2021, 1, 1), 7750.0));
        let (_, mid) = chart.backend_coord(&(ymd(2021, 1, 1), 7000.0));
        assert!(q_label < mid);
    }

    #[test]
    fn test_background_contains_decorations() {
        let (canvas, decorations) = canvas_and_decorations();
        let svg = canvas.render_background(&decorations).unwrap();
        let lower = svg.to_lowercase();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Stock Price movements of State-Owned Banks (Indonesia 2021)"));
        assert!(svg.contains("Price (Rupiah)"));
        assert!(svg.contains("Q4"));
        assert!(svg.contains("2021-07"));
        assert!(svg.contains("5000"));
        assert!(lower.contains("#3bafda"));
        assert!(lower.contains("#eeeeee"));
    }

    #[test]
    fn test_line_runs_split_at_gaps() {
        let polyline = vec![
            PlotPoint::new(ymd(2021, 1, 4), Some(4000.0)),
            PlotPoint::new(ymd(2021, 1, 5), Some(4100.0)),
            PlotPoint::new(ymd(2021, 1, 6), None),
            PlotPoint::new(ymd(2021, 1, 7), Some(4200.0)),
            PlotPoint::new(ymd(2021, 1, 8), Some(4150.0)),
            PlotPoint::new(ymd(2021, 1, 11), None),
            PlotPoint::new(ymd(2021, 1, 12), Some(4300.0)),
        ];

        let runs = line_runs(&polyline);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(ymd(2021, 1, 4), 4000.0), (ymd(2021, 1, 5), 4100.0)]);
        assert_eq!(runs[1], vec![(ymd(2021, 1, 7), 4200.0), (ymd(2021, 1, 8), 4150.0)]);
        assert!(line_runs(&[]).is_empty());
    }

    #[test]
    fn test_overlay_breaks_line_at_missing_values() {
        let (canvas, _) = canvas_and_decorations();
        let track = bbri_track(
            vec![
                PlotPoint::new(ymd(2021, 1, 4), Some(4000.0)),
                PlotPoint::new(ymd(2021, 1, 5), Some(4100.0)),
                PlotPoint::new(ymd(2021, 1, 6), None),
                PlotPoint::new(ymd(2021, 1, 7), Some(4200.0)),
                PlotPoint::new(ymd(2021, 1, 8), Some(4250.0)),
            ],
            PlotPoint::new(ymd(2021, 1, 11), Some(4250.0)),
        );

        let svg = canvas.render_overlay(std::slice::from_ref(&track), 5).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("BBRI"));
        assert!(svg.to_lowercase().contains("#640303"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_overlay_hides_label_on_gap() {
        let (canvas, _) = canvas_and_decorations();
        let track = bbri_track(Vec::new(), PlotPoint::new(ymd(2021, 1, 4), None));

        let svg = canvas.render_overlay(std::slice::from_ref(&track), 0).unwrap();
        assert!(!svg.contains("BBRI"));
        assert!(!svg.contains("<polyline"));
    }
}
