//! Builder pattern for configuring an animation run

use crate::animator::TimeSeriesAnimator;
use crate::error::{AnimatorError, Result};
use crate::models::{Color, ColorMap};
use crate::playback::{FramePresenter, PlaybackOptions};
use crate::scene::{ChartStyle, QuarterBoundaries, Scene};
use crate::services::{DataSource, ExportOptions, ExportReport, PlaybackMode};
use std::path::Path;
use std::time::Duration;

/// Builder for an animated line chart
///
/// Provides a fluent interface for choosing the data source, colors,
/// quarter boundaries and timing before building, playing or exporting.
///
/// # Example
/// ```rust,no_run
/// use pricereel::api::AnimationBuilder;
///
/// # async fn run() -> pricereel::error::Result<()> {
/// let report = AnimationBuilder::state_owned_banks("bank_wide.csv")
///     .with_interval_ms(80)
///     .export("banks.html")
///     .await?;
/// println!("{} frames written", report.frames);
/// # Ok(())
/// # }
/// ```
pub struct AnimationBuilder {
    source: Option<DataSource>,
    colors: ColorMap,
    quarters: Option<QuarterBoundaries>,
    style: ChartStyle,
    frame_interval: Duration,
    embed_limit_mb: f64,
    mode: PlaybackMode,
    repeat: bool,
}

impl AnimationBuilder {
    pub fn new() -> Self {
        let export = ExportOptions::default();
        Self {
            source: None,
            colors: ColorMap::new(),
            quarters: None,
            style: ChartStyle::default(),
            frame_interval: export.frame_interval,
            embed_limit_mb: export.embed_limit_mb,
            mode: export.mode,
            repeat: false,
        }
    }

    /// Three state-owned bank series with their default colors
    pub fn state_owned_banks(location: &str) -> Self {
        Self::new()
            .with_source(DataSource::from_location(location))
            .with_colors(ColorMap::state_owned_banks())
    }

    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_colors(mut self, colors: ColorMap) -> Self {
        self.colors = colors;
        self
    }

    /// Add or replace the color of one series
    pub fn with_series_color(mut self, series: &str, color: Color) -> Self {
        self.colors.insert(series, color);
        self
    }

    pub fn with_quarters(mut self, quarters: QuarterBoundaries) -> Self {
        self.quarters = Some(quarters);
        self
    }

    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn with_interval_ms(self, ms: u64) -> Self {
        self.with_interval(Duration::from_millis(ms))
    }

    pub fn with_embed_limit_mb(mut self, limit: f64) -> Self {
        self.embed_limit_mb = limit;
        self
    }

    pub fn with_mode(mut self, mode: PlaybackMode) -> Self {
        self.mode = mode;
        self
    }

    /// Restart live playback after the last frame
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            frame_interval: self.frame_interval,
            embed_limit_mb: self.embed_limit_mb,
            mode: self.mode,
        }
    }

    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            frame_interval: self.frame_interval,
            repeat: self.repeat,
        }
    }

    /// Load the source and build a scene, returning the animator that owns its lifecycle
    pub async fn build_scene(mut self) -> Result<(TimeSeriesAnimator, Scene)> {
        let source = self
            .source
            .take()
            .ok_or_else(|| AnimatorError::config("no data source configured"))?;

        let mut animator = TimeSeriesAnimator::with_style(self.style)
            .map_err(|e| AnimatorError::config(format!("cannot create animator: {}", e)))?;
        let table = animator.load(source).await?;
        let scene = animator.build_scene(table, &self.colors, self.quarters)?;
        Ok((animator, scene))
    }

    /// Build and export to a self-contained HTML file
    pub async fn export(self, path: impl AsRef<Path>) -> Result<ExportReport> {
        let options = self.export_options();
        let (mut animator, scene) = self.build_scene().await?;
        animator.export(scene, path.as_ref(), options)
    }

    /// Build and play on a presenter
    pub async fn play<P>(self, presenter: &mut P) -> Result<()>
    where
        P: FramePresenter + ?Sized,
    {
        let options = self.playback_options();
        let (mut animator, scene) = self.build_scene().await?;
        animator.play(scene, options, presenter).await
    }
}

impl Default for AnimationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
