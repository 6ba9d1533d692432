//! Lifecycle facade: load a table, build a scene, then play or export it once

use crate::{
    error::Result,
    models::{ColorMap, SeriesTable},
    playback::{FramePresenter, PlaybackOptions},
    scene::{ChartStyle, QuarterBoundaries, Scene},
    services::{CSVDataService, DataSource, ExportOptions, ExportReport},
    utils::{log_state_transition, Logger},
};
use chrono::Datelike;
use std::path::Path;

/// Lifecycle states of the animator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Unloaded,
    SceneBuilt,
    Playing,
    Exporting,
}

impl AnimatorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimatorState::Unloaded => "UNLOADED",
            AnimatorState::SceneBuilt => "SCENE_BUILT",
            AnimatorState::Playing => "PLAYING",
            AnimatorState::Exporting => "EXPORTING",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnimatorState::Playing | AnimatorState::Exporting)
    }
}

impl std::fmt::Display for AnimatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Renders an animated multi-series line chart from a wide-format table
#[derive(Debug)]
pub struct TimeSeriesAnimator {
    state: AnimatorState,
    csv: CSVDataService,
    style: ChartStyle,
    logger: Logger,
}

impl TimeSeriesAnimator {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_style(ChartStyle::default())
    }

    pub fn with_style(style: ChartStyle) -> anyhow::Result<Self> {
        Ok(Self {
            state: AnimatorState::Unloaded,
            csv: CSVDataService::new()?,
            style,
            logger: Logger::new("ANIMATOR"),
        })
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    fn transition(&mut self, to: AnimatorState, reason: &str) {
        log_state_transition(self.state.as_str(), to.as_str(), reason);
        self.state = to;
    }

    /// Read and date-sort a table. Does not change state.
    pub async fn load(&mut self, source: DataSource) -> Result<SeriesTable> {
        self.logger.info(&format!("Loading {}", source.describe()));
        self.csv.load(source).await
    }

    /// Build a scene from a table.
    ///
    /// Quarter boundaries default to the calendar quarters of the first record's year.
    pub fn build_scene(
        &mut self,
        table: SeriesTable,
        colors: &ColorMap,
        quarters: Option<QuarterBoundaries>,
    ) -> Result<Scene> {
        let quarters = match quarters {
            Some(quarters) => quarters,
            None => {
                let year = table
                    .date_range()
                    .map(|(first, _)| first.year())
                    .ok_or_else(|| {
                        crate::error::AnimatorError::config("cannot build a scene from an empty table")
                    })?;
                QuarterBoundaries::for_year(year)?
            }
        };

        let scene = Scene::build(table, colors, &quarters, &self.style)?;
        self.transition(
            AnimatorState::SceneBuilt,
            &format!("{} frames ready", scene.frame_count()),
        );
        Ok(scene)
    }

    /// Play a built scene on a presenter
    pub async fn play<P>(
        &mut self,
        scene: Scene,
        options: PlaybackOptions,
        presenter: &mut P,
    ) -> Result<()>
    where
        P: FramePresenter + ?Sized,
    {
        self.transition(AnimatorState::Playing, "play requested");
        let result = scene.play(options, presenter).await;
        if let Err(e) = &result {
            self.logger.error_with_error(&format!("Playback failed [{}]", e.kind()), e);
        }
        result
    }

    /// Export a built scene to a self-contained HTML file
    pub fn export(
        &mut self,
        scene: Scene,
        path: &Path,
        options: ExportOptions,
    ) -> Result<ExportReport> {
        self.transition(AnimatorState::Exporting, &format!("export to {}", path.display()));
        let result = scene.export(path, options);
        if let Err(e) = &result {
            self.logger.error_with_error(&format!("Export failed [{}]", e.kind()), e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnimatorError;
    use crate::scene::tests::bank_table;

    #[test]
    fn test_state_names() {
        assert_eq!(AnimatorState::SceneBuilt.to_string(), "SCENE_BUILT");
        assert!(AnimatorState::Exporting.is_terminal());
        assert!(!AnimatorState::SceneBuilt.is_terminal());
    }

    #[tokio::test]
    async fn test_lifecycle_load_build_export() {
        let csv = "Date,bbri,bbni,bmri\n2021-01-05,4300,6200,6500\n2021-01-04,4200,6100,6400\n";
        let mut animator = TimeSeriesAnimator::new().unwrap();
        assert_eq!(animator.state(), AnimatorState::Unloaded);

        let table = animator
            .load(DataSource::reader(std::io::Cursor::new(csv.as_bytes().to_vec())))
            .await
            .unwrap();
        assert_eq!(animator.state(), AnimatorState::Unloaded);

        let scene = animator
            .build_scene(table, &ColorMap::state_owned_banks(), None)
            .unwrap();
        assert_eq!(animator.state(), AnimatorState::SceneBuilt);
        assert_eq!(scene.decorations().limits.start.year(), 2021);

        let dir = tempfile::tempdir().unwrap();
        let report = animator
            .export(scene, &dir.path().join("out.html"), ExportOptions::default())
            .unwrap();
        assert_eq!(report.frames, 2);
        assert_eq!(animator.state(), AnimatorState::Exporting);
    }

    #[test]
    fn test_build_uses_data_year_for_quarters() {
        let mut animator = TimeSeriesAnimator::new().unwrap();
        let scene = animator
            .build_scene(bank_table(3), &ColorMap::state_owned_banks(), None)
            .unwrap();
        assert!(scene.decorations().title.ends_with("(Indonesia 2021)"));
    }

    #[test]
    fn test_debug_output_names_state_and_loader() {
        let animator = TimeSeriesAnimator::new().unwrap();
        let debug = format!("{:?}", animator);
        assert!(debug.contains("Unloaded"));
        assert!(debug.contains("CSVDataService"));
    }

    #[test]
    fn test_failed_build_keeps_state() {
        let mut animator = TimeSeriesAnimator::new().unwrap();
        let colors = ColorMap::from_specs([("bbri", "red")]).unwrap();
        let err = animator.build_scene(bank_table(3), &colors, None).unwrap_err();
        assert!(matches!(err, AnimatorError::Config(_)));
        assert_eq!(animator.state(), AnimatorState::Unloaded);
    }
}
