//! Timed frame-by-frame playback onto a display surface

use crate::{
    error::Result,
    scene::Scene,
    services::svg_data_uri,
    utils::{format_table_date, quarter_of},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// One rendered frame as handed to a presenter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEvent {
    pub frame: usize,
    pub total: usize,
    pub date: String,
    /// Overlay layer as an SVG data URI
    pub image: String,
    /// Number of elements the update touched
    pub changed: usize,
}

/// A surface that shows a playing animation
#[async_trait::async_trait]
pub trait FramePresenter: Send {
    /// Called once before the first frame with the static layer as an SVG data URI
    async fn show_background(&mut self, image: String) -> Result<()>;

    async fn show_frame(&mut self, event: FrameEvent) -> Result<()>;

    /// Called after the last frame of a non-repeating run
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackOptions {
    pub frame_interval: Duration,
    pub repeat: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            frame_interval: crate::services::DEFAULT_FRAME_INTERVAL,
            repeat: false,
        }
    }
}

impl Scene {
    /// Step through every frame at the configured interval, consuming the scene.
    ///
    /// With `repeat` set the sequence restarts from frame 0 after the last frame
    /// and only ends on error.
    pub async fn play<P>(mut self, options: PlaybackOptions, presenter: &mut P) -> Result<()>
    where
        P: FramePresenter + ?Sized,
    {
        let total = self.frame_count();
        self.logger().info(&format!(
            "▶️ Playing {} frames every {}ms{}",
            total,
            options.frame_interval.as_millis(),
            if options.repeat { " (repeating)" } else { "" }
        ));

        presenter
            .show_background(svg_data_uri(&self.render_background()?))
            .await?;

        // tokio rejects a zero period
        let period = options.frame_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut pass: u64 = 0;
        loop {
            pass += 1;
            let mut quarter = None;

            for frame in 0..total {
                ticker.tick().await;
                let changed = self.advance_frame(frame)?;

                let date = self.table().records()[frame].date;
                if quarter != Some(quarter_of(date)) {
                    quarter = Some(quarter_of(date));
                    self.logger().debug(&format!(
                        "Pass {}: entering Q{} at {}",
                        pass,
                        quarter_of(date),
                        format_table_date(date)
                    ));
                }

                presenter
                    .show_frame(FrameEvent {
                        frame,
                        total,
                        date: format_table_date(date),
                        image: svg_data_uri(&self.render_overlay()?),
                        changed: changed.len(),
                    })
                    .await?;
            }

            if !options.repeat {
                break;
            }
        }

        presenter.finish().await?;
        self.logger().info(&format!("⏹️ Playback finished after {} frames", total));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnimatorError;
    use crate::scene::tests::bank_scene;

    #[derive(Default)]
    struct RecordingPresenter {
        background: Option<String>,
        frames: Vec<FrameEvent>,
        finished: bool,
        stop_after: Option<usize>,
    }

    #[async_trait::async_trait]
    impl FramePresenter for RecordingPresenter {
        async fn show_background(&mut self, image: String) -> Result<()> {
            self.background = Some(image);
            Ok(())
        }

        async fn show_frame(&mut self, event: FrameEvent) -> Result<()> {
            self.frames.push(event);
            if self.stop_after.is_some_and(|limit| self.frames.len() >= limit) {
                return Err(AnimatorError::config("presenter closed"));
            }
            Ok(())
        }

        async fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn fast(repeat: bool) -> PlaybackOptions {
        PlaybackOptions {
            frame_interval: Duration::from_millis(1),
            repeat,
        }
    }

    #[tokio::test]
    async fn test_play_presents_every_frame_in_order() {
        let mut presenter = RecordingPresenter::default();
        bank_scene(12).play(fast(false), &mut presenter).await.unwrap();

        assert!(presenter.background.unwrap().starts_with("data:image/svg+xml;base64,"));
        assert_eq!(presenter.frames.len(), 12);
        assert!(presenter.frames.iter().enumerate().all(|(i, f)| f.frame == i && f.total == 12));
        assert_eq!(presenter.frames[0].date, "2021-01-04");
        assert_eq!(presenter.frames[0].changed, 6);
        assert!(presenter.finished);
    }

    #[tokio::test]
    async fn test_repeat_restarts_from_first_frame() {
        let mut presenter = RecordingPresenter {
            stop_after: Some(12),
            ..RecordingPresenter::default()
        };
        let err = bank_scene(5).play(fast(true), &mut presenter).await.unwrap_err();

        assert!(matches!(err, AnimatorError::Config(_)));
        let indices: Vec<usize> = presenter.frames.iter().map(|f| f.frame).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4, 0, 1]);
        assert!(!presenter.finished);
    }

    #[tokio::test]
    async fn test_zero_interval_does_not_panic() {
        let mut presenter = RecordingPresenter::default();
        let options = PlaybackOptions {
            frame_interval: Duration::ZERO,
            repeat: false,
        };
        bank_scene(3).play(options, &mut presenter).await.unwrap();
        assert_eq!(presenter.frames.len(), 3);
    }
}
