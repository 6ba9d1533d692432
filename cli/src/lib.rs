//! # pricereel - animated price charts from wide-format tables
//!
//! Reads a dated table with one column per series and renders it as an
//! animated line chart that grows one row per frame:
//! - Quarter bands, labels, title and axes drawn once
//! - Per-series lines and end labels updated every frame
//! - Live playback onto any [`playback::FramePresenter`]
//! - Export to a self-contained HTML player
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pricereel::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut animator = TimeSeriesAnimator::new()?;
//!     let table = animator.load(DataSource::path("bank_wide.csv")).await?;
//!     let scene = animator.build_scene(table, &ColorMap::state_owned_banks(), None)?;
//!     let report = animator.export(scene, "banks.html".as_ref(), ExportOptions::default())?;
//!     println!("{} frames written", report.frames);
//!     Ok(())
//! }
//! ```

pub mod animator;
pub mod api;
pub mod error;
pub mod models;
pub mod playback;
pub mod scene;
pub mod services;
pub mod templates;
pub mod utils;

// Prelude for convenient imports
pub mod prelude {
    //! Import this module to get the most commonly used types:
    //! ```rust
    //! use pricereel::prelude::*;
    //! ```

    pub use crate::animator::{AnimatorState, TimeSeriesAnimator};
    pub use crate::error::{AnimatorError, Result};
    pub use crate::models::{Cell, Color, ColorMap, SeriesTable};
    pub use crate::playback::{FrameEvent, FramePresenter, PlaybackOptions};
    pub use crate::scene::{ChartStyle, QuarterBoundaries, Scene};
    pub use crate::services::{DataSource, ExportOptions, ExportReport, PlaybackMode};
}

pub use utils::{init_logger, Logger, Timer};
