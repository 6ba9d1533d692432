use crate::{
    error::{AnimatorError, Result},
    scene::Scene,
    templates::{render_template, EXPORT_PAGE_TEMPLATE},
    utils::{Logger, Timer},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use html_escape::encode_double_quoted_attribute;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Default ceiling for the embedded animation, in megabytes
pub const DEFAULT_EMBED_LIMIT_MB: f64 = 100.0;

/// Default delay between frames
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// What the exported player does when it reaches the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    #[default]
    Once,
    Loop,
    Reflect,
}

impl PlaybackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackMode::Once => "once",
            PlaybackMode::Loop => "loop",
            PlaybackMode::Reflect => "reflect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub frame_interval: Duration,
    pub embed_limit_mb: f64,
    pub mode: PlaybackMode,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            embed_limit_mb: DEFAULT_EMBED_LIMIT_MB,
            mode: PlaybackMode::Once,
        }
    }
}

impl ExportOptions {
    pub fn embed_limit_bytes(&self) -> usize {
        (self.embed_limit_mb * 1024.0 * 1024.0) as usize
    }
}

/// Summary of a written animation file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub frames: usize,
    pub embedded_bytes: usize,
    pub bytes_written: usize,
}

/// Base64 `data:` URI for an SVG document
pub fn svg_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Captures every frame of a scene into one self-contained HTML file
pub struct AnimationExporter {
    options: ExportOptions,
    logger: Logger,
}

impl AnimationExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            logger: Logger::new("EXPORT"),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Render and write the animation, consuming the scene
    pub fn export(&self, mut scene: Scene, path: &Path) -> Result<ExportReport> {
        let timer = Timer::start("export");
        let frames = scene.frame_count();

        let (document, embedded_bytes) = self.render_document(&mut scene)?;

        fs::write(path, document.as_bytes()).map_err(|source| AnimatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.logger.info(&format!(
            "💾 Wrote {} frames to {} ({:.2} MB embedded, {:.2} MB file)",
            frames,
            path.display(),
            embedded_bytes as f64 / (1024.0 * 1024.0),
            document.len() as f64 / (1024.0 * 1024.0)
        ));
        timer.log_elapsed("EXPORT");

        Ok(ExportReport {
            path: path.to_path_buf(),
            frames,
            embedded_bytes,
            bytes_written: document.len(),
        })
    }

    /// Build the HTML document and return it with the embedded image size.
    ///
    /// Fails with a resource error as soon as the embedded size passes the limit.
    pub fn render_document(&self, scene: &mut Scene) -> Result<(String, usize)> {
        let limit = self.options.embed_limit_bytes();
        let total = scene.frame_count();

        let background = svg_data_uri(&scene.render_background()?);
        let mut embedded = background.len();
        self.check_limit(embedded, 0, total, limit)?;

        let mut frames = Vec::with_capacity(total);
        for frame_index in 0..total {
            scene.advance_frame(frame_index)?;
            let frame = svg_data_uri(&scene.render_overlay()?);
            embedded += frame.len();
            self.check_limit(embedded, frame_index + 1, total, limit)?;
            frames.push(frame);
            crate::log_frame_progress!("EXPORT", frame_index + 1, total);
        }

        let frames_json = serde_json::to_string(&frames)
            .map_err(|e| AnimatorError::render(total, format!("cannot encode frames: {}", e)))?;

        let id = format!("pricereel-{}", uuid::Uuid::new_v4().simple());
        let title = encode_double_quoted_attribute(&scene.decorations().title).to_string();
        let (width, height) = scene.canvas_size();
        let (width, height) = (width.to_string(), height.to_string());
        let interval_ms = self.options.frame_interval.as_millis().to_string();
        let checked = |mode: PlaybackMode| {
            if self.options.mode == mode {
                " checked"
            } else {
                ""
            }
        };

        let document = render_template(
            EXPORT_PAGE_TEMPLATE,
            &[
                ("ID", id.as_str()),
                ("TITLE", title.as_str()),
                ("WIDTH", width.as_str()),
                ("HEIGHT", height.as_str()),
                ("FRAME_COUNT", total.to_string().as_str()),
                ("LAST_FRAME", total.saturating_sub(1).to_string().as_str()),
                ("INTERVAL_MS", interval_ms.as_str()),
                ("ONCE_CHECKED", checked(PlaybackMode::Once)),
                ("LOOP_CHECKED", checked(PlaybackMode::Loop)),
                ("REFLECT_CHECKED", checked(PlaybackMode::Reflect)),
                ("BACKGROUND", background.as_str()),
                ("FRAMES", frames_json.as_str()),
            ],
        );

        Ok((document, embedded))
    }

    fn check_limit(&self, embedded: usize, encoded: usize, total: usize, limit: usize) -> Result<()> {
        if embedded > limit {
            self.logger.error(&format!(
                "Embedded size {} bytes passed the {} byte limit after {}/{} frames",
                embedded, limit, encoded, total
            ));
            return Err(AnimatorError::Resource {
                frames_encoded: encoded,
                total_frames: total,
                size_bytes: embedded,
                limit_bytes: limit,
            });
        }
        Ok(())
    }
}

impl Scene {
    /// Export every frame to a self-contained HTML file at `path`
    pub fn export(self, path: &Path, options: ExportOptions) -> Result<ExportReport> {
        self.logger().info(&format!("Exporting {} frames", self.frame_count()));
        AnimationExporter::new(options).export(self, path)
    }
}
