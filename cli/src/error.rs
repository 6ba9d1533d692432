use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, building, playing or exporting an animation.
///
/// Every variant is fatal to the run: callers surface it and stop.
#[derive(Debug, Error)]
pub enum AnimatorError {
    /// The source could not be read or its header/date column could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Color map, quarter boundaries or table shape do not fit together
    #[error("config error: {0}")]
    Config(String),

    /// The exported artifact would exceed the embed limit
    #[error(
        "animation size has reached {size_bytes} bytes after {frames_encoded} of {total_frames} frames, \
         exceeding the embed limit of {limit_bytes} bytes"
    )]
    Resource {
        frames_encoded: usize,
        total_frames: usize,
        size_bytes: usize,
        limit_bytes: usize,
    },

    /// The destination could not be written
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A frame could not be rendered
    #[error("render error at frame {frame}: {message}")]
    Render { frame: usize, message: String },
}

impl AnimatorError {
    pub fn parse(message: impl Into<String>) -> Self {
        AnimatorError::Parse(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        AnimatorError::Config(message.into())
    }

    pub fn render(frame: usize, message: impl Into<String>) -> Self {
        AnimatorError::Render {
            frame,
            message: message.into(),
        }
    }

    /// Short name used in logs and state transition reasons
    pub fn kind(&self) -> &'static str {
        match self {
            AnimatorError::Parse(_) => "PARSE",
            AnimatorError::Config(_) => "CONFIG",
            AnimatorError::Resource { .. } => "RESOURCE",
            AnimatorError::Io { .. } => "IO",
            AnimatorError::Render { .. } => "RENDER",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnimatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_names() {
        assert_eq!(AnimatorError::parse("x").kind(), "PARSE");
        assert_eq!(AnimatorError::config("x").kind(), "CONFIG");
        assert_eq!(AnimatorError::render(3, "x").kind(), "RENDER");
    }

    #[test]
    fn test_resource_error_message_mentions_limit() {
        let err = AnimatorError::Resource {
            frames_encoded: 10,
            total_frames: 252,
            size_bytes: 2048,
            limit_bytes: 1024,
        };
        let message = err.to_string();
        assert!(message.contains("10 of 252"));
        assert!(message.contains("1024"));
    }
}
