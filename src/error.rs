//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the vista crate.
#[derive(Debug)]
pub enum VistaError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// An accumulation or render target could not be allocated.
    TargetCreation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Backend-provided reason.
        reason: String,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for VistaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::TargetCreation {
                width,
                height,
                reason,
            } => {
                write!(f, "failed to create {width}x{height} target: {reason}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for VistaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for VistaError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for VistaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn target_creation_message_names_size() {
        let err = VistaError::TargetCreation {
            width: 640,
            height: 0,
            reason: "zero-sized".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to create 640x0 target: zero-sized"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn io_error_keeps_source() {
        let err = VistaError::from(std::io::Error::other("disk"));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
