use scene_builder::SceneError;

/// Fatal export errors. Nothing was written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("no output formats requested")]
    NoFormats,

    #[error("invalid base path '{path}': no file name")]
    InvalidBasePath { path: String },

    #[error("scene has no nodes to export")]
    EmptyScene,
}

/// Failure of a single format. Other formats are unaffected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("write failed: {reason}")]
    Io { reason: String },

    #[error("serialization failed: {reason}")]
    Serialize { reason: String },
}

impl From<std::io::Error> for FormatError {
    fn from(e: std::io::Error) -> Self {
        FormatError::Io {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(e: serde_json::Error) -> Self {
        FormatError::Serialize {
            reason: e.to_string(),
        }
    }
}

/// Errors that end an export run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
