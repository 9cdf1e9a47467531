use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookDevError {
    #[error("LookDev is not supported by this render pipeline: {pipeline}")]
    Unsupported { pipeline: String },
    #[error("LookDev window is already open")]
    AlreadyOpen,
    #[error("config io error at {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config encoding error: {0}")]
    ConfigEncoding(#[from] serde_json::Error),
}

impl LookDevError {
    pub fn unsupported(pipeline_name: Option<String>) -> Self {
        LookDevError::Unsupported {
            pipeline: pipeline_name.unwrap_or_else(|| "No render pipeline in use".to_string()),
        }
    }
}
