use std::io;
use std::path::Path;

use crate::context::Context;
use crate::error::LookDevError;

pub const DEFAULT_CONFIG_PATH: &str = "Library/LookDevConfig.json";

/// Reads the persisted context. Missing or corrupt files yield `None`.
pub fn load_config(path: &Path) -> Option<Context> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no lookdev config at {:?}", path);
            return None;
        }
        Err(err) => {
            tracing::warn!("failed to read lookdev config {:?}: {}", path, err);
            return None;
        }
    };
    match Context::from_json(&data) {
        Ok(context) => {
            tracing::info!("lookdev config loaded from {:?}", path);
            Some(context)
        }
        Err(err) => {
            tracing::warn!("ignoring corrupt lookdev config {:?}: {}", path, err);
            None
        }
    }
}

pub fn save_config(path: &Path, context: &Context) -> Result<(), LookDevError> {
    let data = context.to_json()?;
    let io_error = |source: io::Error| LookDevError::ConfigIo {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, data).map_err(io_error)?;
    tracing::info!("lookdev config saved to {:?}", path);
    Ok(())
}
