use std::path::PathBuf;

use crate::detector::DetectorError;
use crate::path::PathResolutionError;

#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    PathResolution(#[from] PathResolutionError),

    #[error("detector failed on {path}")]
    Detector {
        path: PathBuf,
        source: DetectorError,
    },

    #[error("detected root {root} is not an ancestor of {file}")]
    RootOutsideFile { root: PathBuf, file: PathBuf },

    #[error("{path} is nested deeper than the maximum depth of {max_depth}")]
    MaxDepthExceeded { path: PathBuf, max_depth: usize },
}
