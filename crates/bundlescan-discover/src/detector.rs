use std::path::{Path, PathBuf};

use bundlescan_core::BuildRequirements;

/// Failure reported by a detector. Discovery propagates it unchanged.
pub type DetectorError = Box<dyn std::error::Error + Send + Sync>;

/// A positive detection: the file belongs to a bundle rooted at `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Bundle root. Must be the detected file or one of its ancestors.
    pub root: PathBuf,
    pub requirements: BuildRequirements,
}

impl Detection {
    pub fn new(root: impl Into<PathBuf>, requirements: BuildRequirements) -> Self {
        Self {
            root: root.into(),
            requirements,
        }
    }
}

/// Recognizes files that belong to task-like artifacts.
///
/// Called once per visited file with an absolute, normalized path.
/// `Ok(None)` means the file is not recognized; `Err` aborts discovery.
pub trait TaskDetector: Send + Sync {
    fn detect_task(&self, file: &Path) -> Result<Option<Detection>, DetectorError>;
}

/// Recognizes files that belong to view-like artifacts.
///
/// Same contract as [`TaskDetector`]; the two capabilities are queried
/// independently and their results are never merged.
pub trait ViewDetector: Send + Sync {
    fn detect_view(&self, file: &Path) -> Result<Option<Detection>, DetectorError>;
}
