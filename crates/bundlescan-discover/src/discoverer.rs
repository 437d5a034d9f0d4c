use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bundlescan_core::{DEFAULT_IGNORED_DIRS, DiscoverConfig};

use crate::bundle::{Bundle, BundleSet};
use crate::detector::{Detection, TaskDetector, ViewDetector};
use crate::error::DiscoverError;
use crate::path;

/// Walks input paths and folds every detection into a set of bundles.
///
/// Detectors are consulted in registration order; the first positive
/// answer per capability wins for a given file.
pub struct Discoverer {
    task_detectors: Vec<Box<dyn TaskDetector>>,
    view_detectors: Vec<Box<dyn ViewDetector>>,
    ignored_dirs: HashSet<String>,
    max_depth: Option<usize>,
}

impl Discoverer {
    pub fn builder() -> DiscovererBuilder {
        DiscovererBuilder::default()
    }

    /// Discovers the bundles located within `paths`.
    ///
    /// Directories are expanded recursively. The target paths recorded on
    /// each bundle describe the inputs as supplied, not every file visited:
    /// bundles found below a directory input are re-keyed to that
    /// directory.
    ///
    /// # Errors
    ///
    /// Any unreadable entry, unresolvable path, or detector failure aborts
    /// the whole call; no partial result is returned.
    pub fn discover<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Bundle>, DiscoverError> {
        let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let bundles = self.discover_paths(&paths, 0)?;
        tracing::info!(
            inputs = paths.len(),
            bundles = bundles.len(),
            "discovery complete"
        );
        Ok(bundles.into_bundles())
    }

    fn discover_paths(&self, paths: &[PathBuf], depth: usize) -> Result<BundleSet, DiscoverError> {
        let mut bundles = BundleSet::new();

        for p in paths {
            let abs = path::normalize(p)?;
            if self.is_ignored(&abs) {
                tracing::debug!(path = %abs.display(), "skipping ignored directory");
                continue;
            }

            if path::stat(&abs)?.is_dir() {
                self.discover_dir(&abs, depth, &mut bundles)?;
            } else {
                self.discover_file(&abs, &mut bundles)?;
            }
        }

        Ok(bundles)
    }

    fn discover_dir(
        &self,
        dir: &Path,
        depth: usize,
        bundles: &mut BundleSet,
    ) -> Result<(), DiscoverError> {
        if let Some(max_depth) = self.max_depth
            && depth >= max_depth
        {
            return Err(DiscoverError::MaxDepthExceeded {
                path: dir.to_path_buf(),
                max_depth,
            });
        }

        let mut children = std::fs::read_dir(dir)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<std::io::Result<Vec<_>>>()
            })
            .map_err(|e| DiscoverError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        children.sort();

        // Nested target paths describe the walk, not the request; re-key
        // every child bundle to this directory.
        for mut bundle in self.discover_paths(&children, depth + 1)? {
            bundle.target_paths.clear();
            bundles.fold(bundle, dir)?;
        }
        Ok(())
    }

    fn discover_file(&self, file: &Path, bundles: &mut BundleSet) -> Result<(), DiscoverError> {
        for detector in &self.task_detectors {
            let detection = detector
                .detect_task(file)
                .map_err(|e| DiscoverError::Detector {
                    path: file.to_path_buf(),
                    source: e,
                })?;
            if let Some(detection) = detection {
                fold_detection(detection, file, bundles)?;
                break;
            }
        }

        for detector in &self.view_detectors {
            let detection = detector
                .detect_view(file)
                .map_err(|e| DiscoverError::Detector {
                    path: file.to_path_buf(),
                    source: e,
                })?;
            if let Some(detection) = detection {
                fold_detection(detection, file, bundles)?;
                break;
            }
        }

        Ok(())
    }

    fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.ignored_dirs.contains(name))
    }
}

fn fold_detection(
    detection: Detection,
    file: &Path,
    bundles: &mut BundleSet,
) -> Result<(), DiscoverError> {
    let root = path::normalize(&detection.root)?;
    if !path::is_ancestor_or_equal(&root, file) {
        return Err(DiscoverError::RootOutsideFile {
            root,
            file: file.to_path_buf(),
        });
    }

    tracing::debug!(
        file = %file.display(),
        root = %root.display(),
        kind = %detection.requirements.kind,
        "detected"
    );
    bundles.fold(Bundle::new(root, detection.requirements), file)?;
    Ok(())
}

/// Builder for [`Discoverer`].
///
/// Starts with no detectors and the default ignored-directory list.
pub struct DiscovererBuilder {
    task_detectors: Vec<Box<dyn TaskDetector>>,
    view_detectors: Vec<Box<dyn ViewDetector>>,
    ignored_dirs: HashSet<String>,
    max_depth: Option<usize>,
}

impl Default for DiscovererBuilder {
    fn default() -> Self {
        Self {
            task_detectors: Vec::new(),
            view_detectors: Vec::new(),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|d| (*d).to_owned()).collect(),
            max_depth: None,
        }
    }
}

impl DiscovererBuilder {
    pub fn task_detector(mut self, detector: impl TaskDetector + 'static) -> Self {
        self.task_detectors.push(Box::new(detector));
        self
    }

    pub fn view_detector(mut self, detector: impl ViewDetector + 'static) -> Self {
        self.view_detectors.push(Box::new(detector));
        self
    }

    /// Replaces the ignored-directory list.
    pub fn ignored_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Applies the `[discover]` section of bundlescan.toml.
    pub fn config(self, config: &DiscoverConfig) -> Self {
        self.ignored_dirs(config.ignored_dirs.iter().cloned())
            .max_depth(config.max_depth)
    }

    pub fn build(self) -> Discoverer {
        Discoverer {
            task_detectors: self.task_detectors,
            view_detectors: self.view_detectors,
            ignored_dirs: self.ignored_dirs,
            max_depth: self.max_depth,
        }
    }
}
