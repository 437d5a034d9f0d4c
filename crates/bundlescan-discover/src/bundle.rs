use std::path::{Path, PathBuf};

use bundlescan_core::BuildRequirements;
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::path::{self, PathResolutionError};

/// Target path meaning "the whole root directory".
pub const WHOLE_ROOT: &str = ".";

/// A directory plus the build requirements shared by the files under it
/// that were asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bundle {
    /// Absolute, normalized root directory.
    pub root: PathBuf,
    pub requirements: BuildRequirements,
    /// Forward-slash paths relative to `root`, or [`WHOLE_ROOT`].
    /// Equality ignores insertion order.
    pub target_paths: IndexSet<String>,
}

impl Bundle {
    pub fn new(root: impl Into<PathBuf>, requirements: BuildRequirements) -> Self {
        Self {
            root: root.into(),
            requirements,
            target_paths: IndexSet::new(),
        }
    }

    /// Records `trigger` as a target of this bundle.
    ///
    /// A trigger that is the root or one of its ancestors becomes
    /// [`WHOLE_ROOT`]; anything else is stored relative to the root. Returns
    /// `false` when the target was already recorded.
    ///
    /// `self.root` must already be normalized.
    pub fn record_target(&mut self, trigger: &Path) -> Result<bool, PathResolutionError> {
        let abs_target = path::normalize(trigger)?;
        let target = if path::is_ancestor_or_equal(&abs_target, &self.root) {
            WHOLE_ROOT.to_owned()
        } else {
            path::relative_to(&abs_target, &self.root)
        };
        Ok(self.target_paths.insert(target))
    }

    pub fn targets_whole_root(&self) -> bool {
        self.target_paths.contains(WHOLE_ROOT)
    }
}

type BundleKey = (PathBuf, BuildRequirements);

/// Running result of one discovery call.
///
/// Holds at most one bundle per `(root, requirements)` pair and iterates
/// in first-insertion order.
#[derive(Debug, Default)]
pub struct BundleSet {
    bundles: IndexMap<BundleKey, Bundle>,
}

impl BundleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `candidate` into the set, recording `trigger` on whichever
    /// bundle ends up representing it.
    ///
    /// If a bundle with the same root and requirements exists, only its
    /// target paths change. Otherwise the candidate is appended.
    pub fn fold(
        &mut self,
        mut candidate: Bundle,
        trigger: &Path,
    ) -> Result<(), PathResolutionError> {
        candidate.root = path::normalize(&candidate.root)?;
        let key = (candidate.root.clone(), candidate.requirements.clone());

        match self.bundles.entry(key) {
            Entry::Occupied(entry) => {
                entry.into_mut().record_target(trigger)?;
            }
            Entry::Vacant(entry) => {
                candidate.record_target(trigger)?;
                tracing::debug!(
                    root = %candidate.root.display(),
                    kind = %candidate.requirements.kind,
                    "new bundle"
                );
                entry.insert(candidate);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bundle> {
        self.bundles.values()
    }

    pub fn into_bundles(self) -> Vec<Bundle> {
        self.bundles.into_values().collect()
    }
}

impl IntoIterator for BundleSet {
    type Item = Bundle;
    type IntoIter = indexmap::map::IntoValues<BundleKey, Bundle>;

    fn into_iter(self) -> Self::IntoIter {
        self.bundles.into_values()
    }
}
