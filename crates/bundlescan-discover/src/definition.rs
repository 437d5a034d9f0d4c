//! Detectors for TOML definition files.
//!
//! A task is declared by `<name>.task.toml`, a view by `<name>.view.toml`:
//!
//! ```toml
//! name = "hello"
//! kind = "node"            # tasks only
//! entrypoint = "hello.js"  # relative to the definition file
//! version = "16"           # optional, overrides bundlescan.toml
//! base = "slim"            # optional, overrides bundlescan.toml
//! ```
//!
//! A source file is recognized through a definition that shares its
//! basename (`hello.js` next to `hello.task.toml`) or that names it as the
//! entrypoint from one of its ancestor directories.
//!
//! The bundle root is the nearest directory, starting at the entrypoint's
//! own (or the definition's, without an entrypoint), that holds the kind's
//! marker file (`package.json` for node and views, `requirements.txt` or
//! `pyproject.toml` for python). Without a marker the starting directory
//! is the root. A file is only reported when that root contains it, so a
//! definition whose entrypoint roots elsewhere is represented by the
//! entrypoint alone. Version, base, and env vars not pinned by the
//! definition come from the root's bundlescan.toml.

use std::path::{Path, PathBuf};

use bundlescan_core::{BuildBase, BuildKind, BuildRequirements, RuntimeConfig, ScanConfig};
use serde::Deserialize;

use crate::detector::{Detection, DetectorError, TaskDetector, ViewDetector};
use crate::path::{self, PathResolutionError};

pub const TASK_DEFINITION_SUFFIX: &str = ".task.toml";
pub const VIEW_DEFINITION_SUFFIX: &str = ".view.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Definition {
    name: String,
    kind: Option<BuildKind>,
    entrypoint: Option<PathBuf>,
    version: Option<String>,
    base: Option<BuildBase>,
}

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to read definition {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse definition {path}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("task definition {path} does not declare a kind")]
    MissingKind { path: PathBuf },
    #[error("view definition {path} declares kind '{kind}'; views are always 'view'")]
    InvalidViewKind { path: PathBuf, kind: BuildKind },
    #[error("entrypoint {entrypoint} declared in {path} does not exist")]
    EntrypointNotFound { path: PathBuf, entrypoint: PathBuf },
    #[error(transparent)]
    Path(#[from] PathResolutionError),
    #[error("failed to load build settings for {root}")]
    Config {
        root: PathBuf,
        source: bundlescan_core::Error,
    },
}

/// Recognizes `*.task.toml` definitions and the files they describe.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefinitionTaskDetector;

impl TaskDetector for DefinitionTaskDetector {
    fn detect_task(&self, file: &Path) -> Result<Option<Detection>, DetectorError> {
        Ok(detect_with(file, TASK_DEFINITION_SUFFIX, task_detection)?)
    }
}

/// Recognizes `*.view.toml` definitions and the files they describe.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefinitionViewDetector;

impl ViewDetector for DefinitionViewDetector {
    fn detect_view(&self, file: &Path) -> Result<Option<Detection>, DetectorError> {
        Ok(detect_with(file, VIEW_DEFINITION_SUFFIX, view_detection)?)
    }
}

fn task_detection(def_path: &Path, def: &Definition) -> Result<Detection, DefinitionError> {
    let kind = def.kind.ok_or_else(|| DefinitionError::MissingKind {
        path: def_path.to_path_buf(),
    })?;
    detection_for(def_path, def, kind)
}

fn view_detection(def_path: &Path, def: &Definition) -> Result<Detection, DefinitionError> {
    if let Some(kind) = def.kind.filter(|k| *k != BuildKind::View) {
        return Err(DefinitionError::InvalidViewKind {
            path: def_path.to_path_buf(),
            kind,
        });
    }
    let mut detection = detection_for(def_path, def, BuildKind::View)?;
    if detection.requirements.base.is_none() {
        detection.requirements.base = Some(BuildBase::Slim);
    }
    Ok(detection)
}

/// Returns the first detection, among the definitions describing `file`,
/// whose root contains `file`.
fn detect_with(
    file: &Path,
    suffix: &str,
    resolve: fn(&Path, &Definition) -> Result<Detection, DefinitionError>,
) -> Result<Option<Detection>, DefinitionError> {
    let file = path::normalize(file)?;
    for (def_path, def) in candidate_definitions(&file, suffix)? {
        let detection = resolve(&def_path, &def)?;
        if path::is_ancestor_or_equal(&detection.root, &file) {
            return Ok(Some(detection));
        }
        tracing::debug!(
            file = %file.display(),
            definition = %def_path.display(),
            root = %detection.root.display(),
            "bundle root does not contain file; left to the entrypoint"
        );
    }
    Ok(None)
}

/// Definitions that may describe `file`: the file itself, a same-basename
/// sibling, then definitions in ancestor directories naming it as their
/// entrypoint.
fn candidate_definitions(
    file: &Path,
    suffix: &str,
) -> Result<Vec<(PathBuf, Definition)>, DefinitionError> {
    let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    if name.ends_with(suffix) {
        return Ok(vec![(file.to_path_buf(), read_definition(file)?)]);
    }

    let mut found = Vec::new();
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let sibling = file.with_file_name(format!("{stem}{suffix}"));
    if !stem.is_empty() && sibling.is_file() {
        let def = read_definition(&sibling)?;
        found.push((sibling.clone(), def));
    }
    found.extend(
        referencing_definitions(file, suffix)
            .into_iter()
            .filter(|(def_path, _)| *def_path != sibling),
    );
    Ok(found)
}

// Definitions that fail to parse here are reported when they are visited
// themselves, not while looking up an unrelated file.
fn referencing_definitions(file: &Path, suffix: &str) -> Vec<(PathBuf, Definition)> {
    let mut found = Vec::new();
    for dir in file.ancestors().skip(1) {
        let mut def_paths: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(suffix))
                })
                .collect(),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        def_paths.sort();

        for def_path in def_paths {
            let def = match read_definition(&def_path) {
                Ok(def) => def,
                Err(e) => {
                    tracing::debug!(definition = %def_path.display(), error = %e, "skipping");
                    continue;
                }
            };
            let names_file = def
                .entrypoint
                .as_ref()
                .and_then(|ep| path::normalize(&dir.join(ep)).ok())
                .is_some_and(|ep| ep == file);
            if names_file {
                found.push((def_path, def));
            }
        }
    }
    found
}

fn read_definition(def_path: &Path) -> Result<Definition, DefinitionError> {
    let content = std::fs::read_to_string(def_path).map_err(|e| DefinitionError::Read {
        path: def_path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| DefinitionError::Parse {
        path: def_path.to_path_buf(),
        source: e,
    })
}

fn detection_for(
    def_path: &Path,
    def: &Definition,
    kind: BuildKind,
) -> Result<Detection, DefinitionError> {
    let def_dir = def_path.parent().unwrap_or(def_path);

    let start_dir = match &def.entrypoint {
        Some(entrypoint) => {
            let resolved = path::normalize(&def_dir.join(entrypoint))?;
            if !resolved.exists() {
                return Err(DefinitionError::EntrypointNotFound {
                    path: def_path.to_path_buf(),
                    entrypoint: entrypoint.clone(),
                });
            }
            resolved
                .parent()
                .map_or_else(|| def_dir.to_path_buf(), Path::to_path_buf)
        }
        None => def_dir.to_path_buf(),
    };

    let root = find_root(&start_dir, kind);
    let config = ScanConfig::load(&root).map_err(|e| DefinitionError::Config {
        root: root.clone(),
        source: e,
    })?;
    let runtime = runtime_config(config, kind);
    tracing::debug!(
        name = %def.name,
        definition = %def_path.display(),
        root = %root.display(),
        "resolved definition"
    );

    let mut requirements = BuildRequirements::new(kind).with_env_vars(runtime.env);
    requirements.version = def.version.clone().or(runtime.version);
    requirements.base = def.base.or(runtime.base);

    Ok(Detection::new(root, requirements))
}

fn marker_files(kind: BuildKind) -> &'static [&'static str] {
    match kind {
        BuildKind::Node | BuildKind::View => &["package.json"],
        BuildKind::Python => &["requirements.txt", "pyproject.toml"],
        BuildKind::Shell | BuildKind::Image | BuildKind::None => &[],
    }
}

fn find_root(start_dir: &Path, kind: BuildKind) -> PathBuf {
    let markers = marker_files(kind);
    start_dir
        .ancestors()
        .find(|dir| markers.iter().any(|m| dir.join(m).is_file()))
        .unwrap_or(start_dir)
        .to_path_buf()
}

fn runtime_config(config: ScanConfig, kind: BuildKind) -> RuntimeConfig {
    match kind {
        BuildKind::Node | BuildKind::View => config.node,
        BuildKind::Python => config.python,
        BuildKind::Shell | BuildKind::Image | BuildKind::None => RuntimeConfig::default(),
    }
}
