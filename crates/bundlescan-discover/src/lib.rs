//! Bundle discovery for bundlescan.
//!
//! # Discovery pipeline
//!
//! ```text
//! Discoverer::discover(paths)
//!   1. Skip     ── basename in the ignored-directory list
//!   2. Expand   ── directories recurse into their children
//!   3. Detect   ── every TaskDetector, then every ViewDetector, per file
//!   4. Fold     ── BundleSet::fold() merges on (root, requirements)
//!   5. Re-key   ── child bundles record the directory, not the files
//! ```
//!
//! # Bundle identity
//!
//! Two detections share a bundle only when the root directory and the full
//! [`BuildRequirements`](bundlescan_core::BuildRequirements) are equal,
//! env vars included. One directory may root several bundles.
//!
//! # Target paths
//!
//! Each bundle records which of the supplied inputs resolved to it,
//! relative to its root. An input that is the root or one of its ancestors
//! is recorded as `"."`.

pub mod bundle;
pub mod definition;
pub mod detector;
pub mod discoverer;
pub mod error;
pub mod path;

pub use bundle::{Bundle, BundleSet, WHOLE_ROOT};
pub use definition::{DefinitionError, DefinitionTaskDetector, DefinitionViewDetector};
pub use detector::{Detection, DetectorError, TaskDetector, ViewDetector};
pub use discoverer::{Discoverer, DiscovererBuilder};
pub use error::DiscoverError;
pub use path::PathResolutionError;
