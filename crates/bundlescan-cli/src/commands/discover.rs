use std::path::{Path, PathBuf};

use bundlescan_core::ScanConfig;
use bundlescan_discover::{Bundle, DefinitionTaskDetector, DefinitionViewDetector, Discoverer};

pub fn discover(paths: Vec<PathBuf>, json: bool) -> anyhow::Result<()> {
    let config = ScanConfig::load(Path::new("."))?;
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };

    let discoverer = Discoverer::builder()
        .config(&config.discover)
        .task_detector(DefinitionTaskDetector)
        .view_detector(DefinitionViewDetector)
        .build();
    let bundles = discoverer.discover(&paths)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bundles)?);
        return Ok(());
    }

    if bundles.is_empty() {
        println!("No bundles found.");
        return Ok(());
    }
    for bundle in &bundles {
        println!("{}", render_bundle(bundle));
    }
    println!("Found {} bundle(s).", bundles.len());
    Ok(())
}

fn render_bundle(bundle: &Bundle) -> String {
    let requirements = &bundle.requirements;
    let mut out = format!("{}  {}\n", requirements.kind, bundle.root.display());

    if let Some(version) = requirements.version_or_default() {
        if requirements.version.is_some() {
            out.push_str(&format!("  version: {version}\n"));
        } else {
            out.push_str(&format!("  version: default ({version})\n"));
        }
    }
    if let Some(base) = requirements.base {
        out.push_str(&format!("  base:    {base}\n"));
    }
    if !requirements.env_vars.is_empty() {
        let names: Vec<&str> = requirements.env_vars.keys().map(String::as_str).collect();
        out.push_str(&format!("  env:     {}\n", names.join(", ")));
    }
    let targets: Vec<&str> = bundle.target_paths.iter().map(String::as_str).collect();
    out.push_str(&format!("  targets: {}\n", targets.join(", ")));
    out
}
