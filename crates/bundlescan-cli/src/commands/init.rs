use std::path::Path;

use bundlescan_core::{CONFIG_FILE_NAME, ScanConfig};

/// Write a default bundlescan.toml into the current directory.
pub fn init() -> anyhow::Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!(
            "{CONFIG_FILE_NAME} already exists; edit it directly or delete it to re-initialize"
        );
    }

    let rendered = ScanConfig::default().to_toml()?;
    let content = format!(
        "{rendered}\n\
         # Per-runtime build settings, read from each bundle root:\n\
         #\n\
         # [node]\n\
         # version = \"18\"\n\
         # base = \"slim\"\n\
         #\n\
         # [node.env]\n\
         # API_URL = \"https://example.com\"\n\
         # DB_URL = {{ config = \"db_url\" }}\n"
    );
    std::fs::write(config_path, content)?;
    tracing::debug!(path = %config_path.display(), "wrote default config");

    println!("Created {CONFIG_FILE_NAME}");
    println!();
    println!("Next steps:");
    println!("  1. Declare tasks with <name>.task.toml and views with <name>.view.toml");
    println!("  2. Run: bundlescan discover");
    Ok(())
}
