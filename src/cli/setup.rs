use anyhow::Context;

use crate::core::config::AppConfig;

/// Writes a default configuration file, refusing to clobber an existing one.
pub fn run() -> anyhow::Result<()> {
    let path = AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
provider:
  base_url: "https://api.coingecko.com/api/v3"
  # api_key: "CG-..."
  # Demo keys use x-cg-demo-api-key, pro keys x-cg-pro-api-key.
  api_key_header: "x-cg-demo-api-key"

update_interval_secs: 30
cache_duration_secs: 60
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    println!("Created default configuration at {}", path.display());
    Ok(())
}
