// Shared loading for commands

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use warden_core::{HandlerRegistry, RegistryManifest, WardenConfig};

/// Load the config file if given, then apply `WARDEN_*` overrides.
pub fn load_config(path: Option<&Path>) -> Result<WardenConfig> {
    let mut config = match path {
        Some(path) => WardenConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => WardenConfig::default(),
    };
    config
        .merge_with_env()
        .context("Invalid WARDEN_* environment override")?;
    debug!(?config, "Configuration loaded");
    Ok(config)
}

/// Build the registry of a manifest, checking identities with the configured suffix.
pub fn load_registry(config: &WardenConfig, manifest: &Path) -> Result<HandlerRegistry> {
    let registry = RegistryManifest::load_from_file(manifest)
        .and_then(|groups| {
            HandlerRegistry::builder()
                .controller_suffix(config.controller_suffix.clone())
                .manifest(groups)
                .build()
        })
        .with_context(|| format!("Failed to load registry manifest {}", manifest.display()))?;
    debug!(
        manifest = %manifest.display(),
        handlers = registry.len(),
        "Registry loaded"
    );
    Ok(registry)
}
