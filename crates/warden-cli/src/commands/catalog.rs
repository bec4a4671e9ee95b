// Permission catalog export
//
// Compiles the catalog of a registry manifest and writes it as JSON.

use crate::commands::common;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;
use warden_catalog::{publish_catalog, CatalogCompiler, JsonCatalogSink};
use warden_core::{CatalogOrder, WardenConfig};

pub fn run<W: Write>(
    config: &WardenConfig,
    manifest: &Path,
    order: Option<&str>,
    compact: bool,
    out: &mut W,
) -> Result<()> {
    let registry = common::load_registry(config, manifest)?;

    let mut compiler = CatalogCompiler::from_config(config);
    if let Some(order) = order {
        compiler = compiler.with_order(order.parse::<CatalogOrder>()?);
    }

    let mut sink = JsonCatalogSink::new(out);
    if compact {
        sink = sink.compact();
    }
    let permissions = publish_catalog(&compiler, &registry, &mut sink)
        .context("Failed to write permission catalog")?;

    info!(
        manifest = %manifest.display(),
        permissions,
        "Catalog exported"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use warden_testkit::SERVICE_MANIFEST;

    fn manifest() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SERVICE_MANIFEST.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_catalog_is_written_as_json() {
        let file = manifest();
        let mut out = Vec::new();

        run(&WardenConfig::default(), file.path(), None, true, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let roots = json.as_array().unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0]["identity"], "log");
        assert_eq!(roots[1]["identity"], "user");
        assert_eq!(roots[1]["name"], "User");
        assert_eq!(roots[1]["children"][2]["identity"], "user_getList");
        assert_eq!(roots[1]["children"][2]["name"], "User-List");
    }

    #[test]
    fn test_order_flag_overrides_config() {
        let file = manifest();
        let mut out = Vec::new();

        run(
            &WardenConfig::default(),
            file.path(),
            Some("discovery"),
            true,
            &mut out,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["identity"], "user");
        assert_eq!(json[1]["identity"], "log");
    }

    #[test]
    fn test_unknown_order_is_rejected() {
        let file = manifest();
        let mut out = Vec::new();

        let result = run(
            &WardenConfig::default(),
            file.path(),
            Some("alphabetical"),
            false,
            &mut out,
        );
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
