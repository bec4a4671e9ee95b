// Access requirement listing
//
// One line per HTTP-mapped handler: handler, effective requirement, and the
// permission identity the gate checks (or "-" when no permission check applies).

use crate::commands::common;
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use warden_core::{HandlerMetadataSource, WardenConfig};

pub fn run<W: Write>(config: &WardenConfig, manifest: &Path, out: &mut W) -> Result<()> {
    let registry = common::load_registry(config, manifest)?;

    for handler in registry.handlers().iter().filter(|h| h.has_http_mapping()) {
        let requirement = handler.access_requirement();
        let permission = if requirement.is_permission_gated() {
            handler
                .permission_identity(&config.controller_suffix)
                .into_string()
        } else {
            "-".to_string()
        };
        writeln!(
            out,
            "{}.{}\t{}\t{}",
            handler.owner_type(),
            handler.method_name(),
            requirement,
            permission
        )?;
    }
    Ok(())
}
