// Permission identity of a single handler

use anyhow::{bail, Result};
use std::io::Write;
use warden_core::{permission_identity, WardenConfig};

pub fn run<W: Write>(
    config: &WardenConfig,
    type_name: &str,
    method: &str,
    out: &mut W,
) -> Result<()> {
    if type_name.trim().is_empty() || method.trim().is_empty() {
        bail!("Type name and method must not be empty");
    }
    let identity = permission_identity(type_name, method, &config.controller_suffix);
    writeln!(out, "{identity}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_of(config: &WardenConfig, type_name: &str, method: &str) -> String {
        let mut out = Vec::new();
        run(config, type_name, method, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_prints_identity() {
        let config = WardenConfig::default();
        assert_eq!(identity_of(&config, "UserController", "getList"), "user_getList\n");
        assert_eq!(identity_of(&config, "Controller", "ping"), "controller_ping\n");
    }

    #[test]
    fn test_uses_configured_suffix() {
        let config = WardenConfig {
            controller_suffix: "Resource".to_string(),
            ..WardenConfig::default()
        };
        assert_eq!(identity_of(&config, "OrderResource", "add"), "order_add\n");
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let mut out = Vec::new();
        assert!(run(&WardenConfig::default(), " ", "getList", &mut out).is_err());
    }
}
