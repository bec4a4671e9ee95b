//! Catalog publication

use crate::compiler::CatalogCompiler;
use crate::errors::SinkError;
use crate::node::PermissionNode;
use std::io::Write;
use tracing::info;
use warden_core::HandlerMetadataSource;

/// Consumer of a compiled catalog (permission store, admin UI, file).
pub trait CatalogSink {
    /// Hand over one compiled catalog.
    fn publish(&mut self, catalog: &[PermissionNode]) -> Result<(), SinkError>;
}

/// Writes the catalog as JSON.
#[derive(Debug)]
pub struct JsonCatalogSink<W> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonCatalogSink<W> {
    /// Pretty-printing sink over `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: true,
        }
    }

    /// Write single-line JSON instead.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CatalogSink for JsonCatalogSink<W> {
    fn publish(&mut self, catalog: &[PermissionNode]) -> Result<(), SinkError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, catalog)?;
        } else {
            serde_json::to_writer(&mut self.writer, catalog)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Compile the catalog and hand it to `sink`. Returns the number of permissions published.
pub fn publish_catalog<M, S>(
    compiler: &CatalogCompiler,
    source: &M,
    sink: &mut S,
) -> Result<usize, SinkError>
where
    M: HandlerMetadataSource + ?Sized,
    S: CatalogSink + ?Sized,
{
    let catalog = compiler.compile(source);
    let permissions = catalog
        .iter()
        .map(PermissionNode::permission_count)
        .sum::<usize>();
    sink.publish(&catalog)?;
    info!(groups = catalog.len(), permissions, "Permission catalog published");
    Ok(permissions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_sink_writes_array() {
        let mut sink = JsonCatalogSink::new(Vec::new()).compact();
        let catalog = vec![PermissionNode::new("user", "User")
            .with_child(PermissionNode::new("user_add", "User-Add"))];
        sink.publish(&catalog).unwrap();

        let written = String::from_utf8(sink.into_inner()).unwrap();
        let parsed: Vec<PermissionNode> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, catalog);
        assert!(written.ends_with('\n'));
    }
}
