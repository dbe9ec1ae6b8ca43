//! Printing item groups in the selected format.

use std::io::Write;

use anyhow::Result;
use mdsplit_core::ItemGroup;
use mdsplit_ingest::to_documents;

use crate::config::OutputFormat;

const SEPARATOR_WIDTH: usize = 40;

/// Write the groups to `out` in the given format.
pub fn write_groups<W: Write>(out: &mut W, groups: &[ItemGroup], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, groups),
        OutputFormat::Json => write_json(out, groups),
        OutputFormat::Documents => write_documents(out, groups),
    }
}

fn write_text<W: Write>(out: &mut W, groups: &[ItemGroup]) -> Result<()> {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    for group in groups {
        writeln!(out, "File: {}", group.stem())?;
        for item in &group.items {
            writeln!(out, "{separator}")?;
            writeln!(out, "Title: {}", item.title)?;
            writeln!(out, "Body: {}", item.body.trim_end())?;
            writeln!(out, "Metadata: {}", serde_json::to_string(&item.metadata)?)?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, groups: &[ItemGroup]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, groups)?;
    writeln!(out)?;
    Ok(())
}

fn write_documents<W: Write>(out: &mut W, groups: &[ItemGroup]) -> Result<()> {
    for document in to_documents(groups) {
        writeln!(out, "{}", document.to_json_line()?)?;
    }
    Ok(())
}
