//! JSON snapshot of a decoded document.
//!
//! A snapshot is the inspection dump format and the re-parse cache: decode
//! once, save, and later operations load the snapshot instead of walking
//! the binary again.  The snapshot preserves everything encode needs,
//! including marker bytes, so `load` followed by `encode` reproduces the
//! original file.

use std::io::{Read, Write};

use crate::document::EffDir;
use crate::error::Result;

pub fn save<W: Write>(doc: &EffDir, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, doc)?;
    Ok(())
}

pub fn load<R: Read>(reader: R) -> Result<EffDir> {
    Ok(serde_json::from_reader(reader)?)
}

/// Snapshot as an in-memory string (CLI terminal output).
pub fn to_string(doc: &EffDir) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}
