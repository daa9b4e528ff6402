//! The decoded whole-file representation and its assembly.
//!
//! File order is fixed: header (2×u16), sections 1–13, the auxiliary
//! record, then sections 14 and 15.  Decode executes the section table over
//! a [`ByteReader`]; encode executes it over a [`ByteWriter`] in the same
//! order.  A document is owned by exactly one operation at a time — the
//! isolation transform reads one document and builds a fresh one.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{EffDirError, Result};
use crate::raw::{ByteReader, ByteWriter};
use crate::schema::{
    default_entry, read_entry, write_entry, CountRule, FieldError, Record, SectionSchema,
    AUX_SCHEMA, SECTIONS,
};

pub const NUM_SECTIONS: usize = 15;

/// Order in which section schemas appear in the file.  The auxiliary
/// record sits between sections 13 and 14 and is handled separately.
const FILE_ORDER: [u8; NUM_SECTIONS] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// One section: its entries plus the opaque end-of-section marker bytes
/// (empty for sections without a marker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub entries: Vec<Record>,
    pub eos: Vec<u8>,
}

/// A fully decoded EffDir file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffDir {
    /// Format/version tag: the two header u16s, in file order.
    pub version: (u16, u16),
    /// Sections 1..=15; index 0 is section 1.
    pub sections: Vec<Section>,
    /// The fixed auxiliary record ("13.5").
    pub aux: Record,
}

impl EffDir {
    /// An empty, encodable document: zero entries everywhere, zeroed marker
    /// bytes of the right width, a zeroed auxiliary record, and the one
    /// structural closing entry section 13 always carries.
    pub fn new() -> Self {
        let sections = SECTIONS
            .iter()
            .map(|s| Section {
                entries: Vec::new(),
                eos: vec![0; s.marker.size()],
            })
            .collect::<Vec<_>>();
        let mut doc = Self {
            version: (0, 0),
            sections,
            aux: default_entry(AUX_SCHEMA),
        };
        doc.section_mut(13)
            .entries
            .push(default_entry(crate::schema::schema_for(13).steps));
        doc
    }

    /// Section by 1-based number.
    pub fn section(&self, number: u8) -> &Section {
        &self.sections[number as usize - 1]
    }

    pub fn section_mut(&mut self, number: u8) -> &mut Section {
        &mut self.sections[number as usize - 1]
    }

    // ── Decode ───────────────────────────────────────────────────────────────

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);

        let version = (
            r.read_u16().map_err(|c| decode_err("header", 0, "version_major", c))?,
            r.read_u16().map_err(|c| decode_err("header", 0, "version_minor", c))?,
        );

        let mut doc = Self {
            version,
            sections: Vec::with_capacity(NUM_SECTIONS),
            aux: Record::new(),
        };
        // Placeholder sections so number-based indexing works while the
        // file is consumed in order.
        doc.sections.resize(
            NUM_SECTIONS,
            Section { entries: Vec::new(), eos: Vec::new() },
        );

        for &number in &FILE_ORDER {
            if number == 14 {
                // The auxiliary record precedes sections 14 and 15.
                doc.aux = read_entry(&mut r, AUX_SCHEMA)
                    .map_err(|e| field_err("auxiliary record", 0, e))?;
            }
            let schema = crate::schema::schema_for(number);
            // Section 12 precedes section 13 in file order, so its count is
            // already final when section 13 derives from it.
            let sec12_len = doc.section(12).entries.len();
            let decoded = decode_section(&mut r, schema, sec12_len)?;
            *doc.section_mut(number) = decoded;
        }

        Ok(doc)
    }

    // ── Encode ───────────────────────────────────────────────────────────────

    pub fn encode<W: Write>(&self, sink: W) -> Result<()> {
        if self.sections.len() != NUM_SECTIONS {
            return Err(EffDirError::MalformedEntry {
                field: format!("document has {} sections, expected {NUM_SECTIONS}", self.sections.len()),
            });
        }

        let mut w = ByteWriter::new(sink);
        w.write_u16(self.version.0)?;
        w.write_u16(self.version.1)?;

        for &number in &FILE_ORDER {
            if number == 14 {
                write_entry(&mut w, AUX_SCHEMA, &self.aux)?;
            }
            let schema = crate::schema::schema_for(number);
            self.encode_section(&mut w, schema)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }

    fn encode_section<W: Write>(&self, w: &mut ByteWriter<W>, schema: &SectionSchema) -> Result<()> {
        let section = self.section(schema.number);
        match schema.count {
            CountRule::Stored => w.write_u32(section.entries.len() as u32)?,
            CountRule::OneMoreThanSection12 => {
                // Enforced, not assumed: a decoder derives this count from
                // section 12, so writing anything else produces a file that
                // cannot be read back.
                let expected = self.section(12).entries.len() + 1;
                if section.entries.len() != expected {
                    return Err(EffDirError::Section13Count {
                        expected,
                        actual: section.entries.len(),
                    });
                }
            }
        }
        for entry in &section.entries {
            write_entry(w, schema.steps, entry)?;
        }
        if section.eos.len() != schema.marker.size() {
            return Err(EffDirError::MalformedEntry {
                field: format!("{} end-of-section marker", schema.label),
            });
        }
        w.write_bytes(&section.eos)
    }
}

impl Default for EffDir {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_section(r: &mut ByteReader<'_>, schema: &SectionSchema, sec12_len: usize) -> Result<Section> {
    let count = match schema.count {
        CountRule::Stored => r
            .read_u32()
            .map_err(|c| decode_err(schema.label, 0, "entry_count", c))?
            as usize,
        CountRule::OneMoreThanSection12 => sec12_len + 1,
    };

    let mut entries = Vec::with_capacity(count.min(4096));
    for i in 0..count {
        let entry =
            read_entry(r, schema.steps).map_err(|e| field_err(schema.label, i, e))?;
        entries.push(entry);
    }

    let eos = r
        .read_bytes(schema.marker.size())
        .map_err(|c| decode_err(schema.label, count, "end_of_section", c))?;

    Ok(Section { entries, eos })
}

fn decode_err(
    section: &'static str,
    entry_index: usize,
    field: &str,
    cause: EffDirError,
) -> EffDirError {
    EffDirError::Decode {
        section,
        entry_index,
        field: field.to_string(),
        cause: Box::new(cause),
    }
}

fn field_err(section: &'static str, entry_index: usize, e: FieldError) -> EffDirError {
    EffDirError::Decode {
        section,
        entry_index,
        field: e.field,
        cause: Box::new(e.cause),
    }
}
