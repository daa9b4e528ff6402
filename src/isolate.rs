//! The isolation transform: extract one named effect, and every record its
//! section 12 entry references, into a minimal standalone document.
//!
//! The transform is pure and constructive: the source document is
//! read-only input, and the result is assembled from fresh copies of
//! exactly the fragments needed.  Any out-of-range lookup fails the whole
//! transform — a partial document is never returned.
//!
//! Stored primary-index keys are direct target indices; no off-by-one
//! shift is applied when dereferencing.

use crate::document::{EffDir, Section};
use crate::error::{EffDirError, Result};
use crate::refs::target_section;
use crate::schema::Value;

/// Extract the section 13 effect at `source_index` under a new name.
///
/// Only named effects are selectable: section 13's trailing closing entry
/// is out of range for `source_index`, the same as any index past it.
///
/// The result holds: one section 12 entry (the resolved effect
/// description, reference keys rewritten), two section 13 entries (the
/// renamed effect with `index_key` 0, then the source's structural closing
/// entry), and per target section exactly the entries the primary index
/// references, in reference order.  Header, auxiliary record, and every
/// end-of-section marker are copied verbatim; untouched sections are empty.
pub fn isolate(doc: &EffDir, source_index: usize, new_name: &str) -> Result<EffDir> {
    let sec13 = doc.section(13);
    // The trailing closing entry is structural, never a named effect, so
    // the selectable range stops one short of the section's length.
    let named = sec13.entries.len().saturating_sub(1);
    if source_index >= named {
        return Err(EffDirError::IndexOutOfRange {
            what: "named effect index into section 13",
            index: source_index,
            len: named,
        });
    }
    let chosen = &sec13.entries[source_index];

    let index_key = chosen
        .get_u32("index_key")
        .ok_or_else(|| EffDirError::MalformedEntry {
            field: "index_key".to_string(),
        })? as usize;
    let sec12 = doc.section(12);
    let resolved = sec12
        .entries
        .get(index_key)
        .ok_or(EffDirError::IndexOutOfRange {
            what: "section 13 index_key into section 12",
            index: index_key,
            len: sec12.entries.len(),
        })?;

    // The closing entry is structural, never a named effect: it sits at
    // position Section12.entry_count in the source.
    let closing_pos = sec12.entries.len();
    let closing = sec13
        .entries
        .get(closing_pos)
        .ok_or(EffDirError::IndexOutOfRange {
            what: "section 13 closing entry",
            index: closing_pos,
            len: sec13.entries.len(),
        })?;

    // Fresh document: header and auxiliary record verbatim, every section
    // empty but keeping its marker bytes.
    let mut out = EffDir {
        version: doc.version,
        sections: doc
            .sections
            .iter()
            .map(|s| Section {
                entries: Vec::new(),
                eos: s.eos.clone(),
            })
            .collect(),
        aux: doc.aux.clone(),
    };

    out.section_mut(12).entries.push(resolved.clone());

    let mut effect = chosen.clone();
    effect.set("index_key", Value::U32(0));
    effect.set("name", Value::Str(new_name.to_string()));
    out.section_mut(13).entries.push(effect);
    out.section_mut(13).entries.push(closing.clone());

    // Walk the primary index in stored order, copying each resolvable
    // target entry and noting where its key must now point.  Unresolvable
    // flags are left untouched, key included.
    let prim = resolved
        .get_list("prim_index")
        .ok_or_else(|| EffDirError::MalformedEntry {
            field: "prim_index".to_string(),
        })?;

    let mut rewrites: Vec<(usize, u32)> = Vec::new();
    for (i, reference) in prim.iter().enumerate() {
        let flag = reference
            .get_u8("flag")
            .ok_or_else(|| EffDirError::MalformedEntry {
                field: format!("prim_index[{i}].flag"),
            })?;
        let Some(target) = target_section(flag) else {
            continue;
        };
        let key = reference
            .get_u32("key")
            .ok_or_else(|| EffDirError::MalformedEntry {
                field: format!("prim_index[{i}].key"),
            })? as usize;

        let source = doc.section(target);
        let entry = source
            .entries
            .get(key)
            .ok_or(EffDirError::IndexOutOfRange {
                what: "primary index reference key",
                index: key,
                len: source.entries.len(),
            })?
            .clone();
        let dest = out.section_mut(target);
        dest.entries.push(entry);
        rewrites.push((i, (dest.entries.len() - 1) as u32));
    }

    let prim_out = out.section_mut(12).entries[0]
        .get_list_mut("prim_index")
        .ok_or_else(|| EffDirError::MalformedEntry {
            field: "prim_index".to_string(),
        })?;
    for (i, new_key) in rewrites {
        prim_out[i].set("key", Value::U32(new_key));
    }

    Ok(out)
}
