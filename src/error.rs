use std::io;
use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// Decode failures always surface as [`EffDirError::Decode`] wrapping the
/// primitive-level cause, so the caller sees exactly which schema step of
/// which entry could not be read.  Unrecognized reference flags are never an
/// error — they are a designed pass-through path (see `refs`).
#[derive(Error, Debug)]
pub enum EffDirError {
    /// The input slice ran out before the schema was satisfied.
    #[error("unexpected end of input: needed {needed} byte(s), {remaining} remaining")]
    UnexpectedEndOfInput { needed: usize, remaining: usize },

    /// A schema step failed while decoding one entry.  `field` is the full
    /// step path, including sub-list positions (e.g. `prim_index[3].key`).
    #[error("decode failed in {section}, entry {entry_index}, field `{field}`: {cause}")]
    Decode {
        section: &'static str,
        entry_index: usize,
        field: String,
        cause: Box<EffDirError>,
    },

    /// The output sink rejected a write.  Propagated unchanged.
    #[error("write to output sink failed: {0}")]
    Sink(#[from] io::Error),

    /// A lookup into an entry sequence fell outside it.  Raised by the
    /// isolation transform; the whole transform fails, no partial document.
    #[error("{what}: index {index} out of range (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Section 13 must hold exactly `Section12.count + 1` entries.  Encode
    /// enforces this rather than writing a file no decoder can re-read.
    #[error("section 13 must hold {expected} entries (section 12 count + 1), found {actual}")]
    Section13Count { expected: usize, actual: usize },

    /// A programmatically built entry does not line up with its section
    /// schema (missing field, wrong type, or wrong order).
    #[error("entry field `{field}` is missing or has the wrong type for its schema")]
    MalformedEntry { field: String },

    #[error("snapshot (de)serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EffDirError>;
