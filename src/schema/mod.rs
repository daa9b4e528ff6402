//! Schema engine: section layouts are data, not code.
//!
//! Every section of an EffDir file is described by an ordered table of
//! [`Step`]s.  One engine ([`read_entry`] / [`write_entry`]) executes a
//! table in either direction, so the decode and encode paths cannot drift
//! apart — symmetry is the core correctness property of the codec.
//!
//! Three structural patterns cover the whole format:
//!   - flat record: a fixed sequence of scalar steps;
//!   - counted sub-list: [`Step::List`] — a u32 count then that many
//!     repetitions of a nested step table.  Encode always writes the
//!     sequence's actual length, never a stored count;
//!   - counted string: [`Step::Str`] — a u32 byte length then the bytes.
//!     Zero length is valid; encode re-derives the length.
//!
//! Decoded entries are [`Record`]s: ordered (name, [`Value`]) pairs aligned
//! with their step table.  The fifteen section tables live in [`sections`].

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{EffDirError, Result};
use crate::raw::{ByteReader, ByteWriter};

pub mod sections;

pub use sections::{schema_for, CountRule, Marker, SectionSchema, AUX_SCHEMA, SECTIONS};

// ── Steps ────────────────────────────────────────────────────────────────────

/// One typed field step in a section schema.
///
/// `Bytes` is a fixed-size opaque run; `Packed` is an n-byte (1..=8)
/// little-endian unsigned value used for the format's sub-32-bit-aligned
/// bit fields; `List` is a counted sub-list over a nested step table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    U8(&'static str),
    U16(&'static str),
    U32(&'static str),
    I8(&'static str),
    I16(&'static str),
    I32(&'static str),
    F32(&'static str),
    Bytes(&'static str, usize),
    Packed(&'static str, usize),
    Str(&'static str),
    List(&'static str, &'static [Step]),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match *self {
            Step::U8(n)
            | Step::U16(n)
            | Step::U32(n)
            | Step::I8(n)
            | Step::I16(n)
            | Step::I32(n)
            | Step::F32(n)
            | Step::Bytes(n, _)
            | Step::Packed(n, _)
            | Step::Str(n)
            | Step::List(n, _) => n,
        }
    }
}

// ── Values ───────────────────────────────────────────────────────────────────

/// A decoded field value.  Counts are never stored: a `List` carries only
/// its elements and a `Str` only its text; the engine derives both lengths
/// at encode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
    F32(f32),
    Bytes(Vec<u8>),
    Packed(u64),
    Str(String),
    List(Vec<Record>),
}

/// One decoded entry: ordered (field name, value) pairs, aligned with the
/// step table that produced it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from literal (name, value) pairs.  Test and builder
    /// convenience; the pairs must match the target schema's order.
    pub fn of(pairs: &[(&str, Value)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(n, v)| (n.to_string(), v.clone()))
                .collect(),
        }
    }

    pub fn push(&mut self, name: &str, value: Value) {
        self.fields.push((name.to_string(), value));
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Replace the value of an existing field.  Returns false if the field
    /// is not present (the record is then malformed for its schema).
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    pub fn get_u8(&self, name: &str) -> Option<u8> {
        match self.get(name) {
            Some(Value::U8(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_u32(&self, name: &str) -> Option<u32> {
        match self.get(name) {
            Some(Value::U32(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_list(&self, name: &str) -> Option<&Vec<Record>> {
        match self.get(name) {
            Some(Value::List(l)) => Some(l),
            _ => None,
        }
    }

    pub fn get_list_mut(&mut self, name: &str) -> Option<&mut Vec<Record>> {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, Value::List(l))) => Some(l),
            _ => None,
        }
    }
}

/// Build an all-zero record for a step table: scalars zeroed, byte runs
/// zero-filled, strings empty, lists empty.  Useful as a starting point for
/// programmatic document construction.
pub fn default_entry(steps: &[Step]) -> Record {
    let mut rec = Record::new();
    for step in steps {
        let value = match *step {
            Step::U8(_) => Value::U8(0),
            Step::U16(_) => Value::U16(0),
            Step::U32(_) => Value::U32(0),
            Step::I8(_) => Value::I8(0),
            Step::I16(_) => Value::I16(0),
            Step::I32(_) => Value::I32(0),
            Step::F32(_) => Value::F32(0.0),
            Step::Bytes(_, n) => Value::Bytes(vec![0; n]),
            Step::Packed(_, _) => Value::Packed(0),
            Step::Str(_) => Value::Str(String::new()),
            Step::List(_, _) => Value::List(Vec::new()),
        };
        rec.push(step.name(), value);
    }
    rec
}

// ── Decode ───────────────────────────────────────────────────────────────────

/// A schema step failure with the full field path, before the document
/// layer attaches section and entry context.
#[derive(Debug)]
pub struct FieldError {
    pub field: String,
    pub cause: EffDirError,
}

/// Decode one entry by executing `steps` against the reader.
pub fn read_entry(r: &mut ByteReader<'_>, steps: &[Step]) -> std::result::Result<Record, FieldError> {
    let mut rec = Record::new();
    for step in steps {
        let value = read_step(r, step)?;
        rec.push(step.name(), value);
    }
    Ok(rec)
}

fn read_step(r: &mut ByteReader<'_>, step: &Step) -> std::result::Result<Value, FieldError> {
    let fail = |cause: EffDirError| FieldError {
        field: step.name().to_string(),
        cause,
    };
    match *step {
        Step::U8(_) => r.read_u8().map(Value::U8).map_err(fail),
        Step::U16(_) => r.read_u16().map(Value::U16).map_err(fail),
        Step::U32(_) => r.read_u32().map(Value::U32).map_err(fail),
        Step::I8(_) => r.read_i8().map(Value::I8).map_err(fail),
        Step::I16(_) => r.read_i16().map(Value::I16).map_err(fail),
        Step::I32(_) => r.read_i32().map(Value::I32).map_err(fail),
        Step::F32(_) => r.read_f32().map(Value::F32).map_err(fail),
        Step::Bytes(_, n) => r.read_bytes(n).map(Value::Bytes).map_err(fail),
        Step::Packed(_, n) => r.read_packed(n).map(Value::Packed).map_err(fail),
        Step::Str(_) => r.read_counted_str().map(Value::Str).map_err(fail),
        Step::List(name, sub_steps) => {
            let count = r.read_u32().map_err(|c| FieldError {
                field: format!("{name}.count"),
                cause: c,
            })? as usize;
            let mut items = Vec::with_capacity(count.min(4096));
            for i in 0..count {
                let item = read_entry(r, sub_steps).map_err(|e| FieldError {
                    field: format!("{name}[{i}].{}", e.field),
                    cause: e.cause,
                })?;
                items.push(item);
            }
            Ok(Value::List(items))
        }
    }
}

// ── Encode ───────────────────────────────────────────────────────────────────

/// Encode one entry by executing `steps` against the writer.
///
/// The record must line up with the step table positionally (same names,
/// same order, matching value types) or [`EffDirError::MalformedEntry`] is
/// returned.  List counts and string lengths are derived from the values
/// themselves; a stale count cannot be written.
pub fn write_entry<W: Write>(w: &mut ByteWriter<W>, steps: &[Step], rec: &Record) -> Result<()> {
    if rec.fields.len() != steps.len() {
        let field = steps
            .get(rec.fields.len())
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| "trailing fields".to_string());
        return Err(EffDirError::MalformedEntry { field });
    }
    for (step, (name, value)) in steps.iter().zip(&rec.fields) {
        if name != step.name() {
            return Err(EffDirError::MalformedEntry {
                field: step.name().to_string(),
            });
        }
        write_step(w, step, value)?;
    }
    Ok(())
}

fn write_step<W: Write>(w: &mut ByteWriter<W>, step: &Step, value: &Value) -> Result<()> {
    let malformed = || EffDirError::MalformedEntry {
        field: step.name().to_string(),
    };
    match (*step, value) {
        (Step::U8(_), Value::U8(v)) => w.write_u8(*v),
        (Step::U16(_), Value::U16(v)) => w.write_u16(*v),
        (Step::U32(_), Value::U32(v)) => w.write_u32(*v),
        (Step::I8(_), Value::I8(v)) => w.write_i8(*v),
        (Step::I16(_), Value::I16(v)) => w.write_i16(*v),
        (Step::I32(_), Value::I32(v)) => w.write_i32(*v),
        (Step::F32(_), Value::F32(v)) => w.write_f32(*v),
        (Step::Bytes(_, n), Value::Bytes(b)) => {
            if b.len() != n {
                return Err(malformed());
            }
            w.write_bytes(b)
        }
        (Step::Packed(_, n), Value::Packed(v)) => {
            // A value wider than the field cannot be written; byteorder
            // would panic inside write_uint.
            if n < 8 && *v >> (8 * n) != 0 {
                return Err(malformed());
            }
            w.write_packed(*v, n)
        }
        (Step::Str(_), Value::Str(s)) => w.write_counted_str(s),
        (Step::List(_, sub_steps), Value::List(items)) => {
            w.write_u32(items.len() as u32)?;
            for item in items {
                write_entry(w, sub_steps, item)?;
            }
            Ok(())
        }
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INNER: &[Step] = &[Step::F32("value")];
    const TABLE: &[Step] = &[
        Step::U16("kind"),
        Step::Str("label"),
        Step::List("curve", INNER),
        Step::Packed("mask", 5),
    ];

    fn encode(rec: &Record) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut w = ByteWriter::new(&mut buf);
        write_entry(&mut w, TABLE, rec).unwrap();
        buf
    }

    #[test]
    fn entry_roundtrips() {
        let mut rec = default_entry(TABLE);
        rec.set("kind", Value::U16(7));
        rec.set("label", Value::Str("spark".into()));
        rec.get_list_mut("curve")
            .unwrap()
            .push(Record::of(&[("value", Value::F32(0.25))]));
        rec.set("mask", Value::Packed(0xAB_CD));

        let buf = encode(&rec);
        let mut r = ByteReader::new(&buf);
        let back = read_entry(&mut r, TABLE).unwrap();
        assert!(r.is_empty());
        assert_eq!(back, rec);
    }

    #[test]
    fn list_count_is_derived_from_length() {
        let mut rec = default_entry(TABLE);
        let curve = rec.get_list_mut("curve").unwrap();
        for i in 0..3 {
            curve.push(Record::of(&[("value", Value::F32(i as f32))]));
        }
        let buf = encode(&rec);
        // u16 kind + u32 label length → count starts at offset 6.
        assert_eq!(&buf[6..10], &3u32.to_le_bytes());
    }

    #[test]
    fn nested_failure_names_the_sublist_position() {
        let mut rec = default_entry(TABLE);
        let point = Record::of(&[("value", Value::F32(1.0))]);
        rec.get_list_mut("curve")
            .unwrap()
            .extend([point.clone(), point]);
        let mut buf = encode(&rec);
        buf.truncate(buf.len() - 5 - 2); // drop mask + half the last float
        let mut r = ByteReader::new(&buf);
        let err = read_entry(&mut r, TABLE).unwrap_err();
        assert_eq!(err.field, "curve[1].value");
        assert!(matches!(
            err.cause,
            EffDirError::UnexpectedEndOfInput { needed: 4, remaining: 2 }
        ));
    }

    #[test]
    fn oversized_packed_value_is_malformed() {
        let mut rec = default_entry(TABLE);
        // Largest value that fits the 5-byte field still encodes.
        rec.set("mask", Value::Packed((1 << 40) - 1));
        encode(&rec);

        rec.set("mask", Value::Packed(1 << 40));
        let mut buf = Vec::new();
        let mut w = ByteWriter::new(&mut buf);
        let err = write_entry(&mut w, TABLE, &rec).unwrap_err();
        assert!(matches!(err, EffDirError::MalformedEntry { field } if field == "mask"));
    }

    #[test]
    fn type_mismatch_is_malformed() {
        let mut rec = default_entry(TABLE);
        rec.set("kind", Value::U32(7));
        let mut buf = Vec::new();
        let mut w = ByteWriter::new(&mut buf);
        let err = write_entry(&mut w, TABLE, &rec).unwrap_err();
        assert!(matches!(err, EffDirError::MalformedEntry { field } if field == "kind"));
    }

    #[test]
    fn misordered_fields_are_malformed() {
        let rec = Record::of(&[
            ("label", Value::Str(String::new())),
            ("kind", Value::U16(0)),
            ("curve", Value::List(Vec::new())),
            ("mask", Value::Packed(0)),
        ]);
        let mut buf = Vec::new();
        let mut w = ByteWriter::new(&mut buf);
        assert!(write_entry(&mut w, TABLE, &rec).is_err());
    }
}
