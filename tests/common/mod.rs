//! Shared builders for integration tests: a small but fully wired document
//! with four particle entries, one effect description, and a mix of
//! resolvable and reserved references.

use effdir::schema::{default_entry, schema_for, Step};
use effdir::{EffDir, Record, Value};

/// Nested step table of a counted sub-list field.
pub fn sub_table(section: u8, list: &str) -> &'static [Step] {
    schema_for(section)
        .steps
        .iter()
        .find_map(|s| match s {
            Step::List(n, sub) if *n == list => Some(*sub),
            _ => None,
        })
        .unwrap_or_else(|| panic!("section {section} has no list field `{list}`"))
}

pub fn scalar(v: f32) -> Record {
    Record::of(&[("value", Value::F32(v))])
}

pub fn sec1_entry(seed: u32) -> Record {
    let mut e = default_entry(schema_for(1).steps);
    e.set("flags", Value::U32(seed));
    e.set("life_lo", Value::F32(seed as f32 * 0.25));
    e.get_list_mut("rate_curve").unwrap().push(scalar(1.0));
    e.get_list_mut("rate_curve").unwrap().push(scalar(0.0));
    e.get_list_mut("color_curve").unwrap().push(Record::of(&[
        ("x", Value::F32(1.0)),
        ("y", Value::F32(0.5)),
        ("z", Value::F32(0.25)),
    ]));
    e.get_list_mut("frame_events").unwrap().push(Record::of(&[
        ("name", Value::Str(format!("spawn_{seed}"))),
        ("time", Value::F32(0.1)),
    ]));
    e
}

pub fn prim_ref(flag: u8, key: u32) -> Record {
    let mut r = default_entry(sub_table(12, "prim_index"));
    r.set("label", Value::Str(format!("ref_{flag}_{key}")));
    r.set("flag", Value::U8(flag));
    r.set("key", Value::U32(key));
    r
}

pub fn effect_entry(name: &str, index_key: u32) -> Record {
    let mut e = default_entry(schema_for(13).steps);
    e.set("name", Value::Str(name.to_string()));
    e.set("index_key", Value::U32(index_key));
    e
}

/// One effect referencing section 1 entry 2 (flag 0) plus one reserved
/// flag-99 reference whose key must survive every transform untouched.
pub fn sample_doc() -> EffDir {
    let mut doc = EffDir::new();
    doc.version = (1, 0);

    for seed in 0..4 {
        doc.section_mut(1).entries.push(sec1_entry(100 + seed));
    }

    let mut desc = default_entry(schema_for(12).steps);
    desc.set("flags", Value::U32(7));
    {
        let prim = desc.get_list_mut("prim_index").unwrap();
        prim.push(prim_ref(0, 2));
        prim.push(prim_ref(99, 5));
    }
    desc.get_list_mut("sec_index").unwrap().push(Record::of(&[
        ("kind", Value::U32(1)),
        ("label", Value::Str("secondary".into())),
        ("group", Value::U32(0)),
        ("key", Value::U32(0)),
    ]));
    doc.section_mut(12).entries.push(desc);

    // EffDir::new seeded the closing entry; named effects go before it.
    doc.section_mut(13)
        .entries
        .insert(0, effect_entry("fire_large", 0));

    doc.section_mut(1).eos = vec![0xFF, 0xFF];
    doc
}
