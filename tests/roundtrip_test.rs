mod common;

use common::sample_doc;
use effdir::{EffDir, EffDirError};

#[test]
fn document_roundtrips_byte_for_byte() {
    let doc = sample_doc();
    let bytes = doc.to_bytes().unwrap();
    let back = EffDir::decode(&bytes).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.to_bytes().unwrap(), bytes);
}

#[test]
fn stored_counts_match_entry_sequences() {
    let doc = sample_doc();
    let bytes = doc.to_bytes().unwrap();
    // Section 1's count immediately follows the 4-byte header.
    assert_eq!(&bytes[4..8], &4u32.to_le_bytes());
    let back = EffDir::decode(&bytes).unwrap();
    assert_eq!(back.section(1).entries.len(), 4);
}

#[test]
fn section_13_count_is_section_12_plus_one() {
    let doc = sample_doc();
    let back = EffDir::decode(&doc.to_bytes().unwrap()).unwrap();
    assert_eq!(
        back.section(13).entries.len(),
        back.section(12).entries.len() + 1
    );
}

#[test]
fn markers_survive_the_roundtrip() {
    let doc = sample_doc();
    let back = EffDir::decode(&doc.to_bytes().unwrap()).unwrap();
    assert_eq!(back.section(1).eos, vec![0xFF, 0xFF]);
    assert!(back.section(12).eos.is_empty());
    assert_eq!(back.section(13).eos.len(), 2);
}

#[test]
fn truncation_mid_section_1_names_section_and_field() {
    let doc = sample_doc();
    let mut bytes = doc.to_bytes().unwrap();
    // Header (4) + section 1 count (4) + flags (4) + variant (2) +
    // life_lo (4) = 18; cut life_hi in half.
    bytes.truncate(20);
    match EffDir::decode(&bytes) {
        Err(EffDirError::Decode { section, entry_index, field, cause }) => {
            assert_eq!(section, "section 1");
            assert_eq!(entry_index, 0);
            assert_eq!(field, "life_hi");
            assert!(matches!(
                *cause,
                EffDirError::UnexpectedEndOfInput { needed: 4, remaining: 2 }
            ));
        }
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[test]
fn truncation_inside_a_sublist_names_the_position() {
    let doc = sample_doc();
    let full = doc.to_bytes().unwrap();

    // Shave bytes off the end until the failure lands inside section 1's
    // first rate_curve element, then check the path.
    let mut found = false;
    for cut in (8..full.len()).rev() {
        if let Err(EffDirError::Decode { section, field, .. }) = EffDir::decode(&full[..cut]) {
            if section == "section 1" && field.starts_with("rate_curve[") {
                found = true;
                break;
            }
        }
    }
    assert!(found, "no truncation point hit the rate_curve sub-list");
}
