//! The reference-flag table.
//!
//! A section 12 primary-index record carries a (flag, key) pair; the flag
//! selects which section the key indexes into.  The mapping is fixed and
//! covers a known finite set.  Flags outside the set (2 and 9 among them)
//! are reserved or redirect markers: they are never dereferenced and any
//! transform must pass them through untouched.

/// Resolve a reference flag to its 1-based target section number.
/// Returns `None` for reserved/unresolvable flags.
pub fn target_section(flag: u8) -> Option<u8> {
    match flag {
        0 => Some(1),
        1 => Some(2),
        3 => Some(4),
        4 => Some(6),
        5 => Some(7),
        6 => Some(8),
        7 => Some(9),
        8 => Some(10),
        10 => Some(11),
        _ => None,
    }
}

/// Whether a flag denotes a dereferenceable cross-section reference.
pub fn is_resolvable(flag: u8) -> bool {
    target_section(flag).is_some()
}
