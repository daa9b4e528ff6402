//! The fifteen EffDir section schemas, the auxiliary record schema, and the
//! per-section count/marker rules.
//!
//! Everything format-specific about a section lives in its
//! [`SectionSchema`] row; the engine in the parent module is the only code
//! that executes these tables.  The end-of-section marker asymmetry
//! (sections 4–9, 12 and 15 have none; section 13 closes with two single
//! bytes instead of one u16) is table-driven, never decided at a call site.

use super::Step::{self, *};

// ── Count and marker rules ───────────────────────────────────────────────────

/// How a section's entry count appears in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountRule {
    /// A u32 count precedes the entries.
    Stored,
    /// Never stored: always `Section12.count + 1`.  The extra trailing
    /// entry is the structural closing entry, not a named effect.
    OneMoreThanSection12,
}

/// Shape of a section's end-of-section marker.  Marker bytes are opaque
/// and preserved verbatim through decode, transform and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    /// One 2-byte marker.
    U16,
    /// Two single-byte markers (section 13 only).
    TwoU8,
}

impl Marker {
    pub fn size(self) -> usize {
        match self {
            Marker::None => 0,
            Marker::U16 | Marker::TwoU8 => 2,
        }
    }
}

/// One row of the section table.
#[derive(Debug)]
pub struct SectionSchema {
    pub number: u8,
    /// Diagnostic label used in decode errors.
    pub label: &'static str,
    pub count: CountRule,
    pub steps: &'static [Step],
    pub marker: Marker,
}

// ── Shared sub-record shapes ─────────────────────────────────────────────────

const SCALAR: &[Step] = &[F32("value")];
const TRIPLE: &[Step] = &[F32("x"), F32("y"), F32("z")];

// ── Section 1: particle emitters ─────────────────────────────────────────────

const SEC01: &[Step] = &[
    U32("flags"),
    U16("variant"),
    F32("life_lo"),
    F32("life_hi"),
    F32("rate_delay_lo"),
    F32("rate_delay_hi"),
    F32("rate_trigger"),
    F32("emit_dir_lo_x"),
    F32("emit_dir_lo_y"),
    F32("emit_dir_lo_z"),
    F32("emit_dir_hi_x"),
    F32("emit_dir_hi_y"),
    F32("emit_dir_hi_z"),
    F32("emit_speed_lo"),
    F32("emit_speed_hi"),
    F32("emit_volume_lo_x"),
    F32("emit_volume_lo_y"),
    F32("emit_volume_lo_z"),
    F32("emit_volume_hi_x"),
    F32("emit_volume_hi_y"),
    F32("emit_volume_hi_z"),
    F32("torus_width"),
    F32("emit_scale_base"),
    F32("emit_rot_lo"),
    F32("emit_rot_hi"),
    F32("size_vary"),
    F32("spin_vary"),
    F32("alpha_vary"),
    F32("color_vary_r"),
    F32("color_vary_g"),
    F32("color_vary_b"),
    List("rate_curve", SCALAR),
    List("size_curve", SCALAR),
    List("aspect_curve", SCALAR),
    List("rotation_curve", SCALAR),
    List("alpha_curve", SCALAR),
    List("color_curve", TRIPLE),
    List("brightness_curve", SCALAR),
    List("stretch_curve", SCALAR),
    List("frame_events", &[Str("name"), F32("time")]),
    U32("texture_key"),
    U8("tile_count_u"),
    U8("tile_count_v"),
    U8("particle_align"),
    U8("draw_mode"),
    F32("frame_speed"),
    U8("frame_start"),
    U8("frame_count"),
    F32("camera_bias"),
    F32("density_field_scale"),
    F32("velocity_stretch"),
    F32("gravity"),
    F32("drag"),
    F32("vortex_spin"),
    F32("vortex_axis_x"),
    F32("vortex_axis_y"),
    F32("vortex_axis_z"),
    F32("vortex_attract"),
    F32("screw_rate"),
    F32("wind_strength"),
    List("random_walk_turns", SCALAR),
    F32("walk_speed_lo"),
    F32("walk_speed_hi"),
    U8("terrain_interaction"),
    F32("terrain_bounce"),
    F32("terrain_repel_height"),
    F32("terrain_repel_strength"),
    F32("terrain_repel_scout"),
    F32("terrain_repel_vertical"),
    F32("terrain_repel_kill_height"),
    U32("terminal"),
];

// ── Section 2: mesh decals ───────────────────────────────────────────────────

const SEC02: &[Step] = &[
    U32("flags"),
    U32("geometry_key"),
    U8("cull_mode"),
    U8("blend_mode"),
    F32("base_scale"),
    List("scale_curve", SCALAR),
    List("alpha_curve", SCALAR),
    List("brightness_curve", SCALAR),
    List("roll_curve", SCALAR),
    List("color_curve", TRIPLE),
    List("stretch_curve", SCALAR),
    F32("pitch"),
    F32("roll"),
    F32("yaw"),
    F32("offset_x"),
    F32("offset_y"),
    F32("offset_z"),
];

// ── Section 3: lights ────────────────────────────────────────────────────────

const SEC03: &[Step] = &[
    F32("intensity"),
    F32("radius"),
    List("attenuation_curve", SCALAR),
    List("flicker_curve", SCALAR),
    U16("light_type"),
    U8("shadow_flag"),
    U16("priority"),
];

// ── Section 4: force fields ──────────────────────────────────────────────────

const SEC04: &[Step] = &[
    List("points", TRIPLE),
    List("weights", SCALAR),
    F32("falloff"),
];

// ── Section 5: sounds ────────────────────────────────────────────────────────

const SEC05: &[Step] = &[
    U8("channel"),
    U8("loop_mode"),
    U32("sound_key"),
    F32("volume"),
    F32("attenuation"),
    Packed("location_mask", 5),
    F32("pitch_lo"),
    F32("pitch_hi"),
    F32("delay"),
    F32("fade_in"),
    F32("fade_out"),
];

// ── Section 6: named switches ────────────────────────────────────────────────

const SEC06: &[Step] = &[U16("slot"), Str("label"), U8("kind")];

// ── Section 7: camera shakes ─────────────────────────────────────────────────

const SEC07: &[Step] = &[
    Bytes("prelude", 22),
    F32("duration"),
    U32("key_a"),
    U32("key_b"),
    U32("key_c"),
    U32("key_d"),
    F32("strength"),
    F32("radius"),
    F32("period"),
    F32("phase"),
    U32("mode"),
    U32("seed"),
    U32("reserved"),
];

// ── Section 8: animation cue tracks ──────────────────────────────────────────

const SEC08: &[Step] = &[
    U16("track"),
    List("cues", &[F32("time"), F32("weight"), Str("target")]),
    U32("terminal"),
];

// ── Section 9: model overlays ────────────────────────────────────────────────

const SEC09: &[Step] = &[
    Packed("state_mask", 6),
    U32("model_key"),
    F32("scale"),
    F32("offset"),
];

// ── Section 10: anchor points ────────────────────────────────────────────────

const SEC10: &[Step] = &[F32("x"), F32("y"), F32("z")];

// ── Section 11: terrain brushes ──────────────────────────────────────────────

const SEC11: &[Step] = &[
    U32("kind"),
    Str("label"),
    U32("key_a"),
    U32("key_b"),
    U32("key_c"),
    F32("p0"),
    F32("p1"),
    F32("p2"),
    F32("p3"),
    F32("p4"),
];

// ── Section 12: effect descriptions ──────────────────────────────────────────
//
// The primary index is the cross-section reference list: each record's
// `flag` selects a target section (see `refs`) and `key` a position in it.

const PRIM_INDEX: &[Step] = &[
    Str("label"),
    U8("flag"),
    F32("time_lo"),
    F32("time_hi"),
    U32("selection_a"),
    U32("selection_b"),
    F32("offset_x"),
    F32("offset_y"),
    F32("offset_z"),
    F32("dir_x"),
    F32("dir_y"),
    F32("dir_z"),
    F32("scale_lo"),
    F32("scale_hi"),
    Packed("lod_mask", 5),
    Packed("flag_mask", 5),
    F32("emit_scale_lo"),
    F32("emit_scale_hi"),
    F32("size_scale"),
    F32("alpha_scale"),
    U16("repeat"),
    U16("priority"),
    U32("key"),
];

const SEC_INDEX: &[Step] = &[U32("kind"), Str("label"), U32("group"), U32("key")];

const SEC12: &[Step] = &[
    U32("flags"),
    U32("group"),
    List("prim_index", PRIM_INDEX),
    List("sec_index", SEC_INDEX),
    U32("bounds_key"),
    U32("cursor_a"),
    U32("cursor_b"),
    U32("cursor_c"),
];

// ── Section 13: effect name directory ────────────────────────────────────────
//
// `index_key` names the section 12 entry this effect denotes.  The entry
// count is never stored; see `CountRule::OneMoreThanSection12`.

const SEC13: &[Step] = &[Str("name"), U32("index_key")];

// ── Auxiliary record ("13.5") ────────────────────────────────────────────────

const AUX: &[Step] = &[
    I8("priority"),
    U32("seed"),
    F32("lod_near"),
    F32("lod_far"),
    F32("fade_near"),
    F32("fade_far"),
    F32("scale"),
    F32("time_scale"),
    F32("wind_x"),
    F32("wind_y"),
    F32("wind_z"),
];

// ── Section 14: visual groups ────────────────────────────────────────────────

const SEC14: &[Step] = &[Str("name"), U32("key_a"), U32("key_b")];

// ── Section 15: class registry ───────────────────────────────────────────────

const SEC15: &[Step] = &[U32("class_id"), Str("label")];

// ── The section table ────────────────────────────────────────────────────────

pub const SECTIONS: [SectionSchema; 15] = [
    SectionSchema { number: 1,  label: "section 1",  count: CountRule::Stored, steps: SEC01, marker: Marker::U16 },
    SectionSchema { number: 2,  label: "section 2",  count: CountRule::Stored, steps: SEC02, marker: Marker::U16 },
    SectionSchema { number: 3,  label: "section 3",  count: CountRule::Stored, steps: SEC03, marker: Marker::U16 },
    SectionSchema { number: 4,  label: "section 4",  count: CountRule::Stored, steps: SEC04, marker: Marker::None },
    SectionSchema { number: 5,  label: "section 5",  count: CountRule::Stored, steps: SEC05, marker: Marker::None },
    SectionSchema { number: 6,  label: "section 6",  count: CountRule::Stored, steps: SEC06, marker: Marker::None },
    SectionSchema { number: 7,  label: "section 7",  count: CountRule::Stored, steps: SEC07, marker: Marker::None },
    SectionSchema { number: 8,  label: "section 8",  count: CountRule::Stored, steps: SEC08, marker: Marker::None },
    SectionSchema { number: 9,  label: "section 9",  count: CountRule::Stored, steps: SEC09, marker: Marker::None },
    SectionSchema { number: 10, label: "section 10", count: CountRule::Stored, steps: SEC10, marker: Marker::U16 },
    SectionSchema { number: 11, label: "section 11", count: CountRule::Stored, steps: SEC11, marker: Marker::U16 },
    SectionSchema { number: 12, label: "section 12", count: CountRule::Stored, steps: SEC12, marker: Marker::None },
    SectionSchema { number: 13, label: "section 13", count: CountRule::OneMoreThanSection12, steps: SEC13, marker: Marker::TwoU8 },
    SectionSchema { number: 14, label: "section 14", count: CountRule::Stored, steps: SEC14, marker: Marker::U16 },
    SectionSchema { number: 15, label: "section 15", count: CountRule::Stored, steps: SEC15, marker: Marker::None },
];

/// The fixed auxiliary record written between sections 13 and 14.
pub const AUX_SCHEMA: &[Step] = AUX;

/// Look up a section schema by its 1-based section number.
///
/// # Panics
/// Panics if `number` is not in 1..=15; section numbers inside this crate
/// come from the table itself or from the reference-flag map, both closed.
pub fn schema_for(number: u8) -> &'static SectionSchema {
    &SECTIONS[number as usize - 1]
}
