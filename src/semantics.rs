//! The semantic class table and the dense per-pixel lookup arrays derived
//! from it.
//!
//! Per-pixel id rasters are unsigned bytes; a ray that misses the mesh is
//! folded to [`VOID_INDEX`] (`0xFF`). The dense lookup arrays built here are
//! ordered by train id with the `void` entry appended, so a folded miss
//! resolves to `void` through [`dense_index`].

use static_assertions::const_assert;

/// One row of the semantic class table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassInformation {
    pub name: &'static str,
    pub train_id: i8,
    pub colour: [u8; 3],
}

const fn class(name: &'static str, train_id: i8, colour: [u8; 3]) -> ClassInformation {
    ClassInformation {
        name,
        train_id,
        colour,
    }
}

/// Canonical class list. Changing ids here invalidates every previously
/// generated dataset.
pub const SEMANTIC_CLASSES: [ClassInformation; 13] = [
    class("drivable", 0, [0, 255, 249]),
    class("road", 1, [84, 84, 84]),
    class("curb", 2, [255, 119, 51]),
    class("track_limit", 3, [255, 255, 255]),
    class("sand", 4, [255, 255, 0]),
    class("grass", 5, [170, 255, 128]),
    class("vehicle", 6, [255, 42, 0]),
    class("structure", 7, [153, 153, 255]),
    class("people", 8, [255, 179, 204]),
    class("vegetation", 9, [0, 255, 238]),
    class("carpet", 10, [0, 102, 17]),
    class("water", 11, [0, 0, 255]),
    class("void", -1, [0, 0, 0]),
];

/// Byte value standing in for "no intersection" in id rasters.
pub const VOID_INDEX: u8 = u8::MAX;

// Ids must be representable in a byte raster with room for the sentinel.
const_assert!(SEMANTIC_CLASSES.len() < u8::MAX as usize);

/// Looks a class up by name.
pub fn class_by_name(name: &str) -> Option<&'static ClassInformation> {
    SEMANTIC_CLASSES.iter().find(|info| info.name == name)
}

/// Train id for a class name, if registered.
pub fn name_to_train_id(name: &str) -> Option<i8> {
    class_by_name(name).map(|info| info.train_id)
}

/// RGB colour for a class name, if registered.
pub fn name_to_colour(name: &str) -> Option<[u8; 3]> {
    class_by_name(name).map(|info| info.colour)
}

/// Number of non-void classes.
pub fn class_count() -> usize {
    SEMANTIC_CLASSES.len() - 1
}

/// Position in the dense lookup arrays for a raster id byte, folding the
/// miss sentinel onto the trailing `void` slot.
#[inline]
pub fn dense_index(id: u8) -> usize {
    if id == VOID_INDEX {
        class_count()
    } else {
        id as usize
    }
}

fn sorted_non_void() -> Vec<&'static ClassInformation> {
    let mut classes: Vec<_> = SEMANTIC_CLASSES
        .iter()
        .filter(|info| info.train_id > -1)
        .collect();
    classes.sort_by_key(|info| info.train_id);
    classes
}

fn void_class() -> &'static ClassInformation {
    let void = SEMANTIC_CLASSES
        .iter()
        .filter(|info| info.train_id == -1)
        .collect::<Vec<_>>();
    assert!(void.len() == 1, "exactly one void class must be registered");
    void[0]
}

fn assert_table_invariants(classes: &[&'static ClassInformation]) {
    for (expected, info) in classes.iter().enumerate() {
        assert!(
            info.train_id as usize == expected,
            "train ids must be contiguous from 0, found {} at {}",
            info.train_id,
            expected
        );
    }
    for (i, a) in SEMANTIC_CLASSES.iter().enumerate() {
        for b in &SEMANTIC_CLASSES[i + 1..] {
            assert!(a.name != b.name, "duplicate class name {}", a.name);
        }
    }
}

/// Dense id -> RGB colour array, `void` appended last.
pub fn build_colour_list() -> Vec<[u8; 3]> {
    let classes = sorted_non_void();
    assert_table_invariants(&classes);
    let mut colours: Vec<[u8; 3]> = classes.iter().map(|info| info.colour).collect();
    colours.push(void_class().colour);
    colours
}

/// Dense id -> train id array, `void` appended last and stored as `0xFF`.
pub fn build_train_id_list() -> Vec<u8> {
    let classes = sorted_non_void();
    assert_table_invariants(&classes);
    let mut ids: Vec<u8> = classes.iter().map(|info| info.train_id as u8).collect();
    ids.push(void_class().train_id as u8);
    ids
}
