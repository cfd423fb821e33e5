//! Per-track profiles: which geometries to drop from the mesh, which vertex
//! groups to neutralise before loading, and how material names map onto
//! semantic classes.
//!
//! Register new [`TrackData`] instances in [`track_data`] to make them
//! available from configuration.

use std::collections::HashMap;

use crate::error::Error;
use crate::semantics::name_to_train_id;
use crate::Result;

mod monza;
mod mt_panorama;

pub use monza::MONZA_DATA;
pub use mt_panorama::MT_PANORAMA_DATA;

/// Static description of one track.
#[derive(Debug, Clone, Copy)]
pub struct TrackData {
    /// Geometry names deleted from the scene after loading.
    pub geometries_to_remove: &'static [&'static str],
    /// Vertex groups whose material is rewritten to `physics` by the mesh
    /// preparer.
    pub vertex_groups_to_modify: &'static [&'static str],
    /// Material name -> semantic class name.
    pub material_to_class: &'static [(&'static str, &'static str)],
}

impl TrackData {
    /// Resolves the material map against the semantic class table.
    ///
    /// Every class name must be registered; a typo here would otherwise only
    /// surface as mislabelled pixels.
    pub fn material_to_id(&self) -> Result<HashMap<&'static str, u8>> {
        let mut map = HashMap::with_capacity(self.material_to_class.len());
        for &(material, class) in self.material_to_class {
            let train_id = name_to_train_id(class).ok_or_else(|| Error::UnknownClass {
                material: material.to_owned(),
                class: class.to_owned(),
            })?;
            map.insert(material, train_id as u8);
        }
        Ok(map)
    }
}

/// Looks a registered track up by its configuration name.
pub fn track_data(name: &str) -> Result<&'static TrackData> {
    match name {
        "monza" => Ok(&MONZA_DATA),
        "mount_panorama" => Ok(&MT_PANORAMA_DATA),
        _ => Err(Error::UnknownTrack(name.to_owned())),
    }
}
