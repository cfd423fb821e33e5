//! Track mesh preparation and loading.
//!
//! Preparation is a single-pass, line-oriented rewrite of the Wavefront
//! text: every vertex group named in the track profile has its material
//! assignment replaced with the sentinel `physics`, which the committed
//! scene later refuses to cast rays against. Flipping the material is a
//! one-pass filter that survives any loader, where geometric deletion would
//! need the group structure reassembled first.
//!
//! The loader reads the subset of the format the pipeline needs (`v`, `f`,
//! `usemtl`) and groups faces by material, so geometry names seen by the
//! rest of the system are material names. Material identity is taken from
//! the `usemtl` stream itself; the sentinel material is deliberately absent
//! from any material library, so resolving through one would lose it.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use cgmath::Vector3;
use tracing::info;

use crate::error::Error;
use crate::scene::{CommittedScene, Geometry, Scene, Triangle};
use crate::tracks::TrackData;
use crate::Result;

/// Material assigned to faces before any `usemtl` directive.
const DEFAULT_MATERIAL: &str = "default";

/// Rewrites the material of the track's targeted vertex groups to `physics`.
///
/// Applying the rewrite to an already-prepared mesh is a no-op as long as
/// the sentinel name is not itself a targeted vertex group.
pub fn preprocess_track_mesh(
    track_mesh: &Path,
    modified_mesh: &Path,
    track: &TrackData,
) -> Result<()> {
    let mut reader = BufReader::new(File::open(track_mesh)?);
    let mut writer = BufWriter::new(File::create(modified_mesh)?);
    let mut is_modifying = false;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.contains("g ") && !line.contains("g off") {
            is_modifying = false;
        }
        if is_vertex_group_to_modify(&line, track) {
            is_modifying = true;
        }
        if is_modifying && line.contains("usemtl") {
            writer.write_all(b"usemtl physics\n")?;
        } else {
            writer.write_all(line.as_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn is_vertex_group_to_modify(line: &str, track: &TrackData) -> bool {
    track
        .vertex_groups_to_modify
        .iter()
        .any(|name| line.contains(name))
}

/// Parses a Wavefront mesh into a [`Scene`], one geometry per material.
pub fn load_scene(path: &Path) -> Result<Scene> {
    let reader = BufReader::new(File::open(path)?);
    let mut positions: Vec<Vector3<f32>> = Vec::new();
    let mut geometries: Vec<Geometry> = Vec::new();
    let mut material_index: Option<usize> = None;

    let malformed = |line_no: usize, message: &str| Error::MalformedMesh {
        path: path.to_owned(),
        line: line_no,
        message: message.to_owned(),
    };

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut component = |which: &str| -> Result<f32> {
                    tokens
                        .next()
                        .and_then(|token| token.parse().ok())
                        .ok_or_else(|| malformed(line_no, &format!("bad vertex {which}")))
                };
                let x = component("x")?;
                let y = component("y")?;
                let z = component("z")?;
                positions.push(Vector3::new(x, y, z));
            }
            Some("usemtl") => {
                let name = tokens.next().unwrap_or(DEFAULT_MATERIAL);
                material_index = Some(geometry_for_material(&mut geometries, name));
            }
            Some("f") => {
                let corners: Vec<usize> = tokens
                    .map(|token| resolve_face_index(token, positions.len()))
                    .collect::<Option<_>>()
                    .ok_or_else(|| malformed(line_no, "bad face index"))?;
                if corners.len() < 3 {
                    return Err(malformed(line_no, "face with fewer than 3 vertices"));
                }
                let index = *material_index
                    .get_or_insert_with(|| geometry_for_material(&mut geometries, DEFAULT_MATERIAL));
                let triangles = &mut geometries[index].triangles;
                // Fan triangulation keeps indices stable for polygons.
                for i in 1..corners.len() - 1 {
                    triangles.push(Triangle::new(
                        positions[corners[0]],
                        positions[corners[i]],
                        positions[corners[i + 1]],
                    ));
                }
            }
            // Groups, objects, normals, texcoords and material libraries
            // carry nothing the collision scene needs.
            _ => {}
        }
    }
    let mut scene = Scene::new();
    for geometry in geometries {
        scene.attach_geometry(geometry);
    }
    Ok(scene)
}

fn geometry_for_material(geometries: &mut Vec<Geometry>, name: &str) -> usize {
    if let Some(index) = geometries.iter().position(|g| g.name == name) {
        return index;
    }
    geometries.push(Geometry {
        name: name.to_owned(),
        triangles: Vec::new(),
    });
    geometries.len() - 1
}

/// Resolves one face corner (`v`, `v/vt`, `v//vn`, negative forms) to a
/// zero-based position index.
fn resolve_face_index(token: &str, n_positions: usize) -> Option<usize> {
    let head = token.split('/').next()?;
    let raw: i64 = head.parse().ok()?;
    let index = if raw < 0 {
        n_positions as i64 + raw
    } else {
        raw - 1
    };
    if index < 0 || index as usize >= n_positions {
        return None;
    }
    Some(index as usize)
}

/// Loads the collision scene from an already-prepared mesh: parse, drop the
/// profile's geometry removal list and commit.
///
/// The rewrite itself runs exactly once per run (in the supervisor, before
/// any worker spawns); afterwards the prepared file is read-only and every
/// worker loads its own private copy through this function.
pub fn load_prepared_mesh(modified_mesh: &Path, track: &TrackData) -> Result<CommittedScene> {
    let mut scene = load_scene(modified_mesh)?;
    scene.delete_geometries(track.geometries_to_remove);
    let committed = scene.commit();
    info!(triangles = committed.n_triangles(), "track mesh loaded");
    Ok(committed)
}
