//! End-to-end pipeline runs over a synthetic track.
//!
//! The scene is three stacked walls in front of the camera: a full road
//! wall at z = -10, a grass wall covering the upper half of the view at
//! z = -8, and a sand wall at z = -5 inside a pit vertex group, which the
//! mesh preparer must neutralise. Every record therefore labels the upper
//! half grass and the lower half road, with no sand anywhere.

use std::collections::HashSet;
use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use gtgen::{Configuration, DataGenerationPipeline};
use image::RgbImage;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

const ROAD_TRAIN_ID: u8 = 1;
const GRASS_TRAIN_ID: u8 = 5;
const VOID_TRAIN_ID: u8 = 255;

const TRACK_OBJ: &str = "\
v -100 -100 -10
v 100 -100 -10
v 100 100 -10
v -100 100 -10
usemtl apsh-shader-norm
f 1 2 3 4
v -100 0 -8
v 100 0 -8
v 100 100 -8
v -100 100 -8
usemtl grass-shader
f 5 6 7 8
g AC_PIT
v -100 -100 -5
v 100 -100 -5
v 100 100 -5
v -100 100 -5
usemtl sand
f 9 10 11 12
";

fn write_state_record(path: &Path) {
    // Sixteen little-endian floats, then five 12-unit UTF-16 strings.
    let mut floats = [0.0_f32; 16];
    floats[13] = PI; // heading: cancels the -z forward flip
    let mut bytes = Vec::new();
    for value in floats {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes.extend_from_slice(&[0_u8; 5 * 12 * 2]);
    fs::write(path, bytes).unwrap();
}

fn write_recording(dir: &Path, n_records: usize) {
    for id in 0..n_records {
        write_state_record(&dir.join(format!("{id}.bin")));
        let mut frame = RgbImage::new(WIDTH, HEIGHT);
        for (x, y, px) in frame.enumerate_pixels_mut() {
            px.0 = [(x * 3) as u8, (y * 5) as u8, 90];
        }
        frame.save(dir.join(format!("{id}.jpeg"))).unwrap();
    }
}

struct Fixture {
    root: tempfile::TempDir,
}

impl Fixture {
    fn new(n_records: usize) -> Fixture {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("recording")).unwrap();
        write_recording(&root.path().join("recording"), n_records);
        fs::write(root.path().join("track.obj"), TRACK_OBJ).unwrap();
        Fixture { root }
    }

    fn output_dir(&self, name: &str) -> std::path::PathBuf {
        self.root.path().join(name)
    }

    fn run(&self, name: &str, generate: &str, n_ray_casters: usize, n_generators: usize) {
        let config_text = format!(
            concat!(
                "track_mesh_path = {mesh:?}\n",
                "recorded_data_path = {recording:?}\n",
                "output_path = {output:?}\n",
                "track_name = \"monza\"\n",
                "car_name = \"invisible_car\"\n",
                "image_size = [{width}, {height}]\n",
                "vertical_fov = 60.0\n",
                "n_ray_casting_workers = {rc}\n",
                "n_generation_workers = {gen}\n",
                "{generate}"
            ),
            mesh = self.root.path().join("track.obj"),
            recording = self.root.path().join("recording"),
            output = self.output_dir(name),
            width = WIDTH,
            height = HEIGHT,
            rc = n_ray_casters,
            gen = n_generators,
            generate = generate,
        );
        let config_path = self.root.path().join(format!("{name}.toml"));
        fs::write(&config_path, config_text).unwrap();
        let config = Configuration::load(&config_path).unwrap();
        DataGenerationPipeline::new(config).unwrap().start().unwrap();
    }
}

const FULL_GENERATE: &str = "[generate]\n\
    segmentation = [\"visuals\", \"data\", \"overlays\"]\n\
    normals = [\"visuals\"]\n\
    depth = [\"visuals\"]\n";

const NO_DEPTH_GENERATE: &str = "[generate]\n\
    segmentation = [\"visuals\", \"data\"]\n\
    normals = [\"visuals\"]\n";

fn colour_table() -> HashSet<[u8; 3]> {
    gtgen::semantics::SEMANTIC_CLASSES
        .iter()
        .map(|class| class.colour)
        .collect()
}

#[test]
fn a_depth_enabled_run_emits_every_artifact_for_every_record() {
    let fixture = Fixture::new(3);
    fixture.run("out", FULL_GENERATE, 2, 1);
    let out = fixture.output_dir("out");

    let suffixes = [
        ".jpeg",
        "-seg_colour.png",
        "-trainids.png",
        "-seg_overlay.png",
        "-normals.png",
        "-depth.png",
    ];
    for id in 0..3 {
        for suffix in suffixes {
            let path = out.join(format!("{id}{suffix}"));
            assert!(path.is_file(), "missing {}", path.display());
        }
    }
    // Record-count preservation: nothing beyond the expected artifacts.
    assert_eq!(fs::read_dir(&out).unwrap().count(), 3 * suffixes.len());
}

#[test]
fn labels_respect_the_class_tables_and_the_physics_filter() {
    let fixture = Fixture::new(1);
    fixture.run("out", FULL_GENERATE, 1, 1);
    let out = fixture.output_dir("out");

    let train_ids = image::open(out.join("0-trainids.png")).unwrap().to_luma8();
    let colours = image::open(out.join("0-seg_colour.png")).unwrap().to_rgb8();
    assert_eq!(train_ids.dimensions(), (WIDTH, HEIGHT));
    assert_eq!(colours.dimensions(), (WIDTH, HEIGHT));

    let table = colour_table();
    let void_colour = [0_u8, 0, 0];
    for (train_id, colour) in train_ids.pixels().zip(colours.pixels()) {
        let id = train_id.0[0];
        // Train ids are real classes or void; sand was rewritten away.
        assert!(id == ROAD_TRAIN_ID || id == GRASS_TRAIN_ID || id == VOID_TRAIN_ID);
        // Colours come from the table once the BGR storage is undone.
        let rgb = [colour.0[2], colour.0[1], colour.0[0]];
        assert!(table.contains(&rgb), "unexpected colour {rgb:?}");
        // Void in one raster is void in the other.
        assert_eq!(id == VOID_TRAIN_ID, rgb == void_colour);
    }
}

#[test]
fn orientation_flips_between_the_two_intersection_modes() {
    let fixture = Fixture::new(1);
    fixture.run("with_depth", FULL_GENERATE, 1, 1);
    fixture.run("no_depth", NO_DEPTH_GENERATE, 1, 1);

    let flipped = image::open(fixture.output_dir("no_depth").join("0-trainids.png"))
        .unwrap()
        .to_luma8();
    let rotated_only = image::open(fixture.output_dir("with_depth").join("0-trainids.png"))
        .unwrap()
        .to_luma8();

    // Depth disabled: the upper half of the view (grass) is at the top.
    assert_eq!(flipped.get_pixel(WIDTH / 2, 2).0, [GRASS_TRAIN_ID]);
    assert_eq!(flipped.get_pixel(WIDTH / 2, HEIGHT - 3).0, [ROAD_TRAIN_ID]);
    // Depth enabled: rotate-only, so the same content is mirrored
    // vertically.
    assert_eq!(rotated_only.get_pixel(WIDTH / 2, 2).0, [ROAD_TRAIN_ID]);
    assert_eq!(
        rotated_only.get_pixel(WIDTH / 2, HEIGHT - 3).0,
        [GRASS_TRAIN_ID]
    );
    // And the two runs agree pixel-for-pixel once unflipped.
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            assert_eq!(
                flipped.get_pixel(x, y),
                rotated_only.get_pixel(x, HEIGHT - 1 - y)
            );
        }
    }
}

#[test]
fn depth_and_normals_reflect_the_scene_geometry() {
    let fixture = Fixture::new(1);
    fixture.run("out", FULL_GENERATE, 1, 1);
    let out = fixture.output_dir("out");

    // Near surfaces render bright: the grass wall (z = -8, image bottom in
    // rotate-only orientation) beats the road wall (z = -10, image top).
    let depth = image::open(out.join("0-depth.png")).unwrap().to_luma8();
    let top = depth.get_pixel(WIDTH / 2, 2).0[0];
    let bottom = depth.get_pixel(WIDTH / 2, HEIGHT - 3).0[0];
    assert!(
        bottom > top,
        "near wall ({bottom}) should be brighter than far wall ({top})"
    );

    // Every wall faces the camera, so the visualised normals are uniform.
    let normals = image::open(out.join("0-normals.png")).unwrap().to_rgb8();
    let first = normals.get_pixel(0, 0);
    assert!(normals.pixels().all(|px| px == first));
}

#[test]
fn reruns_are_byte_identical_for_segmentation_outputs() {
    let fixture = Fixture::new(1);
    fixture.run("first", NO_DEPTH_GENERATE, 1, 1);
    fixture.run("second", NO_DEPTH_GENERATE, 1, 1);
    for artifact in ["0-trainids.png", "0-seg_colour.png", "0-normals.png"] {
        assert_eq!(
            fs::read(fixture.output_dir("first").join(artifact)).unwrap(),
            fs::read(fixture.output_dir("second").join(artifact)).unwrap(),
            "{artifact} differs between identical runs"
        );
    }
}

#[test]
fn the_sample_slice_selects_which_records_run() {
    let fixture = Fixture::new(6);
    let generate = format!(
        "start_at_sample = 1\nfinish_at_sample = 6\nsample_every = 2\n{NO_DEPTH_GENERATE}"
    );
    fixture.run("out", &generate, 1, 2);
    let out = fixture.output_dir("out");
    for id in [1, 3, 5] {
        assert!(out.join(format!("{id}-trainids.png")).is_file());
    }
    for id in [0, 2, 4] {
        assert!(!out.join(format!("{id}-trainids.png")).exists());
    }
}
