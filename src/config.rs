//! Run configuration.
//!
//! A single TOML file selects the track, car, recording and outputs. The
//! deserialized form is validated once at startup; everything downstream
//! can assume the names resolve and the `generate` table is coherent.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::cars;
use crate::error::Error;
use crate::tracks;
use crate::Result;

/// Kinds of label data the pipeline can generate, in invocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Segmentation,
    Normals,
    Depth,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Segmentation => write!(f, "segmentation"),
            GeneratorKind::Normals => write!(f, "normals"),
            GeneratorKind::Depth => write!(f, "depth"),
        }
    }
}

/// Output families a generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Visuals,
    Data,
    Overlays,
}

fn default_stride() -> usize {
    1
}

/// Deserialized run configuration; see the repository README for the file
/// format.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub track_mesh_path: PathBuf,
    pub recorded_data_path: PathBuf,
    pub output_path: PathBuf,
    pub track_name: String,
    pub car_name: String,
    /// `[width, height]` in pixels.
    pub image_size: [u32; 2],
    /// Degrees.
    pub vertical_fov: f32,
    pub n_ray_casting_workers: usize,
    pub n_generation_workers: usize,
    #[serde(default)]
    pub start_at_sample: usize,
    #[serde(default)]
    pub finish_at_sample: Option<usize>,
    #[serde(default = "default_stride")]
    pub sample_every: usize,
    pub generate: BTreeMap<GeneratorKind, Vec<OutputKind>>,
}

impl Configuration {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Configuration> {
        let text = fs::read_to_string(path)?;
        let config: Configuration = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let [width, height] = self.image_size;
        if width == 0 || height == 0 {
            return Err(Error::Config(format!(
                "image_size must be positive, got [{width}, {height}]"
            )));
        }
        if !(self.vertical_fov > 0.0 && self.vertical_fov < 180.0) {
            return Err(Error::Config(format!(
                "vertical_fov must be in (0, 180), got {}",
                self.vertical_fov
            )));
        }
        if self.n_ray_casting_workers == 0 || self.n_generation_workers == 0 {
            return Err(Error::Config("worker counts must be positive".into()));
        }
        if self.sample_every == 0 {
            return Err(Error::Config("sample_every must be at least 1".into()));
        }
        tracks::track_data(&self.track_name)?;
        cars::car_data(&self.car_name)?;
        if self.generate.is_empty() {
            return Err(Error::Config("generate table is empty".into()));
        }
        for (kind, outputs) in &self.generate {
            if outputs.is_empty() {
                return Err(Error::Config(format!("generate.{kind} lists no outputs")));
            }
            if *kind != GeneratorKind::Segmentation && outputs.contains(&OutputKind::Data) {
                // Raw float output is reserved in the interface but not
                // produced yet.
                return Err(Error::UnsupportedOutput {
                    kind: kind.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.image_size[0]
    }

    pub fn height(&self) -> u32 {
        self.image_size[1]
    }

    /// Outputs requested for one generator kind, empty when disabled.
    pub fn outputs_for(&self, kind: GeneratorKind) -> &[OutputKind] {
        self.generate.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Depth generation switches the intersection mode and the orientation
    /// rule for the whole run.
    pub fn is_generating_depth(&self) -> bool {
        self.generate.contains_key(&GeneratorKind::Depth)
    }

    /// The prepared mesh sits next to the source mesh.
    pub fn modified_mesh_path(&self) -> PathBuf {
        self.track_mesh_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("tmp.obj")
    }

    /// Logs the effective settings, one line per key.
    pub fn log_summary(&self) {
        info!(track_mesh_path = %self.track_mesh_path.display(), "setting");
        info!(recorded_data_path = %self.recorded_data_path.display(), "setting");
        info!(output_path = %self.output_path.display(), "setting");
        info!(track_name = %self.track_name, "setting");
        info!(car_name = %self.car_name, "setting");
        info!(
            image_size = %format!("{}x{}", self.width(), self.height()),
            vertical_fov = self.vertical_fov,
            "setting"
        );
        info!(
            n_ray_casting_workers = self.n_ray_casting_workers,
            n_generation_workers = self.n_generation_workers,
            "setting"
        );
        info!(
            start_at_sample = self.start_at_sample,
            finish_at_sample = ?self.finish_at_sample,
            sample_every = self.sample_every,
            "setting"
        );
        for (kind, outputs) in &self.generate {
            info!(generator = %kind, outputs = ?outputs, "setting");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_toml() -> String {
        concat!(
            "track_mesh_path = \"/data/monza.obj\"\n",
            "recorded_data_path = \"/data/recording\"\n",
            "output_path = \"/data/out\"\n",
            "track_name = \"monza\"\n",
            "car_name = \"audi_r8_lms_2016\"\n",
            "image_size = [1920, 1080]\n",
            "vertical_fov = 60.0\n",
            "n_ray_casting_workers = 2\n",
            "n_generation_workers = 4\n",
        )
        .to_owned()
    }

    fn parse(extra: &str) -> Result<Configuration> {
        let config: Configuration = toml::from_str(&(base_toml() + extra))?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn a_full_configuration_parses() {
        let config = parse(
            "[generate]\nsegmentation = [\"visuals\", \"data\", \"overlays\"]\n\
             normals = [\"visuals\"]\ndepth = [\"visuals\"]\n",
        )
        .unwrap();
        assert!(config.is_generating_depth());
        assert_eq!(config.start_at_sample, 0);
        assert_eq!(config.sample_every, 1);
        assert_eq!(config.finish_at_sample, None);
        assert_eq!(
            config.outputs_for(GeneratorKind::Segmentation),
            &[OutputKind::Visuals, OutputKind::Data, OutputKind::Overlays]
        );
        assert_eq!(
            config.outputs_for(GeneratorKind::Normals),
            &[OutputKind::Visuals]
        );
    }

    #[test]
    fn generator_kinds_iterate_in_invocation_order() {
        let config = parse(
            "[generate]\ndepth = [\"visuals\"]\nsegmentation = [\"data\"]\n",
        )
        .unwrap();
        let kinds: Vec<_> = config.generate.keys().copied().collect();
        assert_eq!(kinds, [GeneratorKind::Segmentation, GeneratorKind::Depth]);
    }

    #[test]
    fn depth_data_is_rejected() {
        assert!(matches!(
            parse("[generate]\ndepth = [\"data\"]\n"),
            Err(Error::UnsupportedOutput { kind }) if kind == "depth"
        ));
    }

    #[test]
    fn normals_data_is_rejected() {
        assert!(matches!(
            parse("[generate]\nnormals = [\"visuals\", \"data\"]\n"),
            Err(Error::UnsupportedOutput { kind }) if kind == "normals"
        ));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let toml = base_toml().replace("monza", "imola")
            + "[generate]\nsegmentation = [\"data\"]\n";
        let config: Configuration = toml::from_str(&toml).unwrap();
        assert!(matches!(config.validate(), Err(Error::UnknownTrack(_))));
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert!(matches!(
            parse("sample_every = 0\n[generate]\nsegmentation = [\"data\"]\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn modified_mesh_sits_next_to_the_source() {
        let config = parse("[generate]\nsegmentation = [\"data\"]\n").unwrap();
        assert_eq!(config.modified_mesh_path(), PathBuf::from("/data/tmp.obj"));
    }
}
