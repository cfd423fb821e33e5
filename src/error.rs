use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the generation pipeline.
///
/// Configuration problems are fatal at startup; data problems are fatal for
/// the worker that hits them and reach the supervisor through its watchdog.
/// There are no retries anywhere: the input is a finite batch of
/// deterministic jobs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration: {0}")]
    Config(String),

    #[error("unknown track `{0}`")]
    UnknownTrack(String),

    #[error("unknown car `{0}`")]
    UnknownCar(String),

    #[error("unknown semantic class `{class}` for material `{material}`")]
    UnknownClass { material: String, class: String },

    #[error("material `{0}` is not mapped to a semantic class")]
    UnknownMaterial(String),

    #[error("generating {kind} as raw data is not supported")]
    UnsupportedOutput { kind: String },

    #[error("state record {path}: expected {expected} bytes, found {found}")]
    MalformedStateRecord {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("record id `{0}` is not a decimal integer")]
    MalformedRecordId(String),

    #[error("mesh {path}:{line}: {message}")]
    MalformedMesh {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("scene has no camera attached")]
    NoCamera,

    #[error("worker `{0}` failed; see log for the underlying error")]
    WorkerFailed(String),

    #[error("work queue closed unexpectedly")]
    QueueClosed,

    #[error("raster of {expected} pixels does not match {found} values")]
    RasterShape { expected: usize, found: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
