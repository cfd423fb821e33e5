//! Merges one or two generated output directories into a single
//! consecutively renumbered dataset.
//!
//! Samples are matched by their `{id}.jpeg` frame; each one is copied with
//! its train-id and colour artifacts as `{i}.jpeg`, `{i}-ids.png` and
//! `{i}-colour.png`. Both current (`-trainids` / `-seg_colour`) and legacy
//! (`-ids` / `-colour`) artifact names are accepted on the input side.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, sync::atomic::AtomicUsize, sync::atomic::Ordering};

use anyhow::{bail, Context};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Args {
    input_1: PathBuf,
    input_2: Option<PathBuf>,
    output: PathBuf,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut input_1 = None;
    let mut input_2 = None;
    let mut output = None;
    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        let value = args
            .next()
            .with_context(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--input-1" => input_1 = Some(PathBuf::from(value)),
            "--input-2" => input_2 = Some(PathBuf::from(value)),
            "--output" => output = Some(PathBuf::from(value)),
            other => bail!("unknown argument {other}"),
        }
    }
    match (input_1, output) {
        (Some(input_1), Some(output)) => Ok(Args {
            input_1,
            input_2,
            output,
        }),
        _ => bail!("usage: merge_recordings --input-1 <dir> [--input-2 <dir>] --output <dir>"),
    }
}

fn sorted_frames(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "jpeg"))
        .collect();
    frames.sort();
    Ok(frames)
}

/// Picks the first artifact of a sample that exists on disk.
fn existing_artifact(frame: &Path, suffixes: &[&str]) -> anyhow::Result<PathBuf> {
    let stem = frame.with_extension("");
    for suffix in suffixes {
        let candidate = PathBuf::from(format!("{}{suffix}.png", stem.display()));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    bail!(
        "no {} artifact next to {}",
        suffixes.join("/"),
        frame.display()
    )
}

fn copy_sample(output: &Path, frame: &Path, i: usize) -> anyhow::Result<()> {
    fs::copy(frame, output.join(format!("{i}.jpeg")))?;
    let train_ids = existing_artifact(frame, &["-trainids", "-ids"])?;
    fs::copy(train_ids, output.join(format!("{i}-ids.png")))?;
    let colours = existing_artifact(frame, &["-seg_colour", "-colour"])?;
    fs::copy(colours, output.join(format!("{i}-colour.png")))?;
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let args = parse_args()?;
    fs::create_dir_all(&args.output)?;
    let mut frames = sorted_frames(&args.input_1)?;
    if let Some(input_2) = &args.input_2 {
        frames.extend(sorted_frames(input_2)?);
    }
    info!(samples = frames.len(), "merging");
    let n_copied = AtomicUsize::new(0);
    frames
        .par_iter()
        .enumerate()
        .try_for_each(|(i, frame)| -> anyhow::Result<()> {
            copy_sample(&args.output, frame, i)?;
            let done = n_copied.fetch_add(1, Ordering::SeqCst) + 1;
            if done % 1000 == 0 {
                info!(done, total = frames.len(), "progress");
            }
            Ok(())
        })?;
    info!(samples = frames.len(), "merge complete");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "merge failed");
            ExitCode::FAILURE
        }
    }
}
