//! Recorded-frame discovery and state-record decoding.
//!
//! A recording directory holds `{id}.bin` + `{id}.jpeg` pairs where `id` is
//! a decimal integer. The `.bin` file is a fixed little-endian layout
//! written by the capture tool: sixteen `f32` fields followed by five
//! NUL-padded UTF-16LE strings of twelve code units each.

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::Result;

const N_FLOAT_FIELDS: usize = 16;
const STRING_UNITS: usize = 12;
const N_STRING_FIELDS: usize = 5;

/// Total size of one state record on disk.
pub const STATE_RECORD_LEN: usize = N_FLOAT_FIELDS * 4 + N_STRING_FIELDS * STRING_UNITS * 2;

/// Camera state captured alongside one rendered frame.
///
/// The pipeline only consumes the pose fields (`ego_location_*`, `pitch`,
/// `heading`, `roll`, all radians); everything else is carried through for
/// downstream consumers of the decoded record.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub steering_angle: f32,
    pub gas: f32,
    pub brake: f32,
    pub clutch: f32,
    pub speed_kmh: f32,
    pub rpm: f32,
    pub ego_location_x: f32,
    pub ego_location_y: f32,
    pub ego_location_z: f32,
    pub ego_velocity_x: f32,
    pub ego_velocity_y: f32,
    pub ego_velocity_z: f32,
    pub pitch: f32,
    pub heading: f32,
    pub roll: f32,
    pub lap_distance: f32,
    pub tyre_compound: String,
    pub last_time: String,
    pub best_time: String,
    pub split: String,
    pub current_time: String,
}

/// Lists the record ids present in a recording directory, sorted numerically.
pub fn sample_list(recording_path: &Path) -> Result<Vec<String>> {
    let mut samples = Vec::new();
    for entry in fs::read_dir(recording_path)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(stem) = name.strip_suffix(".bin") else {
            continue;
        };
        let id: u64 = stem
            .parse()
            .map_err(|_| Error::MalformedRecordId(stem.to_owned()))?;
        samples.push((id, stem.to_owned()));
    }
    samples.sort_by_key(|(id, _)| *id);
    Ok(samples.into_iter().map(|(_, stem)| stem).collect())
}

/// Selects `samples[start..finish]` with the given stride, clamping the
/// bounds the way slice notation does.
pub fn subsample(samples: &[String], start: usize, finish: Option<usize>, every: usize) -> Vec<String> {
    assert!(every >= 1, "stride must be at least 1");
    let end = finish.unwrap_or(samples.len()).min(samples.len());
    if start >= end {
        return Vec::new();
    }
    samples[start..end]
        .iter()
        .step_by(every)
        .cloned()
        .collect()
}

/// Decodes a state record from disk.
pub fn load_game_state(path: &Path) -> Result<GameState> {
    let data = fs::read(path)?;
    if data.len() != STATE_RECORD_LEN {
        return Err(Error::MalformedStateRecord {
            path: path.to_owned(),
            expected: STATE_RECORD_LEN,
            found: data.len(),
        });
    }
    let mut reader = StateReader { data: &data, at: 0 };
    let floats: Vec<f32> = (0..N_FLOAT_FIELDS).map(|_| reader.f32()).collect();
    let strings: Vec<String> = (0..N_STRING_FIELDS).map(|_| reader.string()).collect();
    let mut strings = strings.into_iter();
    Ok(GameState {
        steering_angle: floats[0],
        gas: floats[1],
        brake: floats[2],
        clutch: floats[3],
        speed_kmh: floats[4],
        rpm: floats[5],
        ego_location_x: floats[6],
        ego_location_y: floats[7],
        ego_location_z: floats[8],
        ego_velocity_x: floats[9],
        ego_velocity_y: floats[10],
        ego_velocity_z: floats[11],
        pitch: floats[12],
        heading: floats[13],
        roll: floats[14],
        lap_distance: floats[15],
        tyre_compound: strings.next().unwrap_or_default(),
        last_time: strings.next().unwrap_or_default(),
        best_time: strings.next().unwrap_or_default(),
        split: strings.next().unwrap_or_default(),
        current_time: strings.next().unwrap_or_default(),
    })
}

struct StateReader<'a> {
    data: &'a [u8],
    at: usize,
}

impl StateReader<'_> {
    fn f32(&mut self) -> f32 {
        let bytes: [u8; 4] = self.data[self.at..self.at + 4]
            .try_into()
            .expect("record length is validated before decoding");
        self.at += 4;
        f32::from_le_bytes(bytes)
    }

    fn string(&mut self) -> String {
        let units: Vec<u16> = (0..STRING_UNITS)
            .map(|i| {
                let at = self.at + i * 2;
                u16::from_le_bytes([self.data[at], self.data[at + 1]])
            })
            .collect();
        self.at += STRING_UNITS * 2;
        String::from_utf16_lossy(&units)
            .trim_end_matches('\0')
            .to_owned()
    }
}
