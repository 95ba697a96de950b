use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::JOURNEY_FILE;
use crate::journey::{
    ClipData, JourneyData, ValidationReport, validate_chapters, validate_metadata,
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("Malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Built-in five-chapter journey, served when the real data set is
/// missing. Goes through the same parse path as published data.
const PLACEHOLDER_JSON: &str = include_str!("placeholder_journey.json");

/// Where journey data lives: a local data directory (the site's
/// `public/data`) or the base URL of a deployed site.
#[derive(Debug, Clone)]
pub enum JourneySource {
    Dir(PathBuf),
    Url(String),
}

impl JourneySource {
    /// Fetch and parse a JSON document at a path relative to the source root.
    fn fetch_json<T: DeserializeOwned>(&self, rel: &str) -> Result<T> {
        match self {
            Self::Dir(dir) => {
                let text = std::fs::read_to_string(dir.join(rel))?;
                Ok(serde_json::from_str(&text)?)
            }
            Self::Url(base) => {
                let url = format!("{}/{}", base.trim_end_matches('/'), rel);
                let parsed = ureq::get(&url)
                    .call()
                    .map_err(Box::new)?
                    .body_mut()
                    .read_json()
                    .map_err(Box::new)?;
                Ok(parsed)
            }
        }
    }
}

impl std::fmt::Display for JourneySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dir(dir) => write!(f, "{}", dir.display()),
            Self::Url(base) => write!(f, "{base}"),
        }
    }
}

/// Convention path of a clip's feature record.
pub fn clip_record_path(clip_id: &str) -> String {
    format!("clips/{clip_id}.json")
}

/// Convention path of a clip's pre-rendered mel spectrogram.
pub fn spectrogram_path(clip_id: &str) -> String {
    format!("spectrograms/{clip_id}.png")
}

/// Convention path of a clip's audio media.
pub fn audio_path(clip_id: &str) -> String {
    format!("audio/{clip_id}.mp3")
}

/// The parsed placeholder journey.
pub fn placeholder_journey() -> JourneyData {
    // Embedded at compile time; a parse failure is a build defect.
    serde_json::from_str(PLACEHOLDER_JSON).expect("embedded placeholder journey is valid JSON")
}

/// Load the journey strictly: any failure is returned to the caller.
pub fn try_load_journey(source: &JourneySource) -> Result<JourneyData> {
    source.fetch_json(JOURNEY_FILE)
}

/// Load the journey with the fallback the page uses: if the fetch fails
/// for any reason the placeholder journey is returned and the failure is
/// only a logged diagnostic, never a user-facing error.
pub fn load_journey(source: &JourneySource) -> JourneyData {
    match try_load_journey(source) {
        Ok(data) => {
            log::info!(
                "loaded journey from {source}: {} chapters, {} clips",
                data.chapters.len(),
                data.metadata.total_clips
            );
            data
        }
        Err(e) => {
            log::warn!("could not load journey from {source}: {e}; using placeholder");
            placeholder_journey()
        }
    }
}

/// A journey that passed the ingestion boundary: validated chapters plus
/// everything the validator had to say about them.
#[derive(Debug)]
pub struct IngestedJourney {
    pub data: JourneyData,
    pub report: ValidationReport,
}

/// Load (with placeholder fallback) and validate. `report.accepted` is
/// what goes into the store; the raw chapter list never does.
pub fn ingest_journey(source: &JourneySource) -> IngestedJourney {
    let data = load_journey(source);
    let mut report = validate_chapters(data.chapters.clone());
    report.warnings.extend(validate_metadata(&data.metadata));
    IngestedJourney { data, report }
}

/// One clip as loaded for display. `fallback` marks records that were
/// missing or unreadable and got default features instead.
#[derive(Debug, Clone)]
pub struct LoadedClip {
    pub data: ClipData,
    pub fallback: bool,
}

/// Clip ids referenced by the journey, deduplicated, in chapter order.
pub fn collect_clip_ids(data: &JourneyData) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut ids = Vec::new();
    for ch in &data.chapters {
        for id in &ch.audio_clips {
            if seen.insert(id.clone()) {
                ids.push(id.clone());
            }
        }
    }
    ids
}

/// Load per-clip records in parallel. A failed record never fails the
/// batch: that clip is omitted from real data and shown with default
/// features.
pub fn load_clips(source: &JourneySource, ids: &[String], workers: usize) -> Vec<LoadedClip> {
    if ids.is_empty() {
        return Vec::new();
    }

    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} clips ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .unwrap();

    let clips: Vec<LoadedClip> = pool.install(|| {
        ids.par_iter()
            .map(|id| {
                let loaded = match source.fetch_json::<ClipData>(&clip_record_path(id)) {
                    Ok(data) => LoadedClip {
                        data,
                        fallback: false,
                    },
                    Err(e) => {
                        log::warn!("clip '{id}' unavailable ({e}), using default features");
                        LoadedClip {
                            data: ClipData::fallback(id),
                            fallback: true,
                        }
                    }
                };
                pb.inc(1);
                loaded
            })
            .collect()
    });

    pb.finish_and_clear();
    clips
}
