use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Clip id convention: "clip-<tag>-<nnn>", e.g. "clip-sg-001".
static CLIP_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^clip-[a-z0-9]+-\d{3}$").unwrap());

/// The full journey data set as published at `journey.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyData {
    pub metadata: JourneyMetadata,
    pub chapters: Vec<Chapter>,
}

/// Summary block shown in the conclusion section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyMetadata {
    pub total_duration: String,
    pub total_clips: u32,
    pub countries: u32,
    /// Inclusive [first, last] recording dates, "YYYY-MM-DD".
    pub date_range: [String; 2],
}

/// One narrative segment of the journey, bound to a scroll-progress
/// interval, a location, and an audio/emotion annotation.
///
/// The interval `[scroll_start, scroll_end)` is half-open: a chapter is
/// active while `scroll_start <= progress < scroll_end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub country: String,
    pub city: String,
    /// [longitude, latitude]
    pub coordinates: [f64; 2],
    pub date_range: String,
    pub scroll_start: f64,
    pub scroll_end: f64,
    /// Display color token, e.g. "#4ECDC4". Opaque to the model.
    pub color: String,
    pub emotion_cluster: EmotionCluster,
    pub narrative: Narrative,
    /// Ordered clip ids; the first is the chapter's primary clip.
    pub audio_clips: Vec<String>,
}

impl Chapter {
    /// Half-open containment test for the chapter's scroll interval.
    pub fn contains(&self, progress: f64) -> bool {
        progress >= self.scroll_start && progress < self.scroll_end
    }

    /// The clip cued when this chapter becomes current.
    pub fn primary_clip(&self) -> Option<&str> {
        self.audio_clips.first().map(String::as_str)
    }
}

/// Cluster assignment from the offline pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionCluster {
    pub id: i32,
    pub label: String,
    /// In [0, 1].
    pub confidence: f64,
    /// PCA-reduced cluster centroid, when the pipeline exported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<[f64; 3]>,
}

/// Display strings for a chapter panel. Opaque to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub headline: String,
    pub subtitle: String,
    pub body: String,
    pub technical_note: String,
}

/// Per-clip record as published at `clips/{id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipData {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    /// Clip length in seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
    /// Downsampled amplitude envelope (~100 points) for the waveform bar.
    #[serde(default)]
    pub waveform: Vec<f64>,
    #[serde(default)]
    pub features: ClipFeatures,
    #[serde(default)]
    pub predictions: Predictions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectrogram_url: Option<String>,
}

impl ClipData {
    /// Stand-in record for a clip whose published data is missing or
    /// unreadable: default features, nothing else.
    pub fn fallback(id: &str) -> Self {
        Self {
            id: id.to_string(),
            filename: String::new(),
            duration: 0.0,
            recorded_at: None,
            waveform: Vec::new(),
            features: ClipFeatures::default(),
            predictions: Predictions::default(),
            spectrogram_url: None,
        }
    }
}

/// Offline-extracted audio features for one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipFeatures {
    #[serde(default)]
    pub mfcc: Vec<f64>,
    pub spectral_centroid: f64,
    pub spectral_bandwidth: f64,
    pub spectral_rolloff: f64,
    pub zero_crossing_rate: f64,
    pub rms_energy: f64,
    pub tempo: f64,
}

impl Default for ClipFeatures {
    /// Display fallback used when a clip record is missing or unreadable.
    fn default() -> Self {
        Self {
            mfcc: Vec::new(),
            spectral_centroid: 2500.0,
            spectral_bandwidth: 1800.0,
            spectral_rolloff: 4000.0,
            zero_crossing_rate: 0.08,
            rms_energy: 0.045,
            tempo: 120.0,
        }
    }
}

/// Cluster predictions per algorithm. Any subset may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Predictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kmeans: Option<ClusterPrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agglomerative: Option<ClusterPrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectral: Option<ClusterPrediction>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClusterPrediction {
    pub cluster: i32,
    pub confidence: f64,
}

/// Why a chapter was rejected at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// `scroll_end <= scroll_start` — an empty or inverted interval can
    /// never become current under half-open containment, so it is dead
    /// data at best and a division-by-zero hazard at worst.
    EmptyInterval { start: f64, end: f64 },
    /// A scroll bound is NaN/infinite or outside [0, 1].
    BoundOutOfRange { start: f64, end: f64 },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInterval { start, end } => {
                write!(f, "empty interval [{start}, {end})")
            }
            Self::BoundOutOfRange { start, end } => {
                write!(f, "scroll bounds out of range [{start}, {end})")
            }
        }
    }
}

/// Outcome of validating a chapter list at the ingestion boundary.
///
/// Rejects are chapters that must not reach the store; warnings are
/// data-quality diagnostics the model tolerates (overlaps, gaps,
/// unconventional clip ids).
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub accepted: Vec<Chapter>,
    pub rejected: Vec<(String, RejectReason)>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.warnings.is_empty()
    }
}

/// Validate chapters before they are handed to the store.
///
/// The store itself never validates (writes are unconditional), so every
/// interval invariant is enforced here: malformed intervals are rejected,
/// overlaps and gaps are warned about but kept — the containment scan
/// tolerates both (first match wins on overlap, no match on a gap).
pub fn validate_chapters(chapters: Vec<Chapter>) -> ValidationReport {
    let mut report = ValidationReport::default();

    for ch in chapters {
        let (s, e) = (ch.scroll_start, ch.scroll_end);

        if !s.is_finite() || !e.is_finite() || s < 0.0 || e > 1.0 {
            log::warn!("chapter '{}': scroll bounds out of range [{s}, {e})", ch.id);
            report
                .rejected
                .push((ch.id, RejectReason::BoundOutOfRange { start: s, end: e }));
            continue;
        }
        if e <= s {
            log::warn!("chapter '{}': empty interval [{s}, {e}), dropped", ch.id);
            report
                .rejected
                .push((ch.id, RejectReason::EmptyInterval { start: s, end: e }));
            continue;
        }

        if ch.audio_clips.is_empty() {
            report
                .warnings
                .push(format!("chapter '{}': no audio clips", ch.id));
        }
        for clip_id in &ch.audio_clips {
            if !CLIP_ID_RE.is_match(clip_id) {
                report.warnings.push(format!(
                    "chapter '{}': clip id '{}' does not match clip-<tag>-<nnn>",
                    ch.id, clip_id
                ));
            }
        }
        let conf = ch.emotion_cluster.confidence;
        if !(0.0..=1.0).contains(&conf) {
            report.warnings.push(format!(
                "chapter '{}': cluster confidence {conf} outside [0, 1]",
                ch.id
            ));
        }

        report.accepted.push(ch);
    }

    // Coverage diagnostics over the accepted set, in scroll order.
    let mut by_start: Vec<&Chapter> = report.accepted.iter().collect();
    by_start.sort_by(|a, b| {
        a.scroll_start
            .partial_cmp(&b.scroll_start)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for pair in by_start.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.scroll_start < prev.scroll_end {
            report.warnings.push(format!(
                "chapters '{}' and '{}' overlap at [{}, {})",
                prev.id,
                next.id,
                next.scroll_start,
                prev.scroll_end.min(next.scroll_end)
            ));
        } else if next.scroll_start > prev.scroll_end {
            report.warnings.push(format!(
                "gap between chapters '{}' and '{}' at [{}, {})",
                prev.id, next.id, prev.scroll_end, next.scroll_start
            ));
        }
    }

    for w in &report.warnings {
        log::warn!("{w}");
    }
    report
}

/// Validate the metadata date range: both dates must parse as YYYY-MM-DD
/// and be in order. Returns warnings rather than failing — metadata is
/// display-only.
pub fn validate_metadata(meta: &JourneyMetadata) -> Vec<String> {
    let mut warnings = Vec::new();
    let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();

    match (parse(&meta.date_range[0]), parse(&meta.date_range[1])) {
        (Some(first), Some(last)) => {
            if first > last {
                warnings.push(format!(
                    "metadata date range reversed: {} > {}",
                    meta.date_range[0], meta.date_range[1]
                ));
            }
        }
        _ => warnings.push(format!(
            "metadata date range not YYYY-MM-DD: [{}, {}]",
            meta.date_range[0], meta.date_range[1]
        )),
    }
    warnings
}
