use crate::store::PipelineStage;

/// Reveal timeline breakpoints, milliseconds since the panel was shown.
/// The analysis ran offline; these only pace how its stored results
/// animate in: spectrogram wipe, then feature bars, then the cluster
/// verdict.
pub const EXTRACTING_AT_MS: u64 = 500;
pub const CLUSTERING_AT_MS: u64 = 2000;
pub const COMPLETE_AT_MS: u64 = 3500;

/// Stage of the reveal animation at `elapsed_ms` since the displayed clip
/// changed. Restarted from zero for every clip the viewer lands on.
pub fn stage_at(elapsed_ms: u64) -> PipelineStage {
    if elapsed_ms >= COMPLETE_AT_MS {
        PipelineStage::Complete
    } else if elapsed_ms >= CLUSTERING_AT_MS {
        PipelineStage::Clustering
    } else if elapsed_ms >= EXTRACTING_AT_MS {
        PipelineStage::Extracting
    } else {
        PipelineStage::Idle
    }
}
