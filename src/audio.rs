use crate::store::JourneyStore;

/// Crossfade duration for clip transitions.
pub const CROSSFADE_MS: u64 = 500;

/// Steady-state playback volume.
pub const PLAYBACK_VOLUME: f64 = 0.7;

/// A fade the audio player should start now. The player owns decoding and
/// actual playback; the model only tells it what to fade where.
#[derive(Debug, Clone, PartialEq)]
pub enum FadeAction {
    In {
        clip_id: String,
        volume: f64,
        duration_ms: u64,
    },
    Out {
        clip_id: String,
        duration_ms: u64,
    },
}

/// Plan the fades that reconcile what is audible with what the store
/// wants audible.
///
/// `wanted` is the store's current clip when audio is enabled; `audible`
/// is whatever the player reports as currently playing. Everything not
/// wanted fades out; the wanted clip fades in unless it already plays.
/// With audio disabled everything fades out regardless of the cue.
pub fn plan_transition(
    enabled: bool,
    wanted: Option<&str>,
    audible: &[&str],
) -> Vec<FadeAction> {
    let target = if enabled { wanted } else { None };
    let mut actions = Vec::new();

    for &clip in audible {
        if Some(clip) != target {
            actions.push(FadeAction::Out {
                clip_id: clip.to_string(),
                duration_ms: CROSSFADE_MS,
            });
        }
    }

    if let Some(id) = target {
        if !audible.contains(&id) {
            actions.push(FadeAction::In {
                clip_id: id.to_string(),
                volume: PLAYBACK_VOLUME,
                duration_ms: CROSSFADE_MS,
            });
        }
    }

    actions
}

/// Player "ended" callback: clear the cue, but only if the finished clip
/// is still the current one — a crossfade may already have moved on.
pub fn on_clip_ended(store: &mut JourneyStore, clip_id: &str) {
    if store.current_clip_id() == Some(clip_id) {
        store.set_current_clip(None);
    }
}

/// The clip to cue for the current chapter, if any: its primary clip.
pub fn chapter_cue(store: &JourneyStore) -> Option<&str> {
    store.current_chapter().and_then(|ch| ch.primary_clip())
}
