use crate::journey::Chapter;

/// Cosmetic reveal phase for the analysis panel. The pipeline ran offline;
/// this only drives the staged animation of its stored results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineStage {
    #[default]
    Idle,
    Extracting,
    Clustering,
    Complete,
}

/// Single source of truth for narrative position and playback intent.
///
/// One instance per page session, constructed explicitly and owned by the
/// session — never a process-wide singleton, so tests and server-side
/// rendering can hold several stores at once. All mutation happens
/// synchronously inside one event handler at a time; queries issued after
/// a write observe it.
#[derive(Debug, Default)]
pub struct JourneyStore {
    scroll_progress: f64,
    chapters: Vec<Chapter>,
    is_audio_enabled: bool,
    current_clip_id: Option<String>,
    pipeline_stage: PipelineStage,
}

impl JourneyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scroll progress. Unconditional: the scroll source owns
    /// clamping to [0, 1], the store records whatever it is given. Called
    /// every animation frame, so this must stay O(1).
    pub fn set_scroll_progress(&mut self, progress: f64) {
        self.scroll_progress = progress;
    }

    pub fn scroll_progress(&self) -> f64 {
        self.scroll_progress
    }

    /// Replace the chapter list wholesale. Interval invariants are the
    /// ingestion layer's job (`journey::validate_chapters`); the store
    /// accepts the list as-is and does not reset scroll progress.
    pub fn set_chapters(&mut self, chapters: Vec<Chapter>) {
        self.chapters = chapters;
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn toggle_audio(&mut self) {
        self.is_audio_enabled = !self.is_audio_enabled;
    }

    pub fn is_audio_enabled(&self) -> bool {
        self.is_audio_enabled
    }

    pub fn set_current_clip(&mut self, clip_id: Option<String>) {
        self.current_clip_id = clip_id;
    }

    pub fn current_clip_id(&self) -> Option<&str> {
        self.current_clip_id.as_deref()
    }

    pub fn set_pipeline_stage(&mut self, stage: PipelineStage) {
        self.pipeline_stage = stage;
    }

    pub fn pipeline_stage(&self) -> PipelineStage {
        self.pipeline_stage
    }

    /// The chapter whose half-open interval contains the current progress.
    ///
    /// Scans in list order and returns the first match, so if intervals
    /// ever overlap (a data defect the model tolerates) the
    /// earliest-listed chapter wins. Gaps yield `None`. O(n) over a list
    /// of at most a few dozen chapters, cheap enough per frame.
    pub fn current_chapter(&self) -> Option<&Chapter> {
        let p = self.scroll_progress;
        self.chapters.iter().find(|ch| ch.contains(p))
    }

    /// Progress within the current chapter, in [0, 1).
    ///
    /// 0.0 exactly when there is no current chapter. The division is safe
    /// for any chapter that can become current: an interval with
    /// `scroll_end <= scroll_start` contains no progress value under the
    /// half-open rule, so it never reaches this point (and ingestion
    /// rejects such chapters anyway).
    pub fn chapter_progress(&self) -> f64 {
        match self.current_chapter() {
            None => 0.0,
            Some(ch) => {
                (self.scroll_progress - ch.scroll_start) / (ch.scroll_end - ch.scroll_start)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::tests::chapter;

    fn store_with(chapters: Vec<Chapter>) -> JourneyStore {
        let mut store = JourneyStore::new();
        store.set_chapters(chapters);
        store
    }

    #[test]
    fn defaults_are_empty() {
        let store = JourneyStore::new();
        assert_eq!(store.scroll_progress(), 0.0);
        assert!(store.chapters().is_empty());
        assert!(!store.is_audio_enabled());
        assert!(store.current_clip_id().is_none());
        assert_eq!(store.pipeline_stage(), PipelineStage::Idle);
        assert!(store.current_chapter().is_none());
    }

    #[test]
    fn progress_inside_interval_selects_that_chapter() {
        let mut store = store_with(vec![chapter("a", 0.0, 0.3), chapter("b", 0.3, 0.6)]);

        for p in [0.0, 0.1, 0.29999] {
            store.set_scroll_progress(p);
            assert_eq!(store.current_chapter().unwrap().id, "a", "p = {p}");
        }
        for p in [0.3, 0.45, 0.59999] {
            store.set_scroll_progress(p);
            assert_eq!(store.current_chapter().unwrap().id, "b", "p = {p}");
        }
    }

    #[test]
    fn uncovered_progress_has_no_chapter() {
        let mut store = store_with(vec![chapter("a", 0.1, 0.3), chapter("b", 0.5, 0.7)]);

        for p in [0.0, 0.09, 0.3, 0.4, 0.7, 0.95, 1.0, -0.5, 2.0] {
            store.set_scroll_progress(p);
            assert!(store.current_chapter().is_none(), "p = {p}");
            assert_eq!(store.chapter_progress(), 0.0, "p = {p}");
        }
    }

    #[test]
    fn overlap_resolves_to_earliest_listed() {
        // "b" listed first and overlapping "a": list order, not interval
        // order, breaks the tie.
        let mut store = store_with(vec![chapter("b", 0.2, 0.5), chapter("a", 0.0, 0.4)]);

        store.set_scroll_progress(0.3);
        assert_eq!(store.current_chapter().unwrap().id, "b");

        store.set_scroll_progress(0.1);
        assert_eq!(store.current_chapter().unwrap().id, "a");
    }

    #[test]
    fn chapter_progress_spans_zero_to_almost_one() {
        let mut store = store_with(vec![chapter("a", 0.2, 0.4)]);

        store.set_scroll_progress(0.2);
        assert_eq!(store.chapter_progress(), 0.0);

        store.set_scroll_progress(0.3);
        assert!((store.chapter_progress() - 0.5).abs() < 1e-12);

        store.set_scroll_progress(0.39999);
        let p = store.chapter_progress();
        assert!(p < 1.0 && p > 0.999);

        // At the end bound the chapter is no longer current.
        store.set_scroll_progress(0.4);
        assert!(store.current_chapter().is_none());
        assert_eq!(store.chapter_progress(), 0.0);
    }

    #[test]
    fn toggle_audio_twice_restores_state() {
        let mut store = JourneyStore::new();
        assert!(!store.is_audio_enabled());
        store.toggle_audio();
        assert!(store.is_audio_enabled());
        store.toggle_audio();
        assert!(!store.is_audio_enabled());
    }

    #[test]
    fn set_chapters_is_observed_immediately() {
        let mut store = store_with(vec![chapter("a", 0.0, 0.5)]);
        store.set_scroll_progress(0.25);
        assert_eq!(store.current_chapter().unwrap().id, "a");

        // Replacing the list re-derives against the existing progress,
        // which is deliberately not reset.
        store.set_chapters(vec![chapter("z", 0.2, 0.3)]);
        assert_eq!(store.scroll_progress(), 0.25);
        assert_eq!(store.current_chapter().unwrap().id, "z");

        store.set_chapters(vec![chapter("q", 0.5, 0.9)]);
        assert!(store.current_chapter().is_none());
    }

    #[test]
    fn clip_and_stage_writes_are_plain_replacements() {
        let mut store = JourneyStore::new();
        store.set_current_clip(Some("clip-sg-001".to_string()));
        assert_eq!(store.current_clip_id(), Some("clip-sg-001"));
        store.set_current_clip(None);
        assert!(store.current_clip_id().is_none());

        store.set_pipeline_stage(PipelineStage::Clustering);
        assert_eq!(store.pipeline_stage(), PipelineStage::Clustering);
    }

    #[test]
    fn empty_interval_chapter_never_becomes_current() {
        // Ingestion rejects these, but even if one slips through the
        // half-open rule keeps it from ever being selected, so the
        // progress division cannot hit a zero-width span.
        let mut store = store_with(vec![chapter("dead", 0.5, 0.5), chapter("b", 0.4, 0.6)]);
        store.set_scroll_progress(0.5);
        assert_eq!(store.current_chapter().unwrap().id, "b");
        assert!((store.chapter_progress() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn concrete_two_chapter_scenario() {
        let mut store = store_with(vec![chapter("a", 0.0, 0.3), chapter("b", 0.3, 0.6)]);

        store.set_scroll_progress(0.29);
        assert_eq!(store.current_chapter().unwrap().id, "a");
        assert!((store.chapter_progress() - 0.9667).abs() < 1e-3);

        store.set_scroll_progress(0.3);
        assert_eq!(store.current_chapter().unwrap().id, "b");
        assert_eq!(store.chapter_progress(), 0.0);

        store.set_scroll_progress(0.95);
        assert!(store.current_chapter().is_none());
        assert_eq!(store.chapter_progress(), 0.0);
    }
}
