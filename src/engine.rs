//! Engine state: published corpus + index snapshot with atomic reload
//!
//! A snapshot is immutable once published. Reload builds the replacement
//! off to the side and swaps the shared handle under a short write lock, so
//! every in-flight call keeps working against the snapshot it cloned out.

use crate::corpus::{Corpus, CorpusStats};
use crate::index::VerseIndex;
use crate::matcher::{self, MatchResult, VerseContext, DEFAULT_THRESHOLD};
use std::sync::{Arc, RwLock};

struct Snapshot {
    corpus: Arc<Corpus>,
    index: VerseIndex,
}

impl Snapshot {
    fn build(corpus: Corpus) -> Self {
        let index = VerseIndex::build(&corpus);
        Snapshot {
            corpus: Arc::new(corpus),
            index,
        }
    }
}

/// Verse matching engine over a hot-reloadable corpus snapshot.
pub struct Engine {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl Engine {
    /// Build the engine from a corpus. Always succeeds; callers degrade to
    /// [`Corpus::sample`] when no real data is available.
    pub fn new(corpus: Corpus) -> Self {
        let snapshot = Snapshot::build(corpus);
        tracing::info!(
            chapters = snapshot.corpus.surahs.len(),
            entries = snapshot.index.len(),
            "engine initialized"
        );
        Engine {
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap())
    }

    /// Match recognized text against the current snapshot with the default
    /// confidence threshold.
    pub fn find_match(&self, recognized: &str) -> Option<MatchResult> {
        self.find_match_with_threshold(recognized, DEFAULT_THRESHOLD)
    }

    pub fn find_match_with_threshold(&self, recognized: &str, threshold: f64) -> Option<MatchResult> {
        let snapshot = self.current();
        matcher::find_match(&snapshot.index, recognized, threshold)
    }

    /// All indexed phrases containing the query, best first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<MatchResult> {
        let snapshot = self.current();
        matcher::search(&snapshot.index, query, limit)
    }

    /// Neighboring verses for display.
    pub fn context(&self, chapter: u32, verse: u32, window: usize) -> VerseContext {
        let snapshot = self.current();
        matcher::get_context(&snapshot.corpus, chapter, verse, window)
    }

    pub fn stats(&self) -> CorpusStats {
        self.current().corpus.stats()
    }

    /// Accept a new corpus and atomically publish its index. The old
    /// snapshot stays valid for readers that already cloned it.
    pub fn reload(&self, corpus: Corpus) {
        let snapshot = Arc::new(Snapshot::build(corpus));
        tracing::info!(
            chapters = snapshot.corpus.surahs.len(),
            entries = snapshot.index.len(),
            "publishing rebuilt index"
        );
        *self.snapshot.write().unwrap() = snapshot;
    }
}
