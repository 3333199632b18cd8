//! Phrase index over a corpus snapshot
//!
//! Maps normalized phrases (full verse text plus every 3..7-word window)
//! to a shared display payload. Insertion order is preserved so scans and
//! tie-breaks are reproducible across runs; lookups go through a phrase map.

use crate::corpus::Corpus;
use crate::normalize::normalize;
use crate::similarity::char_positions;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Window sizes indexed for partial-utterance matching, in words.
const MIN_WINDOW: usize = 3;
const MAX_WINDOW: usize = 7;

/// Display fields copied out of the corpus at build time so a match result
/// is constructed without touching the corpus again.
#[derive(Debug, Clone)]
pub struct VersePayload {
    pub surah: u32,
    pub verse: u32,
    pub surah_name: String,
    pub arabic: String,
    pub translation: String,
}

/// One indexed phrase with everything the scoring passes need precomputed.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub phrase: String,
    pub chars: Vec<char>,
    pub positions: HashMap<char, Vec<usize>>,
    pub words: HashSet<String>,
    pub payload: Arc<VersePayload>,
}

/// Immutable phrase index. Built once from a corpus snapshot; a corpus
/// change means a wholesale rebuild, never in-place mutation.
pub struct VerseIndex {
    entries: Vec<IndexEntry>,
    by_phrase: HashMap<String, usize>,
}

impl VerseIndex {
    /// Build the index from a corpus. Verses whose text normalizes to the
    /// empty string are skipped with a diagnostic, not fatal.
    ///
    /// Collision policy: first write wins. A phrase already claimed by an
    /// earlier verse in corpus order keeps its mapping, which biases short
    /// generic phrases toward earlier chapters. Known limitation, kept
    /// deliberately for reproducibility.
    pub fn build(corpus: &Corpus) -> Self {
        let mut index = VerseIndex {
            entries: Vec::new(),
            by_phrase: HashMap::new(),
        };

        for chapter in &corpus.surahs {
            for verse in &chapter.verses {
                let normalized = normalize(&verse.arabic);
                if normalized.is_empty() {
                    tracing::warn!(
                        chapter = chapter.number,
                        verse = verse.number,
                        "skipping verse with missing text"
                    );
                    continue;
                }

                let payload = Arc::new(VersePayload {
                    surah: chapter.number,
                    verse: verse.number,
                    surah_name: chapter.name.clone(),
                    arabic: verse.arabic.clone(),
                    translation: verse.translation.clone(),
                });

                let words: Vec<&str> = normalized.split(' ').collect();

                index.insert(normalized.clone(), &payload);

                for i in 0..words.len() {
                    let max_j = (i + MAX_WINDOW).min(words.len());
                    for j in (i + MIN_WINDOW)..=max_j {
                        index.insert(words[i..j].join(" "), &payload);
                    }
                }
            }
        }

        tracing::info!(entries = index.entries.len(), "phrase index built");
        index
    }

    fn insert(&mut self, phrase: String, payload: &Arc<VersePayload>) {
        if self.by_phrase.contains_key(&phrase) {
            return;
        }
        let chars: Vec<char> = phrase.chars().collect();
        let positions = char_positions(&chars);
        let words = phrase.split_whitespace().map(str::to_string).collect();
        self.by_phrase.insert(phrase.clone(), self.entries.len());
        self.entries.push(IndexEntry {
            phrase,
            chars,
            positions,
            words,
            payload: Arc::clone(payload),
        });
    }

    /// Exact lookup by normalized phrase.
    pub fn get(&self, phrase: &str) -> Option<&IndexEntry> {
        self.by_phrase.get(phrase).map(|&i| &self.entries[i])
    }

    /// Entries in insertion order (corpus order).
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Chapter, Verse};

    fn verse(number: u32, arabic: &str) -> Verse {
        Verse {
            number,
            verse_key: String::new(),
            arabic: arabic.to_string(),
            translation: "t".to_string(),
            juz: None,
            page: None,
        }
    }

    fn corpus_of(chapters: Vec<(u32, &str, Vec<Verse>)>) -> Corpus {
        Corpus {
            source: String::new(),
            downloaded_at: String::new(),
            surahs: chapters
                .into_iter()
                .map(|(number, name, verses)| Chapter {
                    number,
                    name: name.to_string(),
                    name_arabic: String::new(),
                    revelation_place: String::new(),
                    verses_count: verses.len(),
                    verses,
                })
                .collect(),
        }
    }

    #[test]
    fn indexes_full_text_and_windows() {
        // 5 words: full text + windows of 3, 4 and 5 words
        let corpus = corpus_of(vec![(1, "A", vec![verse(1, "واحد اثنان ثلاثه اربعه خمسه")])]);
        let index = VerseIndex::build(&corpus);

        assert!(index.get("واحد اثنان ثلاثه اربعه خمسه").is_some());
        assert!(index.get("واحد اثنان ثلاثه").is_some());
        assert!(index.get("اثنان ثلاثه اربعه خمسه").is_some());
        // 2-word windows are not indexed
        assert!(index.get("واحد اثنان").is_none());
        // full text + three 3-word windows + two 4-word windows; the single
        // 5-word window duplicates the full text and is dropped
        assert_eq!(index.len(), 6);
    }

    #[test]
    fn first_write_wins_on_collisions() {
        let shared = "قال الرجل الكبير";
        let corpus = corpus_of(vec![
            (1, "First", vec![verse(1, &format!("{shared} شيء"))]),
            (2, "Second", vec![verse(1, &format!("{shared} اخر"))]),
        ]);
        let index = VerseIndex::build(&corpus);

        let entry = index.get(shared).expect("shared phrase indexed");
        assert_eq!(entry.payload.surah, 1, "earlier chapter keeps the phrase");
    }

    #[test]
    fn skips_verses_with_missing_text() {
        let corpus = corpus_of(vec![(
            1,
            "A",
            vec![verse(1, "   "), verse(2, "نص صحيح موجود هنا")],
        )]);
        let index = VerseIndex::build(&corpus);
        assert!(index.entries().iter().all(|e| e.payload.verse == 2));
    }

    #[test]
    fn entries_preserve_corpus_order() {
        let corpus = corpus_of(vec![
            (1, "A", vec![verse(1, "الاول الثاني الثالث")]),
            (2, "B", vec![verse(1, "الرابع الخامس السادس")]),
        ]);
        let index = VerseIndex::build(&corpus);
        assert_eq!(index.entries()[0].payload.surah, 1);
        assert_eq!(index.entries().last().unwrap().payload.surah, 2);
    }

    #[test]
    fn entry_precomputes_scoring_data() {
        let corpus = corpus_of(vec![(1, "A", vec![verse(1, "بسم الله الرحمن الرحيم")])]);
        let index = VerseIndex::build(&corpus);
        let entry = index.get("بسم الله الرحمن الرحيم").unwrap();
        assert_eq!(entry.words.len(), 4);
        assert_eq!(entry.chars.len(), entry.phrase.chars().count());
        assert!(entry.positions.contains_key(&'ب'));
    }
}
