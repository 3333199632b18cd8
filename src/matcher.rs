//! Verse matching cascade and context lookup
//!
//! The cascade runs cheap-to-expensive over the phrase index: exact lookup,
//! global fuzzy scan, containment refinement, word-overlap fallback, and a
//! Bismillah-stripped retry. Scans use strict `>` comparisons over the
//! index's insertion order, so ties always resolve to the phrase that
//! entered the index first (earlier corpus position).

use crate::corpus::{Corpus, Verse};
use crate::index::{IndexEntry, VerseIndex};
use crate::normalize::normalize;
use crate::similarity::{combined_score, similarity};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Minimum confidence for the fuzzy and containment passes.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Containment refinement only runs while the best fuzzy score is below this.
const STRONG_MATCH: f64 = 0.7;

/// Word-overlap fallback acceptance bar, deliberately below the global
/// threshold so single recognized words can still resolve.
const WORD_OVERLAP_FLOOR: f64 = 0.2;

/// Ceiling for cascade confidences; full confidence is reserved for an
/// exact phrase hit.
const NEAR_EXACT_CAP: f64 = 0.99;

/// A matched verse with its display payload and confidence in [0,1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub surah: u32,
    pub verse: u32,
    pub surah_name: String,
    pub arabic: String,
    pub translation: String,
    pub confidence: f64,
}

impl MatchResult {
    fn from_entry(entry: &IndexEntry, confidence: f64) -> Self {
        let p = &entry.payload;
        MatchResult {
            surah: p.surah,
            verse: p.verse,
            surah_name: p.surah_name.clone(),
            arabic: p.arabic.clone(),
            translation: p.translation.clone(),
            confidence,
        }
    }
}

/// A verse with its neighbors for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseContext {
    pub verse: Option<Verse>,
    pub before: Vec<Verse>,
    pub after: Vec<Verse>,
}

fn bismillah_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new("بسم\\s+الله\\s+الرحمن\\s+الرحيم\\s*").expect("bismillah pattern")
    })
}

/// Find the best matching verse for recognized text.
///
/// Returns `None` for empty or unmatched input; never fails. Deterministic
/// for a fixed index.
pub fn find_match(index: &VerseIndex, recognized: &str, threshold: f64) -> Option<MatchResult> {
    let query = normalize(recognized);
    if query.is_empty() {
        return None;
    }

    // 1. Exact phrase hit short-circuits the cascade
    if let Some(entry) = index.get(&query) {
        return Some(MatchResult::from_entry(entry, 1.0));
    }

    let q_chars: Vec<char> = query.chars().collect();
    let q_words: HashSet<&str> = query.split_whitespace().collect();

    let mut best: Option<&IndexEntry> = None;
    let mut best_score = 0.0f64;

    // 2. Global fuzzy scan
    for entry in index.entries() {
        let score = combined_score(&q_chars, &q_words, &entry.chars, &entry.words, &entry.positions);
        if score > best_score && score >= threshold {
            best_score = score;
            best = Some(entry);
        }
    }

    // 3. Containment refinement for partial recognition
    if best.is_none() || best_score < STRONG_MATCH {
        if q_chars.len() > 2 {
            for entry in index.entries() {
                if query.contains(&entry.phrase) || entry.phrase.contains(&query) {
                    let (short, long) = if q_chars.len() < entry.chars.len() {
                        (q_chars.len(), entry.chars.len())
                    } else {
                        (entry.chars.len(), q_chars.len())
                    };
                    let score = short as f64 / long as f64;
                    if score > best_score && score >= threshold {
                        best_score = score;
                        best = Some(entry);
                    }
                }
            }
        }
    }

    // 4. Word-overlap fallback, lower bar so single words still resolve
    if best.is_none() {
        for entry in index.entries() {
            let common = q_words.iter().filter(|w| entry.words.contains(**w)).count();
            if common == 0 {
                continue;
            }
            let mut score = common as f64 / q_words.len() as f64;
            if common >= 2 {
                score *= 1.2;
            }
            if score > best_score && score >= WORD_OVERLAP_FLOOR {
                best_score = score;
                best = Some(entry);
            }
        }
    }

    // 5. Retry with the Bismillah prefix stripped from both sides
    if best.is_none() {
        let clean_query = bismillah_prefix().replace_all(&query, "").trim().to_string();
        if clean_query.chars().count() > 5 {
            for entry in index.entries() {
                let clean_phrase = bismillah_prefix().replace_all(&entry.phrase, "");
                let clean_phrase = clean_phrase.trim();
                if clean_phrase.is_empty() {
                    continue;
                }
                let score = similarity(&clean_query, clean_phrase);
                if score > best_score && score >= DEFAULT_THRESHOLD {
                    best_score = score;
                    best = Some(entry);
                }
            }
        }
    }

    // the word-overlap bonus can push the raw score past 1.0; cascade
    // results always report below an exact hit
    best.map(|entry| MatchResult::from_entry(entry, best_score.min(NEAR_EXACT_CAP)))
}

/// All indexed phrases containing the query, best first.
pub fn search(index: &VerseIndex, query: &str, limit: usize) -> Vec<MatchResult> {
    let query = normalize(query);
    if query.is_empty() {
        return Vec::new();
    }
    let q_chars: Vec<char> = query.chars().collect();
    let q_words: HashSet<&str> = query.split_whitespace().collect();

    let mut results: Vec<MatchResult> = index
        .entries()
        .iter()
        .filter(|entry| entry.phrase.contains(&query))
        .map(|entry| {
            let score =
                combined_score(&q_chars, &q_words, &entry.chars, &entry.words, &entry.positions);
            MatchResult::from_entry(entry, score)
        })
        .collect();

    // stable sort keeps index order within equal scores
    results.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}

/// Neighboring verses for display, clipped at chapter bounds. Unknown
/// chapter or verse yields empty context, never an error.
pub fn get_context(corpus: &Corpus, chapter: u32, verse: u32, window: usize) -> VerseContext {
    let mut context = VerseContext {
        verse: None,
        before: Vec::new(),
        after: Vec::new(),
    };

    let Some(chapter) = corpus.chapter(chapter) else {
        return context;
    };
    let Some(pos) = chapter.verses.iter().position(|v| v.number == verse) else {
        return context;
    };

    context.verse = Some(chapter.verses[pos].clone());
    let start = pos.saturating_sub(window);
    context.before = chapter.verses[start..pos].to_vec();
    let end = (pos + window + 1).min(chapter.verses.len());
    context.after = chapter.verses[pos + 1..end].to_vec();
    context
}
