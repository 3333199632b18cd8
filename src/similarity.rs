//! Similarity scoring between normalized Arabic strings
//!
//! Combines a character-level matching-blocks ratio (2M/T over the longest
//! common substring chain, the classic SequenceMatcher formula) with a
//! word-set Jaccard score. Short recognized fragments often share most of
//! their words with a verse while differing in orthography, so the word
//! component carries the larger weight.

use std::collections::{HashMap, HashSet};

const CHAR_WEIGHT: f64 = 0.4;
const WORD_WEIGHT: f64 = 0.6;

/// Positions of each character in a string, built once per index entry so
/// query-time scans never re-scan index text.
pub fn char_positions(chars: &[char]) -> HashMap<char, Vec<usize>> {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (i, &c) in chars.iter().enumerate() {
        positions.entry(c).or_default().push(i);
    }
    positions
}

/// Matching-blocks ratio between two char sequences: `2M/T` where `M` is
/// the summed length of the matched blocks and `T` the combined length.
/// `b_positions` must be `char_positions(b)`.
pub fn block_ratio(a: &[char], b: &[char], b_positions: &HashMap<char, Vec<usize>>) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_len(a, b, b_positions) as f64 / total as f64
}

/// Total length of the matching blocks between `a` and `b`: repeatedly take
/// the longest common run, then recurse into the spans on either side of it.
fn matched_len(a: &[char], b: &[char], b_positions: &HashMap<char, Vec<usize>>) -> usize {
    let mut total = 0;
    let mut spans = vec![(0usize, a.len(), 0usize, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = spans.pop() {
        let (i, j, size) = longest_run(a, b_positions, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        total += size;
        if a_lo < i && b_lo < j {
            spans.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            spans.push((i + size, a_hi, j + size, b_hi));
        }
    }

    total
}

/// Longest common run within `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
/// Returns (a_start, b_start, length); ties go to the earliest start.
fn longest_run(
    a: &[char],
    b_positions: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let mut best = (a_lo, b_lo, 0usize);
    // run_ends[j] = length of the common run ending at a[i] and b[j]
    let mut run_ends: HashMap<usize, usize> = HashMap::new();

    for i in a_lo..a_hi {
        let mut next_run_ends: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_positions.get(&a[i]) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let len = if j == 0 {
                    1
                } else {
                    run_ends.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                next_run_ends.insert(j, len);
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        run_ends = next_run_ends;
    }

    best
}

/// Combined similarity over already-tokenized inputs. Falls back to the
/// character ratio alone when either side has no words.
pub fn combined_score(
    a_chars: &[char],
    a_words: &HashSet<&str>,
    b_chars: &[char],
    b_words: &HashSet<String>,
    b_positions: &HashMap<char, Vec<usize>>,
) -> f64 {
    let char_score = block_ratio(a_chars, b_chars, b_positions);
    if a_words.is_empty() || b_words.is_empty() {
        return char_score;
    }
    let common = a_words.iter().filter(|w| b_words.contains(**w)).count();
    let union = a_words.len() + b_words.len() - common;
    let word_score = common as f64 / union as f64;
    char_score * CHAR_WEIGHT + word_score * WORD_WEIGHT
}

/// Similarity between two raw strings. Convenience wrapper that tokenizes
/// both sides; the match engine uses [`combined_score`] with precomputed
/// entry data instead.
pub fn similarity(text1: &str, text2: &str) -> f64 {
    let a_chars: Vec<char> = text1.chars().collect();
    let b_chars: Vec<char> = text2.chars().collect();
    let b_positions = char_positions(&b_chars);

    let a_words: HashSet<&str> = text1.split_whitespace().collect();
    let b_words: HashSet<String> = text2.split_whitespace().map(str::to_string).collect();

    combined_score(&a_chars, &a_words, &b_chars, &b_words, &b_positions)
}
