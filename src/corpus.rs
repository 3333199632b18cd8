//! Corpus value types and cached-corpus serialization
//!
//! A `Corpus` is an immutable, ordered snapshot of chapters and verses.
//! It is loaded once (from the cache file the downloader writes, or from
//! the built-in sample), and any later update replaces the whole snapshot.

use serde::{Deserialize, Serialize};

/// A single verse. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verse {
    pub number: u32,
    /// "chapter:verse" key, e.g. "1:1"
    #[serde(default)]
    pub verse_key: String,
    pub arabic: String,
    pub translation: String,
    #[serde(default)]
    pub juz: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
}

/// A chapter (surah) with its ordered verses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub name: String,
    #[serde(default)]
    pub name_arabic: String,
    #[serde(default)]
    pub revelation_place: String,
    #[serde(default)]
    pub verses_count: usize,
    pub verses: Vec<Verse>,
}

/// Ordered snapshot of chapters. Chapter numbers are unique and increasing
/// as downloaded (1..114), but nothing here assumes contiguity; the index
/// works off whatever chapters are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub downloaded_at: String,
    pub surahs: Vec<Chapter>,
}

/// Corpus summary returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusStats {
    pub chapters: usize,
    pub total_verses: usize,
    pub source: String,
    pub downloaded_at: String,
}

impl Corpus {
    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            chapters: self.surahs.len(),
            total_verses: self.surahs.iter().map(|s| s.verses.len()).sum(),
            source: self.source.clone(),
            downloaded_at: self.downloaded_at.clone(),
        }
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.surahs.iter().find(|s| s.number == number)
    }

    /// Built-in minimal corpus so the engine is never left without an index
    /// when no cached data exists.
    pub fn sample() -> Self {
        Corpus {
            source: "Built-in sample".to_string(),
            downloaded_at: String::new(),
            surahs: vec![Chapter {
                number: 1,
                name: "Al-Fatihah".to_string(),
                name_arabic: "الفاتحة".to_string(),
                revelation_place: "meccan".to_string(),
                verses_count: 3,
                verses: vec![
                    Verse {
                        number: 1,
                        verse_key: "1:1".to_string(),
                        arabic: "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ".to_string(),
                        translation:
                            "In the name of Allah, the Entirely Merciful, the Especially Merciful."
                                .to_string(),
                        juz: Some(1),
                        page: Some(1),
                    },
                    Verse {
                        number: 2,
                        verse_key: "1:2".to_string(),
                        arabic: "الْحَمْدُ لِلَّهِ رَبِّ الْعَالَمِينَ".to_string(),
                        translation: "All praise is due to Allah, Lord of the worlds.".to_string(),
                        juz: Some(1),
                        page: Some(1),
                    },
                    Verse {
                        number: 3,
                        verse_key: "1:3".to_string(),
                        arabic: "الرَّحْمَٰنِ الرَّحِيمِ".to_string(),
                        translation: "The Entirely Merciful, the Especially Merciful,".to_string(),
                        juz: Some(1),
                        page: Some(1),
                    },
                ],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_corpus_stats() {
        let corpus = Corpus::sample();
        let stats = corpus.stats();
        assert_eq!(stats.chapters, 1);
        assert_eq!(stats.total_verses, 3);
        assert_eq!(stats.source, "Built-in sample");
    }

    #[test]
    fn chapter_lookup() {
        let corpus = Corpus::sample();
        assert!(corpus.chapter(1).is_some());
        assert!(corpus.chapter(2).is_none());
    }

    #[test]
    fn corpus_roundtrips_through_json() {
        let corpus = Corpus::sample();
        let json = serde_json::to_string(&corpus).unwrap();
        let back: Corpus = serde_json::from_str(&json).unwrap();
        assert_eq!(back.surahs.len(), 1);
        assert_eq!(back.surahs[0].verses[1].arabic, corpus.surahs[0].verses[1].arabic);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"surahs":[{"number":1,"name":"Al-Fatihah","verses":[
            {"number":1,"arabic":"بسم الله","translation":"..."}]}]}"#;
        let corpus: Corpus = serde_json::from_str(json).unwrap();
        assert_eq!(corpus.surahs[0].verses[0].juz, None);
        assert!(corpus.surahs[0].verses[0].verse_key.is_empty());
    }
}
