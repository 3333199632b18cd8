//! Corpus download and caching
//!
//! Fetches the full corpus chapter by chapter from the Al-Quran Cloud API
//! (the official Quran Foundation source is preferred when credentials are
//! configured, but its endpoints are not wired up yet), reports progress
//! over a channel, and caches the result as JSON in the data directory.

use crate::config::AppConfig;
use crate::corpus::{Chapter, Corpus, Verse};
use crate::error::TarjumanError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Cache file name inside the data directory
const CACHE_FILE: &str = "quran_complete.json";

/// Chapters fetched from the fallback source
const CHAPTER_RANGE: std::ops::RangeInclusive<u32> = 1..=114;

/// Pause between chapter requests, to be polite to the public API
const REQUEST_DELAY: Duration = Duration::from_millis(50);

/// Download progress sent to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub current_chapter: u32,
    pub chapters_completed: usize,
    pub chapters_total: usize,
    pub state: DownloadState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    Starting,
    Downloading,
    Saving,
    Completed,
    Failed,
    Cancelled,
}

// ============ Al-Quran Cloud response types ============

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: i64,
    data: Vec<ApiEdition>,
}

#[derive(Debug, Deserialize)]
struct ApiEdition {
    number: u32,
    #[serde(default)]
    name: String,
    #[serde(rename = "englishName", default)]
    english_name: String,
    #[serde(rename = "revelationType", default)]
    revelation_type: String,
    ayahs: Vec<ApiAyah>,
}

#[derive(Debug, Deserialize)]
struct ApiAyah {
    #[serde(rename = "numberInSurah")]
    number_in_surah: u32,
    #[serde(default)]
    text: String,
    #[serde(default)]
    juz: Option<u32>,
    #[serde(default)]
    page: Option<u32>,
}

/// Get the data directory: a local `data/` folder when present (dev and
/// portable installs), otherwise the platform data directory.
pub fn get_data_dir() -> PathBuf {
    let local = PathBuf::from("data");
    if local.join(CACHE_FILE).exists() {
        return local;
    }
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("Tarjuman");
    }
    local
}

/// Load the cached corpus from disk, if present and readable.
pub fn load_cached_corpus(data_dir: &Path) -> Option<Corpus> {
    let path = data_dir.join(CACHE_FILE);
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(&path).ok()?;
    let corpus: Corpus = serde_json::from_str(&content).ok()?;
    tracing::info!(
        path = %path.display(),
        chapters = corpus.surahs.len(),
        "loaded cached corpus"
    );
    Some(corpus)
}

/// Save the corpus cache file.
pub fn save_corpus_cache(data_dir: &Path, corpus: &Corpus) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    let path = data_dir.join(CACHE_FILE);
    let content = serde_json::to_string_pretty(corpus)?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write corpus cache {:?}", path))?;
    Ok(path)
}

/// Build a `Chapter` out of the Arabic and translation editions returned
/// for one surah. Translation ayahs are paired by position; a missing
/// translation leaves the field empty rather than dropping the verse.
fn chapter_from_editions(arabic: ApiEdition, translation: Option<&ApiEdition>) -> Chapter {
    let number = arabic.number;
    let verses: Vec<Verse> = arabic
        .ayahs
        .into_iter()
        .enumerate()
        .map(|(i, ayah)| Verse {
            number: ayah.number_in_surah,
            verse_key: format!("{}:{}", number, ayah.number_in_surah),
            arabic: ayah.text,
            translation: translation
                .and_then(|t| t.ayahs.get(i))
                .map(|a| a.text.clone())
                .unwrap_or_default(),
            juz: ayah.juz,
            page: ayah.page,
        })
        .collect();

    Chapter {
        number,
        name: if arabic.english_name.is_empty() {
            format!("Surah {}", number)
        } else {
            arabic.english_name.clone()
        },
        name_arabic: arabic.name,
        revelation_place: arabic.revelation_type.to_lowercase(),
        verses_count: verses.len(),
        verses,
    }
}

async fn fetch_chapter(client: &reqwest::Client, config: &AppConfig, number: u32) -> Result<Chapter> {
    let url = format!(
        "{}/surah/{}/editions/{},{}",
        config.api_base, number, config.text_edition, config.translation_edition
    );
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch surah {}", number))?;

    if !response.status().is_success() {
        return Err(anyhow!("Surah {} fetch failed: HTTP {}", number, response.status()));
    }

    let body: ApiResponse = response
        .json()
        .await
        .with_context(|| format!("Failed to parse surah {} response", number))?;

    if body.code != 200 {
        return Err(anyhow!("Surah {}: API code {}", number, body.code));
    }

    let mut editions = body.data.into_iter();
    let arabic = editions
        .next()
        .ok_or_else(|| anyhow!("Surah {}: no text edition in response", number))?;
    let translation = editions.next();

    Ok(chapter_from_editions(arabic, translation.as_ref()))
}

/// Official Quran Foundation source. Credentials exist but the endpoint
/// wiring does not; callers fall back to the public API.
async fn download_from_official(_config: &AppConfig) -> Result<Corpus> {
    Err(anyhow!("official API endpoints not configured"))
}

/// Download the complete corpus, preferring the official source when
/// credentials are configured, and save it to the cache file.
///
/// Individual chapter failures are logged and skipped; the run yields
/// whatever chapters succeeded. Cancellation aborts between chapters.
pub async fn download_corpus(
    config: &AppConfig,
    data_dir: &Path,
    progress_tx: mpsc::Sender<DownloadProgress>,
    cancel_rx: &mut watch::Receiver<bool>,
) -> Result<Corpus> {
    if config.has_official_api() {
        match download_from_official(config).await {
            Ok(corpus) => {
                save_corpus_cache(data_dir, &corpus)?;
                return Ok(corpus);
            }
            Err(e) => {
                tracing::warn!("official API unavailable, using fallback: {e}");
            }
        }
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("Tarjuman/0.1")
        .build()?;

    let chapters_total = (*CHAPTER_RANGE.end() - *CHAPTER_RANGE.start() + 1) as usize;
    let mut progress = DownloadProgress {
        current_chapter: 0,
        chapters_completed: 0,
        chapters_total,
        state: DownloadState::Starting,
    };
    let _ = progress_tx.send(progress.clone()).await;

    let mut surahs = Vec::with_capacity(chapters_total);

    for number in CHAPTER_RANGE {
        if *cancel_rx.borrow() {
            progress.state = DownloadState::Cancelled;
            let _ = progress_tx.send(progress).await;
            return Err(TarjumanError::Cancelled.into());
        }

        progress.current_chapter = number;
        progress.state = DownloadState::Downloading;
        let _ = progress_tx.send(progress.clone()).await;

        match fetch_chapter(&client, config, number).await {
            Ok(chapter) => surahs.push(chapter),
            Err(e) => {
                tracing::warn!(chapter = number, "skipping chapter: {e}");
            }
        }

        progress.chapters_completed += 1;
        tokio::time::sleep(REQUEST_DELAY).await;
    }

    if surahs.is_empty() {
        progress.state = DownloadState::Failed;
        let _ = progress_tx.send(progress).await;
        return Err(TarjumanError::Download("no chapters downloaded".to_string()).into());
    }

    let corpus = Corpus {
        source: "Al-Quran Cloud API".to_string(),
        downloaded_at: chrono::Utc::now().to_rfc3339(),
        surahs,
    };

    progress.state = DownloadState::Saving;
    let _ = progress_tx.send(progress.clone()).await;
    save_corpus_cache(data_dir, &corpus)?;

    progress.state = DownloadState::Completed;
    let _ = progress_tx.send(progress).await;

    tracing::info!(chapters = corpus.surahs.len(), "corpus download complete");
    Ok(corpus)
}
