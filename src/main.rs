//! Tarjuman - Qur'an recitation matching
//!
//! Reads recognized Arabic transcripts line by line on stdin (the speech
//! recognizer's output), matches each against the corpus, and prints the
//! verse, translation, and surrounding context.

use anyhow::Result;
use std::sync::Arc;
use tarjuman::{
    download_corpus, get_data_dir, load_cached_corpus, AppConfig, Corpus, DownloadProgress,
    Engine, MatchResult,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

/// Verses of context shown on either side of a match
const CONTEXT_WINDOW: usize = 2;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    let data_dir = get_data_dir();
    let want_download = std::env::args().any(|a| a == "--download");

    let corpus = if want_download {
        fetch_corpus(&config, &data_dir).await?
    } else {
        load_cached_corpus(&data_dir).unwrap_or_else(|| {
            tracing::warn!(
                "no cached corpus in {:?}; using built-in sample (run with --download)",
                data_dir
            );
            Corpus::sample()
        })
    };

    let engine = Arc::new(Engine::new(corpus));
    let stats = engine.stats();
    println!(
        "Ready: {} chapters, {} verses ({})",
        stats.chapters,
        stats.total_verses,
        if stats.source.is_empty() { "unknown source" } else { stats.source.as_str() }
    );

    // Recognition producer: transcripts flow through a bounded channel so
    // the matcher never reads recognizer state directly.
    let (tx, mut rx) = mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });

    while let Some(line) = rx.recv().await {
        let line = line.trim();
        match line {
            "" => continue,
            ":quit" => break,
            ":reload" => match fetch_corpus(&config, &data_dir).await {
                Ok(corpus) => {
                    engine.reload(corpus);
                    let stats = engine.stats();
                    println!("Reloaded: {} chapters, {} verses", stats.chapters, stats.total_verses);
                }
                Err(err) => {
                    tracing::error!("reload failed, keeping current corpus: {err:#}");
                    println!("Reload failed; still serving the current corpus");
                }
            },
            transcript => match engine.find_match(transcript) {
                Some(result) => print_match(&engine, &result),
                None => println!("No match for: {transcript}"),
            },
        }
    }

    Ok(())
}

async fn fetch_corpus(config: &AppConfig, data_dir: &std::path::Path) -> Result<Corpus> {
    let (progress_tx, mut progress_rx) = mpsc::channel::<DownloadProgress>(32);
    let (_cancel_tx, mut cancel_rx) = watch::channel(false);

    let reporter = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            if progress.chapters_completed % 10 == 0 {
                tracing::info!(
                    completed = progress.chapters_completed,
                    total = progress.chapters_total,
                    state = ?progress.state,
                    "downloading corpus"
                );
            }
        }
    });

    let corpus = download_corpus(config, data_dir, progress_tx, &mut cancel_rx).await?;
    let _ = reporter.await;
    Ok(corpus)
}

fn print_match(engine: &Engine, result: &MatchResult) {
    println!();
    println!(
        "{} {}:{} (confidence {:.0}%)",
        result.surah_name,
        result.surah,
        result.verse,
        result.confidence * 100.0
    );
    println!("  {}", result.arabic);
    println!("  {}", result.translation);

    let context = engine.context(result.surah, result.verse, CONTEXT_WINDOW);
    for verse in &context.before {
        println!("  before {}: {}", verse.number, verse.arabic);
    }
    for verse in &context.after {
        println!("  after  {}: {}", verse.number, verse.arabic);
    }
}
