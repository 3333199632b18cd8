//! Tarjuman - Qur'an recitation matching engine
//!
//! Backend library matching recognized Arabic speech fragments to verses.

pub mod corpus;
pub mod normalize;
pub mod similarity;
pub mod index;
pub mod matcher;
pub mod engine;
pub mod error;
pub mod config;
pub mod downloader;

pub use config::AppConfig;
pub use corpus::{Chapter, Corpus, CorpusStats, Verse};
pub use engine::Engine;
pub use error::TarjumanError;
pub use index::VerseIndex;
pub use matcher::{MatchResult, VerseContext, DEFAULT_THRESHOLD};
pub use normalize::normalize;
pub use similarity::similarity;
pub use downloader::{
    download_corpus, get_data_dir, load_cached_corpus, save_corpus_cache,
    DownloadProgress, DownloadState,
};
