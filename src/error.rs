//! Error types for Tarjuman

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarjumanError {
    #[error("Download error: {0}")]
    Download(String),

    #[error("Download cancelled")]
    Cancelled,
}

impl serde::Serialize for TarjumanError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
