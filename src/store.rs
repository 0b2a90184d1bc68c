//! File-backed dataset storage and photo uploads.

use crate::model::Dataset;
use crate::parser::{DatasetError, dataset_from_document, parse_dataset, parse_document, validate_for_save};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ALLOWED_PHOTO_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];
pub const DEFAULT_URL_PREFIX: &str = "/static/uploads";

static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("failed to encode dataset: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Empty filename")]
    EmptyFileName,
    #[error("Only png/jpg/jpeg/webp allowed (got `{0}`)")]
    UnsupportedExtension(String),
}

/// Boundary between the interaction handlers and wherever the dataset lives.
pub trait DatasetStore {
    fn load(&self) -> Result<Dataset, StoreError>;

    /// Persists raw edited text and returns the dataset it describes.
    fn save_text(&self, text: &str) -> Result<Dataset, StoreError>;

    fn save(&self, dataset: &Dataset) -> Result<(), StoreError>;

    /// Stores a photo and returns the url to put in a person's `photo` field.
    fn upload_photo(&self, file_name: &str, bytes: &[u8]) -> Result<String, StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileStore {
    data_file: PathBuf,
    upload_dir: PathBuf,
    url_prefix: String,
}

impl FileStore {
    pub fn new(data_file: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            upload_dir: upload_dir.into(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }

    /// `<dir>/data/family.json` and `<dir>/static/uploads`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            dir.join("data").join("family.json"),
            dir.join("static").join("uploads"),
        )
    }

    pub fn with_url_prefix(mut self, prefix: &str) -> Self {
        self.url_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    fn write_json(&self, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.data_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.data_file, contents)?;
        tracing::info!(path = %self.data_file.display(), "dataset saved");
        Ok(())
    }
}

impl DatasetStore for FileStore {
    fn load(&self) -> Result<Dataset, StoreError> {
        if !self.data_file.exists() {
            tracing::debug!(path = %self.data_file.display(), "no dataset yet, starting empty");
            return Ok(Dataset::default());
        }
        let contents = std::fs::read_to_string(&self.data_file)?;
        Ok(parse_dataset(&contents)?)
    }

    fn save_text(&self, text: &str) -> Result<Dataset, StoreError> {
        let document = parse_document(text)?;
        validate_for_save(&document)?;
        let dataset = dataset_from_document(document.clone())?;
        self.write_json(&serde_json::to_string_pretty(&document)?)?;
        Ok(dataset)
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        self.write_json(&serde_json::to_string_pretty(dataset)?)
    }

    fn upload_photo(&self, file_name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        if file_name.trim().is_empty() {
            return Err(StoreError::EmptyFileName);
        }
        let extension = photo_extension(file_name)
            .ok_or_else(|| StoreError::UnsupportedExtension(file_name.to_string()))?;

        let safe = secure_filename(file_name);
        let suffix = format!(".{extension}");
        let mut stem = if safe.to_ascii_lowercase().ends_with(&suffix) {
            safe[..safe.len() - suffix.len()].to_string()
        } else {
            safe
        };
        if stem.is_empty() {
            stem = "photo".to_string();
        }

        std::fs::create_dir_all(&self.upload_dir)?;
        let mut final_name = format!("{stem}.{extension}");
        let mut counter = 1;
        while self.upload_dir.join(&final_name).exists() {
            final_name = format!("{stem}_{counter}.{extension}");
            counter += 1;
        }

        std::fs::write(self.upload_dir.join(&final_name), bytes)?;
        tracing::info!(file = %final_name, size = bytes.len(), "photo uploaded");
        Ok(format!("{}/{}", self.url_prefix, final_name))
    }
}

/// Lowercased extension when it is an accepted image type.
fn photo_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();
    ALLOWED_PHOTO_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// Reduces an uploaded name to a flat, ASCII-only file name.
fn secure_filename(file_name: &str) -> String {
    let flattened = file_name.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(&joined, "");
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}
