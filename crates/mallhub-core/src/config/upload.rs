//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Local-disk upload storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Root directory for all uploads.
    #[serde(default = "default_path")]
    pub path: String,
    /// Sub-directory for images.
    #[serde(default = "default_image_dir")]
    pub image_dir: String,
    /// Sub-directory for other files.
    #[serde(default = "default_file_dir")]
    pub file_dir: String,
    /// Maximum size of one uploaded file in bytes.
    #[serde(default = "default_max_size")]
    pub max_file_size_bytes: u64,
    /// Accepted image extensions (lowercase, no dot).
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    /// Accepted file extensions (lowercase, no dot).
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            image_dir: default_image_dir(),
            file_dir: default_file_dir(),
            max_file_size_bytes: default_max_size(),
            image_extensions: default_image_extensions(),
            file_extensions: default_file_extensions(),
        }
    }
}

fn default_path() -> String {
    "data/upload".to_string()
}

fn default_image_dir() -> String {
    "image".to_string()
}

fn default_file_dir() -> String {
    "file".to_string()
}

fn default_max_size() -> u64 {
    5 * 1024 * 1024
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_file_extensions() -> Vec<String> {
    ["txt", "pdf", "zip", "doc", "docx", "xls", "xlsx", "csv"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}
