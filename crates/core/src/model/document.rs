use serde::{Deserialize, Serialize};

/// Result of a successful resume generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub filename: String,
    /// Server-relative path for fetching the file, when the server offers one.
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub career_tips: Vec<String>,
}

/// Result of a successful translation of a generated resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedDocument {
    #[serde(rename = "translated_filename")]
    pub filename: String,
    pub download_url: String,
}
