use serde::{Deserialize, Serialize};

pub const DEFAULT_OSDR_URL: &str = "https://visualization.osdr.nasa.gov/biodata/api";
pub const DEFAULT_CMR_URL: &str = "https://cmr.earthdata.nasa.gov";
pub const DEFAULT_IMAGES_URL: &str = "https://images-api.nasa.gov";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

/// Base URLs of the upstream NASA APIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NasaEndpoints {
    pub osdr: String,
    pub cmr: String,
    pub images: String,
}

impl Default for NasaEndpoints {
    fn default() -> Self {
        Self {
            osdr: DEFAULT_OSDR_URL.to_string(),
            cmr: DEFAULT_CMR_URL.to_string(),
            images: DEFAULT_IMAGES_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    /// Absent key disables the fallback without failing the request.
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl GeminiConfig {
    /// Picks up `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn from_env() -> Self {
        let api_key = ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|key| !key.trim().is_empty()));

        Self {
            api_key,
            ..Self::default()
        }
    }
}
