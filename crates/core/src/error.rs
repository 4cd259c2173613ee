use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("{backend} responded with status {status}")]
    Status { backend: String, status: u16 },

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("missing GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingCredential,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("generative API responded with status {0}")]
    Status(u16),
}
