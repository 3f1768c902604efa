use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerbDeckError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Failed HTTP GET {url}: {source}")]
    Fetch { url: String, source: Box<reqwest::Error> },

    #[error("URL template must contain the word placeholder exactly once: {0}")]
    InvalidTemplate(String),

    #[error("Deck template must be a JSON object: {0}")]
    InvalidDeck(String),

    #[error("Fetched batch does not line up with the word list at index {index}")]
    BatchMismatch { index: usize },

    #[error("VerbDeckError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for VerbDeckError {
    fn from(error: std::io::Error) -> Self {
        VerbDeckError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for VerbDeckError {
    fn from(error: reqwest::Error) -> Self {
        VerbDeckError::Reqwest(Box::new(error))
    }
}
