use thiserror::Error;

/// Message stored on a unit whenever its remote call fails.
pub const TRANSLATE_FAILED_MESSAGE: &str =
    "Failed to translate HTML. Please check your input or try again later.";

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("No Gemini API key configured (set API_KEY or run `html-translate config --api-key`)")]
    MissingApiKey,

    #[error("HTTP request error: {0}")]
    Http(reqwest::Error),

    #[error("Gemini API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        TranslateError::Http(e.without_url())
    }
}

impl TranslateError {
    /// Short text shown on the affected unit. Details go to the log.
    pub fn user_message(&self) -> String {
        TRANSLATE_FAILED_MESSAGE.to_string()
    }
}
