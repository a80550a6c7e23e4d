use thiserror::Error;

/// Shown when neither the server nor the transport gave us anything better
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Not authorized{}", suffix(.message))]
    Unauthorized { message: Option<String> },
    #[error("Resource not found{}", suffix(.message))]
    NotFound { message: Option<String> },
    #[error("Server error: {status}{}", suffix(.message))]
    Status { status: u16, message: Option<String> },
    #[error("Request rejected{}", suffix(.message))]
    Business { message: Option<String> },
    #[error("Cannot filter on {field} inside a parent-scoped list")]
    ParentFilterConflict { field: String },
    #[error("Response envelope had no result")]
    MissingResult,
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
}

fn suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(" - {}", m),
        _ => String::new(),
    }
}

/// The two failure categories surfaced to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or non-2xx status
    Network,
    /// `isSuccess: false` inside an otherwise successful response
    Business,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Business { .. }
            | ApiError::MissingResult
            | ApiError::ParentFilterConflict { .. } => ErrorKind::Business,
            _ => ErrorKind::Network,
        }
    }

    /// Message returned by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::NotFound { message }
            | ApiError::Status { message, .. }
            | ApiError::Business { message } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }

    /// Text for a notification: the server's message, else the generic fallback
    pub fn user_message(&self) -> String {
        if let ApiError::ParentFilterConflict { .. } = self {
            return self.to_string();
        }
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}
