use isahc::Error as IsahcError;

/// Failures that stop a run, plus the lower-level errors they are built from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Isahc Error: {0}")]
    Isahc(#[from] IsahcError),
    #[error("Http Error: {0}")]
    Http(#[from] isahc::http::Error),
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("Failed to encode query: {0}")]
    UrlEncode(#[from] serde_urlencoded::ser::Error),
    #[error("API key is required. Exiting.")]
    MissingApiKey,
    #[error("Error: The file '{0}' was not found.")]
    InputNotFound(String),
    #[error("Error reading file '{path}': {source}")]
    InputUnreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("No IP addresses found in the file.")]
    NoAddresses,
}

impl Error {
    pub fn input_not_found(path: impl Into<String>) -> Self {
        Self::InputNotFound(path.into())
    }

    pub fn input_unreadable(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::InputUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Whether the run stopped on user input rather than an internal failure.
    pub fn is_user_abort(&self) -> bool {
        matches!(
            self,
            Error::MissingApiKey
                | Error::InputNotFound(_)
                | Error::InputUnreadable { .. }
                | Error::NoAddresses
        )
    }
}
