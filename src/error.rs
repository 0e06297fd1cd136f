use reqwest::StatusCode;

/// Errors that might occur when using the library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required configuration value was absent or empty.
    #[error("{0} not found in environment variables or .env file")]
    MissingConfig(&'static str),

    /// The server accepted the login but returned an empty access token or DID.
    #[error("session is missing an access token or DID")]
    InvalidSession,

    /// The server answered with an XRPC error document.
    #[error("{status}: {error}{}", detail(.message))]
    Xrpc {
        /// HTTP status of the response.
        status: StatusCode,
        /// Error name, e.g. `AuthenticationRequired`.
        error: String,
        /// Human-readable description, if the server sent one.
        message: Option<String>,
    },

    /// Logging in failed.
    #[error("error logging in: {0}")]
    Authentication(#[source] Box<Error>),

    /// Creating the post record failed.
    #[error("error creating record: {0}")]
    Submission(#[source] Box<Error>),

    /// An I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// An HTTP client error (including status codes indicating failure).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl Error {
    /// Returns true if this error aborted the run before any network call.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Error::MissingConfig(_))
    }
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(" ({message})"))
        .unwrap_or_default()
}
