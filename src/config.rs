use crate::Error;
use std::fmt::{self, Debug};
use std::path::PathBuf;

/// Environment variable holding the account handle.
pub const HANDLE_VAR: &str = "ATPROTO_HANDLE";
/// Environment variable holding the account password.
pub const PASSWORD_VAR: &str = "ATPROTO_PASSWORD";
/// Environment variable overriding the server URL.
pub const SERVICE_VAR: &str = "ATPROTO_SERVICE";

/// Server used when [`SERVICE_VAR`] is unset.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

/// Credentials and server location.
#[derive(Clone)]
pub struct Config {
    /// Account handle, e.g. `alice.example`.
    pub handle: String,
    /// Account password (ideally an app password).
    pub password: String,
    /// Base URL of the account's server.
    pub service: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// An empty value counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(Error::MissingConfig(name))
        };

        let handle = required(HANDLE_VAR)?;
        let password = required(PASSWORD_VAR)?;
        let service = lookup(SERVICE_VAR)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE.to_owned());

        Ok(Config {
            handle,
            password,
            service,
        })
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("handle", &self.handle)
            .field("password", &"<redacted>")
            .field("service", &self.service)
            .finish()
    }
}

/// Loads variables from a `.env` file in the working directory or one of its parents.
///
/// A missing file is not an error; it is logged and `None` is returned.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenv::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Some(path)
        }
        Err(err) => {
            tracing::warn!(%err, "could not load .env file");
            None
        }
    }
}
