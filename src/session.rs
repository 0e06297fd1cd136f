use crate::Error;
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// A decentralized identifier naming an account, e.g. `did:plc:abc`.
#[derive(
    Clone,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Did(pub String);

impl Did {
    /// Get the DID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Logged-in session, as returned by `com.atproto.server.createSession`.
///
/// Sessions are never refreshed, so the refresh token the server also sends is not kept.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub(crate) access_jwt: String,
    /// The handle the server resolved the login identifier to.
    #[serde(default)]
    pub handle: String,
    /// The account's DID, which also names its repository.
    pub did: Did,
}

impl Session {
    /// Creates a session from an access token and DID.
    pub fn new(access_jwt: impl Into<String>, did: impl Into<Did>) -> Session {
        Session {
            access_jwt: access_jwt.into(),
            handle: String::new(),
            did: did.into(),
        }
    }

    /// The bearer token authorizing calls made on behalf of this session.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_jwt
    }

    /// Fails unless both the access token and the DID are non-empty.
    pub fn validate(&self) -> Result<(), Error> {
        if self.access_jwt.is_empty() || self.did.0.is_empty() {
            return Err(Error::InvalidSession);
        }
        Ok(())
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_jwt", &"<redacted>")
            .field("handle", &self.handle)
            .field("did", &self.did)
            .finish()
    }
}
