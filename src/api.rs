use crate::{Error, Post, RecordRef, Session};
use async_trait::async_trait;

/// The two server operations needed to publish a post.
///
/// [`Client`][`crate::Client`] implements this over HTTP; anything else implementing it can stand
/// in for a server.
#[async_trait]
pub trait Atproto: Send + Sync {
    /// Logs in, returning a session carrying an access token and the account's DID.
    async fn create_session(&self, identifier: &str, password: &str) -> Result<Session, Error>;

    /// Stores `record` in the repository `repo`, under `collection`.
    async fn create_record(
        &self,
        access_token: &str,
        repo: &str,
        collection: &str,
        record: &Post,
    ) -> Result<RecordRef, Error>;
}
