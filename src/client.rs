use crate::{Atproto, Error, Post, RecordRef, Session};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

macro_rules! request_impl {
    ($($f:ident),* $(,)*) => {
        $(
            #[inline]
            pub(crate) fn $f(&self, nsid: &str) -> RequestBuilder {
                tracing::info!(nsid, concat!("Client::", stringify!($f)));
                self.client.$f(format!("{}{}", self.base_url, nsid))
            }
        )*
    };
}

/// HTTP client for a server's XRPC endpoints.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) base_url: Cow<'static, str>,
    pub(crate) client: reqwest::Client,
}

impl Client {
    /// Creates a new `Client` with the default base URL, `https://bsky.social/xrpc/`. Use
    /// [`Client::with_base_url`] or [`Client::for_service`] to change the base URL.
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // tested to not panic
    pub fn new() -> Client {
        const USER_AGENT: &str = concat!("atpost/", env!("CARGO_PKG_VERSION"));

        Client {
            base_url: Cow::Borrowed("https://bsky.social/xrpc/"),
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap(),
        }
    }

    /// Creates a new `Client` with a custom XRPC base URL.
    #[must_use]
    pub fn with_base_url(mut self, mut base_url: String) -> Client {
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = Cow::Owned(base_url);
        self
    }

    /// Creates a new `Client` talking to the server at `service`, e.g. `https://bsky.social`.
    #[must_use]
    pub fn for_service(service: &str) -> Client {
        Client::new().with_base_url(format!("{}/xrpc/", service.trim_end_matches('/')))
    }

    /// Logs in with a handle (or DID or email) and password, returning a [`Session`].
    #[tracing::instrument(skip(self, password))]
    pub async fn create_session(&self, identifier: &str, password: &str) -> Result<Session, Error> {
        let session: Session = decode(
            self.post("com.atproto.server.createSession")
                .json(&CreateSessionRequest {
                    identifier,
                    password,
                })
                .send()
                .await?,
        )
        .await?;
        tracing::info!(did = %session.did, "logged in");
        Ok(session)
    }

    /// Stores `record` in `repo` under `collection`, authorized by `access_token`.
    #[tracing::instrument(skip(self, access_token))]
    pub async fn create_record(
        &self,
        access_token: &str,
        repo: &str,
        collection: &str,
        record: &Post,
    ) -> Result<RecordRef, Error> {
        let record: RecordRef = decode(
            self.post("com.atproto.repo.createRecord")
                .bearer_auth(access_token)
                .json(&CreateRecordRequest {
                    repo,
                    collection,
                    record,
                })
                .send()
                .await?,
        )
        .await?;
        tracing::info!(uri = %record.uri, cid = %record.cid);
        Ok(record)
    }

    request_impl!(post);
}

impl Default for Client {
    fn default() -> Client {
        Client::new()
    }
}

#[async_trait]
impl Atproto for Client {
    async fn create_session(&self, identifier: &str, password: &str) -> Result<Session, Error> {
        Client::create_session(self, identifier, password).await
    }

    async fn create_record(
        &self,
        access_token: &str,
        repo: &str,
        collection: &str,
        record: &Post,
    ) -> Result<RecordRef, Error> {
        Client::create_record(self, access_token, repo, collection, record).await
    }
}

/// Decodes a successful response body, or turns a failed one into an error.
///
/// Failed responses carrying an XRPC error document become [`Error::Xrpc`]; anything else is
/// reported as the plain status error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    let checked = response.error_for_status_ref().map(drop);
    if let Err(err) = checked {
        let body = response.bytes().await?;
        return Err(xrpc_error(status, &body).unwrap_or(Error::Request(err)));
    }
    Ok(response.json().await?)
}

fn xrpc_error(status: StatusCode, body: &[u8]) -> Option<Error> {
    let XrpcErrorResponse { error, message } = serde_json::from_slice(body).ok()?;
    Some(Error::Xrpc {
        status,
        error,
        message,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'a str,
    record: &'a Post,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct XrpcErrorResponse {
    error: String,
    #[serde(default)]
    message: Option<String>,
}
