use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Debug};

/// An `at://` URI locating a record in a repository.
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
pub struct AtUri(pub String);

/// A content identifier, the hash of a stored record.
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
pub struct Cid(pub String);

/// Identifies a record after the server has stored it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct RecordRef {
    /// Where the record lives.
    pub uri: AtUri,
    /// Hash of the record's content.
    pub cid: Cid,
}

/// Describes a post record.
///
/// A post's timestamp is captured once, at construction, and appears both as `createdAt` and at
/// the end of the post text.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Post {
    #[serde(rename = "$type")]
    record_type: &'static str,
    /// Post text.
    pub text: String,
    #[serde(serialize_with = "serialize_timestamp")]
    created_at: DateTime<Utc>,
    /// Languages the text is written in, e.g. `en`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub langs: Vec<String>,
}

impl Post {
    /// The collection (and `$type`) of post records.
    pub const COLLECTION: &'static str = "app.bsky.feed.post";

    /// Describes a post created at `when`, with text `"{prefix} at {timestamp}"`.
    pub fn at(prefix: &str, when: DateTime<Utc>) -> Post {
        Post {
            record_type: Post::COLLECTION,
            text: format!("{} at {}", prefix, timestamp(&when)),
            created_at: when,
            langs: Vec::new(),
        }
    }

    /// Describes a post created now.
    pub fn now(prefix: &str) -> Post {
        Post::at(prefix, Utc::now())
    }

    /// Sets the languages of the post text.
    pub fn with_langs(mut self, langs: Vec<String>) -> Post {
        self.langs = langs;
        self
    }

    /// The record type, always [`Post::COLLECTION`].
    #[must_use]
    pub fn record_type(&self) -> &str {
        self.record_type
    }

    /// The creation time of the post.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Debug for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_value(self).map_err(|_| fmt::Error)?)
    }
}

fn timestamp(when: &DateTime<Utc>) -> String {
    when.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn serialize_timestamp<S>(when: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    timestamp(when).serialize(serializer)
}
