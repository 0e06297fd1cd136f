use async_trait::async_trait;
use atpost::{AtUri, Atproto, Cid, Config, Error, Post, RecordRef, Session};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateSession {
        identifier: String,
        password: String,
    },
    CreateRecord {
        access_token: String,
        repo: String,
        collection: String,
        record: serde_json::Value,
    },
}

/// Answers like a server that knows a single account.
struct Stub {
    password: &'static str,
    session: Session,
    record: Result<RecordRef, &'static str>,
    calls: Mutex<Vec<Call>>,
}

impl Stub {
    fn new() -> Stub {
        Stub {
            password: "correct-pass",
            session: Session::new("tok123", "did:plc:abc".to_owned()),
            record: Ok(RecordRef {
                uri: AtUri("at://did:plc:abc/app.bsky.feed.post/1".into()),
                cid: Cid("bafy123".into()),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Atproto for Stub {
    async fn create_session(&self, identifier: &str, password: &str) -> Result<Session, Error> {
        self.calls.lock().unwrap().push(Call::CreateSession {
            identifier: identifier.into(),
            password: password.into(),
        });
        if password != self.password {
            return Err(Error::Xrpc {
                status: StatusCode::UNAUTHORIZED,
                error: "AuthenticationRequired".into(),
                message: Some("Invalid identifier or password".into()),
            });
        }
        Ok(self.session.clone())
    }

    async fn create_record(
        &self,
        access_token: &str,
        repo: &str,
        collection: &str,
        record: &Post,
    ) -> Result<RecordRef, Error> {
        self.calls.lock().unwrap().push(Call::CreateRecord {
            access_token: access_token.into(),
            repo: repo.into(),
            collection: collection.into(),
            record: serde_json::to_value(record).unwrap(),
        });
        self.record.clone().map_err(|error| Error::Xrpc {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            message: None,
        })
    }
}

fn config(password: &str) -> Config {
    Config {
        handle: "alice.example".into(),
        password: password.into(),
        service: "http://127.0.0.1:2583".into(),
    }
}

#[tokio::test]
async fn posts_with_session_credentials() {
    let stub = Stub::new();
    let mut out = Vec::new();

    let before = Utc::now();
    let record = atpost::run(&stub, &config("correct-pass"), "hello", &mut out)
        .await
        .unwrap();
    let after = Utc::now();

    assert_eq!(record.uri.0, "at://did:plc:abc/app.bsky.feed.post/1");
    assert_eq!(record.cid.0, "bafy123");

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        Call::CreateSession {
            identifier: "alice.example".into(),
            password: "correct-pass".into(),
        }
    );
    match &calls[1] {
        Call::CreateRecord {
            access_token,
            repo,
            collection,
            record,
        } => {
            assert_eq!(access_token, "tok123");
            assert_eq!(repo, "did:plc:abc");
            assert_eq!(collection, "app.bsky.feed.post");
            assert_eq!(record["$type"], "app.bsky.feed.post");

            let created_at = record["createdAt"].as_str().unwrap();
            let when = DateTime::parse_from_rfc3339(created_at)
                .unwrap()
                .with_timezone(&Utc);
            assert!(before <= when && when <= after);
            assert_eq!(
                record["text"].as_str().unwrap(),
                format!("hello at {}", created_at)
            );
        }
        other => panic!("unexpected call: {:?}", other),
    }

    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with(
        "Attempting to log in as: alice.example\nLogin successful!\n"
    ));
    assert!(out.contains("User DID: did:plc:abc\n"));
    assert!(out.contains(
        "Creating record in repo 'did:plc:abc', collection 'app.bsky.feed.post'\n"
    ));
    assert!(out.contains("Post URI: at://did:plc:abc/app.bsky.feed.post/1\n"));
    assert!(out.contains("Post CID: bafy123\n"));
    assert!(out.ends_with("Finished.\n"));
}

#[tokio::test]
async fn failed_login_submits_nothing() {
    let stub = Stub::new();
    let mut out = Vec::new();

    let err = atpost::run(&stub, &config("wrong-pass"), "hello", &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], Call::CreateSession { .. }));

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(
        "Error logging in: 401 Unauthorized: AuthenticationRequired (Invalid identifier or password)"
    ));
    assert!(!out.contains("Login successful!"));
    assert!(!out.contains("Finished."));
}

#[tokio::test]
async fn empty_session_submits_nothing() {
    let mut stub = Stub::new();
    stub.session = Session::new("", "did:plc:abc".to_owned());
    let mut out = Vec::new();

    let err = atpost::run(&stub, &config("correct-pass"), "hello", &mut out)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Authentication(ref inner) if matches!(**inner, Error::InvalidSession)
    ));
    assert_eq!(stub.calls().len(), 1);
}

#[tokio::test]
async fn failed_submission_is_reported() {
    let mut stub = Stub::new();
    stub.record = Err("InvalidRecord");
    let mut out = Vec::new();

    let err = atpost::run(&stub, &config("correct-pass"), "hello", &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Submission(_)));
    assert_eq!(stub.calls().len(), 2);

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Login successful!\n"));
    assert!(out.contains("Error creating record: 400 Bad Request: InvalidRecord\n"));
    assert!(!out.contains("Post creation successful!"));
    assert!(!out.contains("Finished."));
}

#[test]
fn missing_credentials_stop_before_login() {
    let err = Config::from_lookup(|name| match name {
        "ATPROTO_HANDLE" => Some("alice.example".into()),
        _ => None,
    })
    .unwrap_err();
    assert!(err.is_config());
    assert_eq!(
        err.to_string(),
        "ATPROTO_PASSWORD not found in environment variables or .env file"
    );
}

#[tokio::test]
#[ignore] // Requires valid credentials
async fn live_post() {
    atpost::load_dotenv();
    let config = Config::from_env().unwrap();
    let client = atpost::Client::for_service(&config.service);
    let record = atpost::run(&client, &config, "atpost integration test", &mut std::io::sink())
        .await
        .unwrap();
    assert!(record.uri.0.starts_with("at://"));
}
