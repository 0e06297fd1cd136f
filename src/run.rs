use crate::{Atproto, Config, Error, Post, RecordRef};
use std::io::Write;

/// Logs in, then publishes a post whose text starts with `prefix`.
///
/// Progress and results are written to `out` as they happen. The first failure is written to
/// `out` as well and then returned; nothing is retried, and a failed login means no record is
/// submitted.
#[tracing::instrument(skip(api, config, out), fields(handle = %config.handle))]
pub async fn run<A, W>(
    api: &A,
    config: &Config,
    prefix: &str,
    out: &mut W,
) -> Result<RecordRef, Error>
where
    A: Atproto + ?Sized,
    W: Write + Send,
{
    writeln!(out, "Attempting to log in as: {}", config.handle)?;
    let session = match api
        .create_session(&config.handle, &config.password)
        .await
        .and_then(|session| session.validate().map(|()| session))
    {
        Ok(session) => session,
        Err(err) => {
            writeln!(out, "Error logging in: {}", err)?;
            return Err(Error::Authentication(Box::new(err)));
        }
    };
    writeln!(out, "Login successful!")?;
    writeln!(out, "User DID: {}", session.did)?;

    writeln!(out, "Attempting to create post...")?;
    let post = Post::now(prefix);
    writeln!(out, "Post content: {}", post.text)?;

    let repo = session.did.as_str();
    writeln!(
        out,
        "Creating record in repo '{}', collection '{}'",
        repo,
        Post::COLLECTION
    )?;
    let record = match api
        .create_record(session.access_token(), repo, Post::COLLECTION, &post)
        .await
    {
        Ok(record) => record,
        Err(err) => {
            writeln!(out, "Error creating record: {}", err)?;
            return Err(Error::Submission(Box::new(err)));
        }
    };
    writeln!(out, "Post creation successful!")?;
    writeln!(out, "Post URI: {}", record.uri)?;
    writeln!(out, "Post CID: {}", record.cid)?;

    writeln!(out, "Finished.")?;
    Ok(record)
}
