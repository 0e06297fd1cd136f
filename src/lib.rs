//! atpost logs into an [AT Protocol](https://atproto.com/) server and publishes a single post.
//!
//! ```no_run
//! use atpost::{Client, Config};
//!
//! # async fn f() -> Result<(), Box<dyn std::error::Error>> {
//! // Read ATPROTO_HANDLE and ATPROTO_PASSWORD
//! let config = Config::from_env()?;
//!
//! // Log in and post, printing progress as we go
//! let client = Client::for_service(&config.service);
//! let record = atpost::run(&client, &config, "hello from atpost", &mut std::io::stdout()).await?;
//! println!("{}", record.uri);
//! # Ok(())
//! # }
//! ```
//!
//! The server is reached through the [`Atproto`] trait, so [`run`] can be driven by any
//! implementation of it rather than a live [`Client`].

#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod api;
mod client;
mod config;
mod error;
mod post;
mod run;
mod session;

pub use crate::api::Atproto;
pub use crate::client::Client;
pub use crate::config::{
    load_dotenv, Config, DEFAULT_SERVICE, HANDLE_VAR, PASSWORD_VAR, SERVICE_VAR,
};
pub use crate::error::Error;
pub use crate::post::{AtUri, Cid, Post, RecordRef};
pub use crate::run::run;
pub use crate::session::{Did, Session};
