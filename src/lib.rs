//! okta-core: authentication and request-execution core for Okta API tool
//! servers.
//!
//! Turns a long-lived RSA credential into short-lived bearer tokens via the
//! OAuth2 client-credentials + private-key-JWT flow (RFC 7523), wraps every
//! outbound call with structured error translation and automatic rate-limit
//! backoff, and walks `Link`-header cursor pagination lazily. Tool servers
//! build one [`client::OktaClient`] per scope set and call `get`/`post`/
//! `put`/`patch`/`delete` against relative API paths.
//!
//! # Quick Start
//!
//! ```no_run
//! use okta_core::prelude::*;
//!
//! # async fn example() -> okta_core::error::Result<()> {
//! let config = OktaConfig::from_env()?;
//! let client = OktaClient::new(config, &["okta.users.read"])?;
//! let page = client.get("/users", &[("limit", "200")]).await?;
//! println!("{}", page.data);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
