//! Blocking client SDK for the local Anytype REST API.
//!
//! # Overview
//! `AnytypeClient` turns each API call into an `HttpRequest`, hands it to a
//! `Transport`, and parses the `HttpResponse` back into typed models.
//! Request building and response parsing never touch the network, so the
//! whole SDK can be exercised against canned responses.
//!
//! # Layers
//! - `http`, `transport`, `client`: request/response values, the ureq
//!   transport, and the build/parse/dispatch core.
//! - `models`: wire types mirrored from the API.
//! - `api`: one handle per resource kind (`client.objects()`, ...).
//! - `query`, `paginator`: `field__op` filter queries and lazy paging.
//! - `db`, `simple`, `orm`: optional facades over `QueryBuilder` and the
//!   resource handles.
//!
//! ```no_run
//! use anytype_core::{AnytypeClient, ClientConfig};
//!
//! # fn main() -> anytype_core::Result<()> {
//! let client = AnytypeClient::new(ClientConfig::new("api-key"));
//! let open = client
//!     .query("space-id")
//!     .of_type("task")
//!     .filter([("completed", false)])
//!     .limit(20)
//!     .all()?;
//! println!("{} open tasks", open.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod orm;
pub mod paginator;
pub mod query;
pub mod simple;
pub mod transport;

#[cfg(test)]
mod testing;

pub use api::ListParams;
pub use client::{AnytypeClient, ApiRequest};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorDetails, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use paginator::Paginator;
pub use query::{Query, QueryBuilder};
pub use transport::{Transport, UreqTransport};
