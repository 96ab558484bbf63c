//! Pingstep Test Kit
//!
//! Test infrastructure for exercising the ping service and its reports.
//!
//! This crate provides:
//! - [`TestServer`] - any axum `Router` served on an ephemeral local port
//! - [`ResultsDir`] - a temporary results directory and readers for what
//!   the report writer put in it
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use pingstep_testkit::TestServer;
//!
//! # async fn example() -> std::io::Result<()> {
//! let server = TestServer::spawn(Router::new().route("/ping", get(|| async { "pong" }))).await?;
//! println!("serving on {}", server.base_url());
//! # Ok(())
//! # }
//! ```

pub mod results;
pub mod server;

// Re-exports for convenience
pub use results::ResultsDir;
pub use server::TestServer;
