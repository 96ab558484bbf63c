//! Ping service client
//!
//! HTTP client used by the smoke checks to call a running ping service.

mod http;
mod types;

pub use http::{ClientError, ClientResult, PingClient};
pub use types::HttpResponse;
