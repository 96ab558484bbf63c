//! Ping HTTP service
//!
//! ## Endpoints
//!
//! - `GET /ping` - always `200 OK` with body `pong`
//!
//! Every other path gets axum's default `404 Not Found`.

mod server;

pub use server::{PING_RESPONSE, ServerError, create_router, serve, start_api_server};
