//! Smoke checks against a running ping service
//!
//! ## Adding New Checks
//!
//! 1. Create a new file in `src/checks/` (e.g., `mycheck.rs`)
//! 2. Implement the `Check` trait
//! 3. Register in `registry.rs`
//! 4. Add to `mod.rs` exports

mod ping;
pub mod registry;
mod runner;
mod traits;
mod unknown_route;

pub use ping::{PING_REASON, PingCheck};
pub use registry::{CHECKS, enabled_checks, get_check, list_checks, parse_check_list};
pub use runner::{SUITE_LABEL, run_check, run_checks};
pub use traits::*;
pub use unknown_route::{UNKNOWN_PATH, UnknownRouteCheck};
