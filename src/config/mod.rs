//! Configuration parsing
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ## Configuration Format
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//!
//! client:
//!   base_url: http://localhost:8080
//!   timeout: 10s
//!   report_http: true
//!
//! report:
//!   results_dir: allure-results
//!
//! checks:
//!   ping:
//!     enabled: true
//!   unknown-route:
//!     enabled: false
//! ```

mod settings;

pub use settings::{CheckConfig, ClientConfig, Config, ConfigError, ReportConfig, ServerConfig};
