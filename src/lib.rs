//! Pingstep - ping service with step-reporting assertions
//!
//! A minimal HTTP service answering `GET /ping` with `pong`, plus the test
//! side that exercises it: matcher assertions recorded as report steps in
//! Allure result files.
//!
//! ## Modules
//!
//! - [`api`] - The ping HTTP service
//! - [`report`] - Report model, lifecycle, matchers and the assertion interceptor
//! - [`client`] - HTTP client for the service, with optional request reporting
//! - [`checks`] - Smoke checks run against a live service
//! - [`config`] - Configuration parsing

pub mod api;
pub mod checks;
pub mod client;
pub mod config;
pub mod report;
