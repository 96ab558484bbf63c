//! Check registry
//!
//! Central registry of all available checks. New checks should be registered here.
//! Checks run in registration order.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::traits::{Check, CheckError};
use super::{PingCheck, UnknownRouteCheck};
use crate::config::Config;

/// Global registry of all available checks
pub static CHECKS: Lazy<IndexMap<&'static str, Arc<dyn Check>>> = Lazy::new(|| {
    let mut m: IndexMap<&'static str, Arc<dyn Check>> = IndexMap::new();

    m.insert("ping", Arc::new(PingCheck));
    m.insert("unknown-route", Arc::new(UnknownRouteCheck));

    m
});

/// Get a check by name
pub fn get_check(name: &str) -> Option<Arc<dyn Check>> {
    CHECKS.get(name).cloned()
}

/// List all available check names
pub fn list_checks() -> Vec<&'static str> {
    let mut names: Vec<_> = CHECKS.keys().copied().collect();
    names.sort();
    names
}

/// Resolve a comma-separated list of check names, keeping the given order
pub fn parse_check_list(list: &str) -> Result<Vec<Arc<dyn Check>>, CheckError> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| get_check(name).ok_or_else(|| CheckError::UnknownCheck(name.to_string())))
        .collect()
}

/// Checks enabled by `config`, in registration order
pub fn enabled_checks(config: &Config) -> Vec<Arc<dyn Check>> {
    CHECKS
        .iter()
        .filter(|(name, _)| config.is_check_enabled(name))
        .map(|(_, check)| check.clone())
        .collect()
}
