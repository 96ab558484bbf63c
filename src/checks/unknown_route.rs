//! Unknown Route Check
//!
//! Calls `GET /ping1`, a path the service does not register, and asserts it
//! answers `404 Not Found`. `/ping1` appears in older smoke tests against
//! this service; the check keeps that path's actual behavior visible.

use async_trait::async_trait;

use super::traits::{Check, CheckContext, CheckError};
use crate::report::matcher::is;

/// Path the service does not serve
pub const UNKNOWN_PATH: &str = "/ping1";

/// Unknown route smoke check
pub struct UnknownRouteCheck;

#[async_trait]
impl Check for UnknownRouteCheck {
    fn name(&self) -> &'static str {
        "unknown-route"
    }

    fn description(&self) -> &'static str {
        "GET /ping1 is not served (404)"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<(), CheckError> {
        let lifecycle = &ctx.lifecycle;

        let response = lifecycle
            .step_async("[GET] /ping1", ctx.client.get(UNKNOWN_PATH))
            .await?;

        lifecycle.check_that(
            "API /ping1 is not a registered route",
            &response.status,
            &is(404u16),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_metadata() {
        let check = UnknownRouteCheck;
        assert_eq!(check.name(), "unknown-route");
        assert!(check.description().contains("/ping1"));
    }
}
