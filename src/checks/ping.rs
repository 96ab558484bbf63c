//! Ping Check
//!
//! Calls `GET /ping` and asserts the body is exactly `pong`.
//!
//! ## Report layout
//!
//! - step `[GET] /ping` (with request/response attachments when enabled)
//! - step `API /ping returned correct data` (matcher assertion)

use async_trait::async_trait;
use tracing::info;

use super::traits::{Check, CheckContext, CheckError};
use crate::api::PING_RESPONSE;
use crate::report::matcher::is;

/// Reason used for the body assertion
pub const PING_REASON: &str = "API /ping returned correct data";

/// Ping smoke check
pub struct PingCheck;

#[async_trait]
impl Check for PingCheck {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn description(&self) -> &'static str {
        "GET /ping returns pong"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<(), CheckError> {
        let lifecycle = &ctx.lifecycle;

        let body = lifecycle
            .step_async("[GET] /ping", ctx.client.ping())
            .await?;
        info!(body = %body, "Ping answered");

        lifecycle.check_that(PING_REASON, &body, &is(PING_RESPONSE))?;
        Ok(())
    }
}
