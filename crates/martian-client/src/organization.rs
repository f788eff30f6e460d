//! The organization sub-client.

use std::sync::Arc;

use martian_core::OrganizationBalance;

use crate::error::Result;
use crate::http::Transport;

/// Client for organization-level endpoints.
///
/// Obtained from [`MartianClient::organization`](crate::MartianClient::organization).
#[derive(Clone)]
pub struct OrganizationClient {
    transport: Arc<Transport>,
}

impl OrganizationClient {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// The organization's current credit balance.
    pub async fn credit_balance(&self) -> Result<OrganizationBalance> {
        self.transport.get_json("/credits", &[]).await
    }
}
