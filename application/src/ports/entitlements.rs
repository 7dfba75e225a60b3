//! Entitlements provider port
//!
//! Billing and plan storage live outside this system. The orchestrator only
//! needs to read a user's entitlements when a request arrives without them.

use async_trait::async_trait;
use ellen_domain::UserEntitlements;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntitlementsError {
    #[error("No entitlements found for user {0}")]
    NotFound(String),

    #[error("Entitlements store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait EntitlementsProvider: Send + Sync {
    async fn get_user_entitlements(
        &self,
        user_id: &str,
    ) -> Result<UserEntitlements, EntitlementsError>;
}
