//! Read-only JSON entitlements store
//!
//! ```json
//! {
//!   "default": { "available_tiers": ["S"] },
//!   "users": {
//!     "u-123": { "plan": { "name": "plus" }, "available_tiers": ["S", "M", "L"] }
//!   }
//! }
//! ```
//!
//! `default`, when present, applies to users not listed. Without it an
//! unknown user is an error, which the orchestrator turns into a denial.

use async_trait::async_trait;
use ellen_application::{EntitlementsError, EntitlementsProvider};
use ellen_domain::UserEntitlements;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EntitlementsDocument {
    default: Option<UserEntitlements>,
    users: HashMap<String, UserEntitlements>,
}

#[derive(Debug, Default)]
pub struct FileEntitlementsStore {
    document: EntitlementsDocument,
}

impl FileEntitlementsStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EntitlementsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EntitlementsError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_json(&text)
            .map_err(|e| EntitlementsError::Unavailable(format!("{}: {}", path.display(), e)))?;
        debug!(
            path = %path.display(),
            users = store.document.users.len(),
            "Loaded entitlements store"
        );
        Ok(store)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            document: serde_json::from_str(text)?,
        })
    }

    pub fn user_count(&self) -> usize {
        self.document.users.len()
    }
}

#[async_trait]
impl EntitlementsProvider for FileEntitlementsStore {
    async fn get_user_entitlements(
        &self,
        user_id: &str,
    ) -> Result<UserEntitlements, EntitlementsError> {
        let found = self
            .document
            .users
            .get(user_id)
            .or(self.document.default.as_ref())
            .cloned()
            .ok_or_else(|| EntitlementsError::NotFound(user_id.to_string()))?;
        Ok(UserEntitlements {
            user_id: Some(user_id.to_string()),
            ..found
        })
    }
}
