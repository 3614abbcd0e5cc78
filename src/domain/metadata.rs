//! Audit Metadata
//!
//! Created/updated/deleted bookkeeping owned by the persistence adapter,
//! stored next to an aggregate rather than inside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Clock;

/// Audit record stored alongside an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditMetadata {
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,

    #[serde(default)]
    pub is_deleted: bool,
}

impl AuditMetadata {
    /// Metadata for a record created now
    pub fn created(actor: Option<String>, clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            created_at: now,
            created_by: actor.clone(),
            updated_at: now,
            updated_by: actor,
            deleted_at: None,
            deleted_by: None,
            is_deleted: false,
        }
    }

    /// Record a modification
    pub fn touch(&mut self, actor: Option<String>, clock: &impl Clock) {
        self.updated_at = clock.now();
        self.updated_by = actor;
    }

    /// Soft delete. Repeated calls keep the first deletion stamp.
    pub fn mark_deleted(&mut self, actor: Option<String>, clock: &impl Clock) {
        if self.is_deleted {
            return;
        }
        let now = clock.now();
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.deleted_by = actor.clone();
        self.updated_at = now;
        self.updated_by = actor;
    }
}
