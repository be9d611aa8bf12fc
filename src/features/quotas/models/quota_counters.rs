use sqlx::FromRow;
use uuid::Uuid;

use super::{Limit, Resource, Tier};
use crate::core::error::{AppError, Result};

/// Per-user monthly counters from `user_profiles`
#[derive(Debug, Clone, FromRow)]
pub struct QuotaCounters {
    #[sqlx(rename = "id")]
    pub user_id: Uuid,
    pub subscription_tier: String,
    pub monthly_uploads_used: i64,
    pub monthly_generations_used: i64,
    pub storage_used_bytes: i64,
}

impl QuotaCounters {
    /// Fresh counters for a user without a profile row yet
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            subscription_tier: "free".to_string(),
            monthly_uploads_used: 0,
            monthly_generations_used: 0,
            storage_used_bytes: 0,
        }
    }

    pub fn tier(&self) -> Tier {
        Tier::parse(&self.subscription_tier)
    }

    pub fn used(&self, resource: Resource) -> i64 {
        match resource {
            Resource::Uploads => self.monthly_uploads_used,
            Resource::Generations => self.monthly_generations_used,
            Resource::Storage => self.storage_used_bytes,
        }
    }

    pub fn limit(&self, resource: Resource) -> Limit {
        self.tier().limits().for_resource(resource)
    }

    pub fn remaining(&self, resource: Resource) -> Limit {
        self.limit(resource).remaining(self.used(resource))
    }

    pub fn can_consume(&self, resource: Resource, amount: i64) -> bool {
        self.remaining(resource).allows(amount)
    }

    /// `QuotaExceeded` naming the spent allowance and the tier
    pub fn ensure_can_consume(&self, resource: Resource, amount: i64) -> Result<()> {
        if self.can_consume(resource, amount) {
            return Ok(());
        }

        let message = match resource {
            Resource::Uploads => "Monthly upload limit reached",
            Resource::Generations => "Monthly generation limit reached",
            Resource::Storage => "Storage limit reached",
        };
        Err(AppError::QuotaExceeded(format!(
            "{} for the {} tier",
            message,
            self.tier().display_name()
        )))
    }
}
