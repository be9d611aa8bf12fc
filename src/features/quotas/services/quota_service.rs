use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::quotas::dtos::{UsageFiguresDto, UsageResponseDto};
use crate::features::quotas::models::{Limit, QuotaCounters, Resource};
use crate::features::quotas::repositories::QuotaRepository;

/// Reads counters against tier limits and records consumption.
///
/// The ledger never deduplicates: callers guarantee a single `consume`
/// per billable event.
pub struct QuotaService {
    repository: Arc<dyn QuotaRepository>,
}

impl QuotaService {
    pub fn new(repository: Arc<dyn QuotaRepository>) -> Self {
        Self { repository }
    }

    pub async fn counters(&self, user_id: Uuid) -> Result<QuotaCounters> {
        self.repository.get_or_create(user_id).await
    }

    pub async fn can_consume(&self, user_id: Uuid, resource: Resource, amount: i64) -> Result<bool> {
        Ok(self.counters(user_id).await?.can_consume(resource, amount))
    }

    pub async fn remaining(&self, user_id: Uuid, resource: Resource) -> Result<Limit> {
        Ok(self.counters(user_id).await?.remaining(resource))
    }

    pub async fn consume(&self, user_id: Uuid, resource: Resource, amount: i64) -> Result<()> {
        self.repository.increment(user_id, resource, amount).await
    }

    /// Admission check: fails with `QuotaExceeded` when the allowance is spent
    pub async fn ensure_can_consume(
        &self,
        user_id: Uuid,
        resource: Resource,
        amount: i64,
    ) -> Result<()> {
        let counters = self.counters(user_id).await?;
        let admitted = counters.ensure_can_consume(resource, amount);
        if admitted.is_err() {
            tracing::info!(
                user_id = %user_id,
                resource = ?resource,
                used = counters.used(resource),
                "Quota exceeded"
            );
        }
        admitted
    }

    pub async fn usage(&self, user_id: Uuid) -> Result<UsageResponseDto> {
        let counters = self.counters(user_id).await?;
        let tier = counters.tier();
        let limits = tier.limits();

        let figures = |f: &dyn Fn(Resource) -> Option<i64>| UsageFiguresDto {
            uploads: f(Resource::Uploads),
            generations: f(Resource::Generations),
            storage_bytes: f(Resource::Storage),
        };

        Ok(UsageResponseDto {
            tier,
            tier_name: tier.display_name().to_string(),
            limits: figures(&|r| limits.for_resource(r).as_option()),
            used: figures(&|r| Some(counters.used(r))),
            remaining: figures(&|r| counters.remaining(r).as_option()),
            can_upload: counters.can_consume(Resource::Uploads, 1)
                && counters.can_consume(Resource::Storage, 1),
            can_generate: counters.can_consume(Resource::Generations, 1),
        })
    }
}
