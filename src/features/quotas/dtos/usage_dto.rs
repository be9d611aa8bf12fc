use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::quotas::models::Tier;

/// One figure per metered resource; `null` means unlimited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsageFiguresDto {
    pub uploads: Option<i64>,
    pub generations: Option<i64>,
    pub storage_bytes: Option<i64>,
}

/// Quota snapshot for the current month
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsageResponseDto {
    pub tier: Tier,
    #[schema(example = "Free")]
    pub tier_name: String,
    pub limits: UsageFiguresDto,
    pub used: UsageFiguresDto,
    pub remaining: UsageFiguresDto,
    pub can_upload: bool,
    pub can_generate: bool,
}
