mod quota_counters;
mod tier;

pub use quota_counters::QuotaCounters;
pub use tier::{Limit, Resource, Tier, TierLimits};
