use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MB: i64 = 1024 * 1024;
const GB: i64 = 1024 * MB;

/// Subscription level determining quota limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
    Unlimited,
}

impl Tier {
    /// Unknown tier strings resolve to `Free`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pro" => Tier::Pro,
            "unlimited" => Tier::Unlimited,
            "free" => Tier::Free,
            other => {
                tracing::warn!("Unknown subscription tier '{}', using free limits", other);
                Tier::Free
            }
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Tier::Free => "Free",
            Tier::Pro => "Pro",
            Tier::Unlimited => "Unlimited",
        }
    }

    pub fn limits(self) -> TierLimits {
        match self {
            Tier::Free => TierLimits {
                uploads: Limit::Finite(5),
                generations: Limit::Finite(15),
                storage_bytes: Limit::Finite(100 * MB),
            },
            Tier::Pro => TierLimits {
                uploads: Limit::Finite(30),
                generations: Limit::Finite(100),
                storage_bytes: Limit::Finite(2 * GB),
            },
            Tier::Unlimited => TierLimits {
                uploads: Limit::Unlimited,
                generations: Limit::Unlimited,
                storage_bytes: Limit::Finite(10 * GB),
            },
        }
    }
}

/// A quota bound or a remaining allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Finite(i64),
    Unlimited,
}

impl Limit {
    /// `max(0, limit - used)`, unlimited stays unlimited
    pub fn remaining(self, used: i64) -> Limit {
        match self {
            Limit::Finite(limit) => Limit::Finite((limit - used).max(0)),
            Limit::Unlimited => Limit::Unlimited,
        }
    }

    /// True when at least `amount` (and at least one unit) is left
    pub fn allows(self, amount: i64) -> bool {
        match self {
            Limit::Finite(left) => left > 0 && left >= amount,
            Limit::Unlimited => true,
        }
    }

    /// `None` encodes unlimited on the wire
    pub fn as_option(self) -> Option<i64> {
        match self {
            Limit::Finite(value) => Some(value),
            Limit::Unlimited => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub uploads: Limit,
    pub generations: Limit,
    pub storage_bytes: Limit,
}

impl TierLimits {
    pub fn for_resource(&self, resource: Resource) -> Limit {
        match resource {
            Resource::Uploads => self.uploads,
            Resource::Generations => self.generations,
            Resource::Storage => self.storage_bytes,
        }
    }
}

/// Metered resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Uploads,
    Generations,
    /// Measured in bytes
    Storage,
}

impl Resource {
    /// Counter column in `user_profiles`
    pub fn column(self) -> &'static str {
        match self {
            Resource::Uploads => "monthly_uploads_used",
            Resource::Generations => "monthly_generations_used",
            Resource::Storage => "storage_used_bytes",
        }
    }
}
