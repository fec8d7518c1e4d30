use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Limit value meaning "no cap".
pub const UNLIMITED: i32 = -1;

pub const PLAN_CURRENCY: &str = "USD";

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanKey {
    #[default]
    Free,
    Basic,
    Premium,
    Business,
}

impl PlanKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKey::Free => "free",
            PlanKey::Basic => "basic",
            PlanKey::Premium => "premium",
            PlanKey::Business => "business",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => Some(PlanKey::Free),
            "basic" => Some(PlanKey::Basic),
            "premium" => Some(PlanKey::Premium),
            "business" => Some(PlanKey::Business),
            _ => None,
        }
    }

    /// Stored keys come from a shared table; unknown values degrade to the free tier.
    pub fn from_stored(value: &str) -> Self {
        Self::from_str(value).unwrap_or_default()
    }

    pub fn definition(&self) -> &'static PlanDefinition {
        match self {
            PlanKey::Free => &PLAN_CATALOG[0],
            PlanKey::Basic => &PLAN_CATALOG[1],
            PlanKey::Premium => &PLAN_CATALOG[2],
            PlanKey::Business => &PLAN_CATALOG[3],
        }
    }
}

impl Display for PlanKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entitlements of one tier. Limits are per calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDefinition {
    pub key: PlanKey,
    pub name: &'static str,
    pub monthly_price_minor: i32,
    pub post_limit: i32,
    pub update_limit: i32,
    pub can_edit: bool,
}

/// Ordered by price.
pub static PLAN_CATALOG: [PlanDefinition; 4] = [
    PlanDefinition {
        key: PlanKey::Free,
        name: "Free",
        monthly_price_minor: 0,
        post_limit: 5,
        update_limit: 3,
        can_edit: false,
    },
    PlanDefinition {
        key: PlanKey::Basic,
        name: "Basic",
        monthly_price_minor: 500,
        post_limit: 30,
        update_limit: 20,
        can_edit: true,
    },
    PlanDefinition {
        key: PlanKey::Premium,
        name: "Premium",
        monthly_price_minor: 1500,
        post_limit: 100,
        update_limit: 60,
        can_edit: true,
    },
    PlanDefinition {
        key: PlanKey::Business,
        name: "Business",
        monthly_price_minor: 3000,
        post_limit: UNLIMITED,
        update_limit: UNLIMITED,
        can_edit: true,
    },
];

/// `used < limit`, with `UNLIMITED` always allowing.
pub fn within_limit(used: i32, limit: i32) -> bool {
    limit == UNLIMITED || used < limit
}

/// `None` when the limit is unlimited.
pub fn remaining(used: i32, limit: i32) -> Option<i32> {
    if limit == UNLIMITED {
        None
    } else {
        Some((limit - used).max(0))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanDto {
    pub key: PlanKey,
    pub name: String,
    pub monthly_price_minor: i32,
    pub currency: String,
    pub post_limit: i32,
    pub update_limit: i32,
    pub can_edit: bool,
}

impl From<&PlanDefinition> for PlanDto {
    fn from(value: &PlanDefinition) -> Self {
        Self {
            key: value.key,
            name: value.name.to_string(),
            monthly_price_minor: value.monthly_price_minor,
            currency: PLAN_CURRENCY.to_string(),
            post_limit: value.post_limit,
            update_limit: value.update_limit,
            can_edit: value.can_edit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_matches_its_key() {
        for key in [PlanKey::Free, PlanKey::Basic, PlanKey::Premium, PlanKey::Business] {
            assert_eq!(key.definition().key, key);
        }
    }

    #[test]
    fn catalog_is_sorted_by_price() {
        let prices: Vec<i32> = PLAN_CATALOG.iter().map(|p| p.monthly_price_minor).collect();
        let mut sorted = prices.clone();
        sorted.sort();
        assert_eq!(prices, sorted);
    }

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!(PlanKey::from_str(" Premium "), Some(PlanKey::Premium));
        assert_eq!(PlanKey::from_str("gold"), None);
        assert_eq!(PlanKey::from_stored("gold"), PlanKey::Free);
    }

    #[test]
    fn unlimited_never_runs_out() {
        assert!(within_limit(10_000, UNLIMITED));
        assert_eq!(remaining(10_000, UNLIMITED), None);
    }

    #[test]
    fn limit_is_exclusive() {
        assert!(within_limit(4, 5));
        assert!(!within_limit(5, 5));
        assert_eq!(remaining(7, 5), Some(0));
    }
}
