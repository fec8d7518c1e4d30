use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::profiles::ProfileEntity,
    value_objects::{
        enums::{activity_kinds::ActivityKind, profile_roles::ProfileRole},
        plans::{PlanDto, PlanKey, UNLIMITED, remaining, within_limit},
    },
};

/// Per-seller tallies for the calendar month that contains `reset_at` (UTC).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ActivityCounters {
    pub posts_this_month: i32,
    pub updates_this_month: i32,
    pub edits_this_month: i32,
    pub reset_at: DateTime<Utc>,
}

impl ActivityCounters {
    pub fn zeroed(now: DateTime<Utc>) -> Self {
        Self {
            posts_this_month: 0,
            updates_this_month: 0,
            edits_this_month: 0,
            reset_at: now,
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.reset_at < month_start(now)
    }

    pub fn rolled_over(self, now: DateTime<Utc>) -> Self {
        if self.is_stale(now) {
            Self::zeroed(now)
        } else {
            self
        }
    }

    pub fn count(&self, kind: ActivityKind) -> i32 {
        match kind {
            ActivityKind::Post => self.posts_this_month,
            ActivityKind::Update => self.updates_this_month,
            ActivityKind::Edit => self.edits_this_month,
        }
    }
}

/// First instant of the UTC calendar month containing `now`.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellerProfile {
    pub id: Uuid,
    pub role: ProfileRole,
    pub plan: PlanKey,
    pub counters: ActivityCounters,
}

impl From<ProfileEntity> for SellerProfile {
    fn from(value: ProfileEntity) -> Self {
        Self {
            id: value.id,
            role: ProfileRole::from_str(&value.role),
            plan: PlanKey::from_stored(&value.plan_key),
            counters: ActivityCounters {
                posts_this_month: value.posts_this_month,
                updates_this_month: value.updates_this_month,
                edits_this_month: value.edits_this_month,
                reset_at: value.activity_reset_at,
            },
        }
    }
}

impl SellerProfile {
    pub fn is_admin(&self) -> bool {
        self.role == ProfileRole::Admin
    }

    pub fn can_user_post(&self, now: DateTime<Utc>) -> bool {
        let counters = self.counters.rolled_over(now);
        within_limit(counters.posts_this_month, self.plan.definition().post_limit)
    }

    pub fn can_user_update(&self, now: DateTime<Utc>) -> bool {
        let counters = self.counters.rolled_over(now);
        within_limit(
            counters.updates_this_month,
            self.plan.definition().update_limit,
        )
    }

    pub fn can_user_edit(&self) -> bool {
        self.plan.definition().can_edit
    }

    pub fn allows(&self, kind: ActivityKind, now: DateTime<Utc>) -> bool {
        match kind {
            ActivityKind::Post => self.can_user_post(now),
            ActivityKind::Update => self.can_user_update(now),
            ActivityKind::Edit => self.can_user_edit(),
        }
    }

    /// Monthly cap for `kind`; edits are gated by permission only.
    pub fn limit_for(&self, kind: ActivityKind) -> i32 {
        let plan = self.plan.definition();
        match kind {
            ActivityKind::Post => plan.post_limit,
            ActivityKind::Update => plan.update_limit,
            ActivityKind::Edit => UNLIMITED,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UsageSummaryDto {
    pub plan: PlanDto,
    pub counters: ActivityCounters,
    pub remaining_posts: Option<i32>,
    pub remaining_updates: Option<i32>,
    pub can_post: bool,
    pub can_update: bool,
    pub can_edit: bool,
}

impl UsageSummaryDto {
    pub fn build(profile: &SellerProfile, now: DateTime<Utc>) -> Self {
        let plan = profile.plan.definition();
        let counters = profile.counters.rolled_over(now);
        Self {
            plan: PlanDto::from(plan),
            counters,
            remaining_posts: remaining(counters.posts_this_month, plan.post_limit),
            remaining_updates: remaining(counters.updates_this_month, plan.update_limit),
            can_post: profile.can_user_post(now),
            can_update: profile.can_user_update(now),
            can_edit: profile.can_user_edit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecordActivityModel {
    pub kind: ActivityKind,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordActivityDto {
    pub kind: ActivityKind,
    pub counters: ActivityCounters,
}
