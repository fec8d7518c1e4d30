use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use crates::domain::{
    repositories::profiles::ProfileRepository,
    value_objects::{
        activity::{RecordActivityDto, SellerProfile, UsageSummaryDto, month_start},
        enums::activity_kinds::ActivityKind,
    },
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SellerActivityError {
    #[error("seller profile not found")]
    ProfileNotFound,
    #[error("monthly {0} limit reached for current plan")]
    LimitReached(ActivityKind),
    #[error("current plan does not allow editing listings")]
    EditNotAllowed,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SellerActivityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SellerActivityError::ProfileNotFound => StatusCode::NOT_FOUND,
            SellerActivityError::LimitReached(_) | SellerActivityError::EditNotAllowed => {
                StatusCode::FORBIDDEN
            }
            SellerActivityError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SellerActivityError>;

pub struct SellerActivityUseCase<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    profile_repo: Arc<P>,
}

impl<P> SellerActivityUseCase<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    pub fn new(profile_repo: Arc<P>) -> Self {
        Self { profile_repo }
    }

    async fn load_profile(&self, user_id: Uuid) -> UseCaseResult<SellerProfile> {
        let profile = self
            .profile_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "seller_activity: failed to load profile");
                SellerActivityError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "seller_activity: profile not found");
                SellerActivityError::ProfileNotFound
            })?;

        Ok(SellerProfile::from(profile))
    }

    pub async fn usage_summary(&self, user_id: Uuid) -> UseCaseResult<UsageSummaryDto> {
        let profile = self.load_profile(user_id).await?;
        let summary = UsageSummaryDto::build(&profile, Utc::now());

        debug!(
            %user_id,
            plan = %profile.plan,
            posts = summary.counters.posts_this_month,
            "seller_activity: usage summary built"
        );
        Ok(summary)
    }

    /// Counts one post/update/edit against the seller's monthly quota.
    pub async fn record_activity(
        &self,
        user_id: Uuid,
        kind: ActivityKind,
    ) -> UseCaseResult<RecordActivityDto> {
        let now = Utc::now();
        let profile = self.load_profile(user_id).await?;

        if profile.counters.is_stale(now) {
            let rolled = self
                .profile_repo
                .roll_over_counters(user_id, month_start(now), now)
                .await
                .map_err(|err| {
                    error!(%user_id, db_error = ?err, "seller_activity: failed to roll over counters");
                    SellerActivityError::Internal(err)
                })?;
            info!(%user_id, rolled, "seller_activity: monthly counters rolled over");
        }

        if kind == ActivityKind::Edit && !profile.can_user_edit() {
            warn!(
                %user_id,
                plan = %profile.plan,
                status = StatusCode::FORBIDDEN.as_u16(),
                "seller_activity: edit not allowed on plan"
            );
            return Err(SellerActivityError::EditNotAllowed);
        }

        let limit = profile.limit_for(kind);
        let updated = self
            .profile_repo
            .try_increment_activity(user_id, kind, limit)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    kind = %kind,
                    db_error = ?err,
                    "seller_activity: failed to increment counter"
                );
                SellerActivityError::Internal(err)
            })?;

        let Some(updated) = updated else {
            warn!(
                %user_id,
                kind = %kind,
                limit,
                plan = %profile.plan,
                status = StatusCode::FORBIDDEN.as_u16(),
                "seller_activity: monthly limit reached"
            );
            return Err(SellerActivityError::LimitReached(kind));
        };

        let counters = SellerProfile::from(updated).counters;
        info!(
            %user_id,
            kind = %kind,
            count = counters.count(kind),
            "seller_activity: activity recorded"
        );

        Ok(RecordActivityDto { kind, counters })
    }
}
