use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use crates::domain::{
    repositories::profiles::ProfileRepository, value_objects::activity::month_start,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum MonthlyResetError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MonthlyResetError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MonthlyResetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyResetSummary {
    pub stale: i64,
    pub reset: usize,
    pub dry_run: bool,
}

pub struct MonthlyResetUseCase<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    profile_repo: Arc<P>,
}

impl<P> MonthlyResetUseCase<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    pub fn new(profile_repo: Arc<P>) -> Self {
        Self { profile_repo }
    }

    /// Zeroes the counters of every profile last reset before `now`'s month.
    pub async fn reset_stale_counters(
        &self,
        now: DateTime<Utc>,
        dry_run: bool,
    ) -> Result<MonthlyResetSummary, MonthlyResetError> {
        let cutoff = month_start(now);

        let stale = self
            .profile_repo
            .count_stale_profiles(cutoff)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "monthly_reset: failed to count stale profiles");
                MonthlyResetError::Internal(err)
            })?;

        if dry_run || stale == 0 {
            info!(stale, dry_run, %cutoff, "monthly_reset: nothing reset");
            return Ok(MonthlyResetSummary {
                stale,
                reset: 0,
                dry_run,
            });
        }

        let reset = self
            .profile_repo
            .reset_stale_profiles(cutoff, now)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "monthly_reset: failed to reset stale profiles");
                MonthlyResetError::Internal(err)
            })?;

        info!(stale, reset, %cutoff, "monthly_reset: counters reset");
        Ok(MonthlyResetSummary {
            stale,
            reset,
            dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crates::domain::repositories::profiles::MockProfileRepository;
    use mockall::predicate::eq;

    fn mid_march() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 17, 9, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn dry_run_only_counts() {
        let mut repo = MockProfileRepository::new();
        repo.expect_count_stale_profiles()
            .with(eq(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()))
            .returning(|_| Box::pin(async { Ok(7) }));
        repo.expect_reset_stale_profiles().never();

        let summary = MonthlyResetUseCase::new(Arc::new(repo))
            .reset_stale_counters(mid_march(), true)
            .await
            .unwrap();

        assert_eq!(
            summary,
            MonthlyResetSummary {
                stale: 7,
                reset: 0,
                dry_run: true
            }
        );
    }

    #[tokio::test]
    async fn resets_stale_profiles_from_month_start() {
        let now = mid_march();
        let mut repo = MockProfileRepository::new();
        repo.expect_count_stale_profiles()
            .returning(|_| Box::pin(async { Ok(2) }));
        repo.expect_reset_stale_profiles()
            .with(eq(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()), eq(now))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(2) }));

        let summary = MonthlyResetUseCase::new(Arc::new(repo))
            .reset_stale_counters(now, false)
            .await
            .unwrap();

        assert_eq!(summary.reset, 2);
        assert!(!summary.dry_run);
    }

    #[tokio::test]
    async fn repository_failure_is_internal() {
        let mut repo = MockProfileRepository::new();
        repo.expect_count_stale_profiles()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("connection refused")) }));

        let err = MonthlyResetUseCase::new(Arc::new(repo))
            .reset_stale_counters(mid_march(), false)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
