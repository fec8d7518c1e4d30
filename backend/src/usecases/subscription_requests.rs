use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use crates::domain::{
    entities::{
        profiles::ApplyPlanChangeset,
        subscription_requests::{
            InsertSubscriptionRequestEntity, ReviewSubscriptionRequestEntity,
        },
    },
    repositories::{
        admin_alerts::AdminAlertGateway, notifications::NotificationRepository,
        profiles::ProfileRepository, subscription_requests::SubscriptionRequestRepository,
    },
    value_objects::{
        activity::SellerProfile,
        enums::subscription_request_statuses::SubscriptionRequestStatus,
        notifications::plan_decision_notification,
        plans::PlanKey,
        subscription_requests::{
            MAX_MESSAGE_CHARS, MAX_REFERENCE_CHARS, SubmitSubscriptionRequestModel,
            SubscriptionRequestDto, normalize_optional_text,
        },
    },
};
use crates::infra::db::postgres::errors::is_unique_violation;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SubscriptionRequestError {
    #[error("profile not found")]
    ProfileNotFound,
    #[error("unknown plan: {0}")]
    InvalidPlan(String),
    #[error("amount must not be negative")]
    InvalidAmount,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("already subscribed to the requested plan")]
    AlreadyOnPlan,
    #[error("a pending request already exists")]
    PendingRequestExists,
    #[error("subscription request not found")]
    RequestNotFound,
    #[error("subscription request was already reviewed")]
    AlreadyReviewed,
    #[error("admin role required")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionRequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionRequestError::ProfileNotFound
            | SubscriptionRequestError::RequestNotFound => StatusCode::NOT_FOUND,
            SubscriptionRequestError::InvalidPlan(_)
            | SubscriptionRequestError::InvalidAmount
            | SubscriptionRequestError::InvalidInput(_)
            | SubscriptionRequestError::AlreadyOnPlan => StatusCode::BAD_REQUEST,
            SubscriptionRequestError::PendingRequestExists
            | SubscriptionRequestError::AlreadyReviewed => StatusCode::CONFLICT,
            SubscriptionRequestError::Forbidden => StatusCode::FORBIDDEN,
            SubscriptionRequestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionRequestError>;

/// Manual-payment plan changes: sellers submit, admins approve or reject.
pub struct SubscriptionRequestUseCase<R, P, N>
where
    R: SubscriptionRequestRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
{
    request_repo: Arc<R>,
    profile_repo: Arc<P>,
    notification_repo: Arc<N>,
    admin_alerts: Arc<dyn AdminAlertGateway + Send + Sync>,
}

impl<R, P, N> SubscriptionRequestUseCase<R, P, N>
where
    R: SubscriptionRequestRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
{
    pub fn new(
        request_repo: Arc<R>,
        profile_repo: Arc<P>,
        notification_repo: Arc<N>,
        admin_alerts: Arc<dyn AdminAlertGateway + Send + Sync>,
    ) -> Self {
        Self {
            request_repo,
            profile_repo,
            notification_repo,
            admin_alerts,
        }
    }

    async fn load_profile(&self, user_id: Uuid) -> UseCaseResult<SellerProfile> {
        let profile = self
            .profile_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscription_requests: failed to load profile");
                SubscriptionRequestError::Internal(err)
            })?
            .ok_or(SubscriptionRequestError::ProfileNotFound)?;

        Ok(SellerProfile::from(profile))
    }

    async fn ensure_admin(&self, user_id: Uuid) -> UseCaseResult<()> {
        let profile = match self.load_profile(user_id).await {
            Ok(profile) => profile,
            Err(SubscriptionRequestError::ProfileNotFound) => {
                return Err(SubscriptionRequestError::Forbidden);
            }
            Err(err) => return Err(err),
        };

        if !profile.is_admin() {
            warn!(
                %user_id,
                status = StatusCode::FORBIDDEN.as_u16(),
                "subscription_requests: non-admin attempted admin action"
            );
            return Err(SubscriptionRequestError::Forbidden);
        }
        Ok(())
    }

    pub async fn submit_request(
        &self,
        user_id: Uuid,
        model: SubmitSubscriptionRequestModel,
    ) -> UseCaseResult<SubscriptionRequestDto> {
        info!(
            %user_id,
            requested_plan = %model.requested_plan,
            amount_minor = model.amount_minor,
            "subscription_requests: submit requested"
        );

        let requested_plan = PlanKey::from_str(&model.requested_plan)
            .ok_or_else(|| SubscriptionRequestError::InvalidPlan(model.requested_plan.clone()))?;

        if model.amount_minor < 0 {
            return Err(SubscriptionRequestError::InvalidAmount);
        }

        let payment_reference = normalize_optional_text(model.payment_reference);
        let payment_phone = normalize_optional_text(model.payment_phone);
        let message = normalize_optional_text(model.message);

        check_length("payment_reference", &payment_reference, MAX_REFERENCE_CHARS)?;
        check_length("payment_phone", &payment_phone, MAX_REFERENCE_CHARS)?;
        check_length("message", &message, MAX_MESSAGE_CHARS)?;

        let profile = self.load_profile(user_id).await?;
        if profile.plan == requested_plan {
            return Err(SubscriptionRequestError::AlreadyOnPlan);
        }

        let pending = self
            .request_repo
            .find_pending_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscription_requests: failed to check pending");
                SubscriptionRequestError::Internal(err)
            })?;
        if let Some(pending) = pending {
            warn!(
                %user_id,
                pending_request_id = %pending.id,
                status = StatusCode::CONFLICT.as_u16(),
                "subscription_requests: pending request already exists"
            );
            return Err(SubscriptionRequestError::PendingRequestExists);
        }

        let expected_price = requested_plan.definition().monthly_price_minor;
        if model.amount_minor != expected_price {
            warn!(
                %user_id,
                requested_plan = %requested_plan,
                amount_minor = model.amount_minor,
                expected_price,
                "subscription_requests: claimed amount differs from plan price"
            );
        }

        let insert_entity = InsertSubscriptionRequestEntity {
            user_id,
            requested_plan: requested_plan.to_string(),
            amount_minor: model.amount_minor,
            payment_reference,
            payment_phone,
            message,
            status: SubscriptionRequestStatus::Pending.to_string(),
        };

        let created = self
            .request_repo
            .insert(insert_entity)
            .await
            .map_err(|err| {
                // Two concurrent submits race past the pending check; the partial index settles it.
                if is_unique_violation(&err) {
                    return SubscriptionRequestError::PendingRequestExists;
                }
                error!(%user_id, db_error = ?err, "subscription_requests: failed to insert request");
                SubscriptionRequestError::Internal(err)
            })?;

        info!(
            %user_id,
            request_id = %created.id,
            "subscription_requests: request created"
        );

        if let Err(err) = self
            .admin_alerts
            .new_subscription_request(created.clone())
            .await
        {
            warn!(
                request_id = %created.id,
                error = %err,
                "subscription_requests: admin alert failed"
            );
        }

        Ok(SubscriptionRequestDto::from(created))
    }

    pub async fn list_requests(
        &self,
        admin_id: Uuid,
        status: Option<String>,
    ) -> UseCaseResult<Vec<SubscriptionRequestDto>> {
        self.ensure_admin(admin_id).await?;

        let status = match status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(SubscriptionRequestStatus::from_str(raw).ok_or_else(|| {
                SubscriptionRequestError::InvalidInput(format!("unknown status: {raw}"))
            })?),
            None => None,
        };

        let requests = self.request_repo.list(status).await.map_err(|err| {
            error!(db_error = ?err, "subscription_requests: failed to list requests");
            SubscriptionRequestError::Internal(err)
        })?;

        info!(
            %admin_id,
            count = requests.len(),
            "subscription_requests: requests listed"
        );
        Ok(requests.into_iter().map(SubscriptionRequestDto::from).collect())
    }

    pub async fn list_my_requests(
        &self,
        user_id: Uuid,
    ) -> UseCaseResult<Vec<SubscriptionRequestDto>> {
        let requests = self
            .request_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscription_requests: failed to list own requests");
                SubscriptionRequestError::Internal(err)
            })?;

        Ok(requests.into_iter().map(SubscriptionRequestDto::from).collect())
    }

    pub async fn review_request(
        &self,
        request_id: Uuid,
        admin_id: Uuid,
        approve: bool,
        note: Option<String>,
    ) -> UseCaseResult<SubscriptionRequestDto> {
        info!(
            %request_id,
            %admin_id,
            approve,
            "subscription_requests: review requested"
        );

        self.ensure_admin(admin_id).await?;

        let note = normalize_optional_text(note);
        check_length("note", &note, MAX_MESSAGE_CHARS)?;

        let request = self
            .request_repo
            .find_by_id(request_id)
            .await
            .map_err(|err| {
                error!(%request_id, db_error = ?err, "subscription_requests: failed to load request");
                SubscriptionRequestError::Internal(err)
            })?
            .ok_or(SubscriptionRequestError::RequestNotFound)?;

        let current_status = SubscriptionRequestStatus::from_str(&request.status)
            .unwrap_or(SubscriptionRequestStatus::Rejected);
        if current_status.is_terminal() {
            warn!(
                %request_id,
                status = StatusCode::CONFLICT.as_u16(),
                current_status = %current_status,
                "subscription_requests: request already reviewed"
            );
            return Err(SubscriptionRequestError::AlreadyReviewed);
        }

        let requested_plan = PlanKey::from_str(&request.requested_plan).ok_or_else(|| {
            SubscriptionRequestError::Internal(anyhow::anyhow!(
                "stored request {} has unknown plan {}",
                request_id,
                request.requested_plan
            ))
        })?;

        let now = Utc::now();
        let review = ReviewSubscriptionRequestEntity {
            status: SubscriptionRequestStatus::from_decision(approve).to_string(),
            reviewed_by: Some(admin_id),
            reviewed_at: Some(now),
            admin_note: note.clone(),
            updated_at: now,
        };
        let plan_change = approve.then(|| ApplyPlanChangeset::new(requested_plan.to_string(), now));

        let reviewed = self
            .request_repo
            .apply_review(request_id, review, plan_change)
            .await
            .map_err(|err| {
                error!(%request_id, db_error = ?err, "subscription_requests: failed to apply review");
                SubscriptionRequestError::Internal(err)
            })?
            // Lost a race with another reviewer between the read and the guarded write.
            .ok_or(SubscriptionRequestError::AlreadyReviewed)?;

        info!(
            %request_id,
            user_id = %reviewed.user_id,
            status = %reviewed.status,
            "subscription_requests: request reviewed"
        );

        let notification =
            plan_decision_notification(reviewed.user_id, requested_plan, approve, note.as_deref());
        if let Err(err) = self.notification_repo.insert(notification).await {
            warn!(
                %request_id,
                db_error = ?err,
                "subscription_requests: failed to write seller notification"
            );
        }

        Ok(SubscriptionRequestDto::from(reviewed))
    }
}

fn check_length(field: &str, value: &Option<String>, max_chars: usize) -> UseCaseResult<()> {
    match value {
        Some(v) if v.chars().count() > max_chars => Err(SubscriptionRequestError::InvalidInput(
            format!("{field} must be at most {max_chars} characters"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use crates::domain::{
        entities::{profiles::ProfileEntity, subscription_requests::SubscriptionRequestEntity},
        repositories::{
            admin_alerts::MockAdminAlertGateway, notifications::MockNotificationRepository,
            profiles::MockProfileRepository,
            subscription_requests::MockSubscriptionRequestRepository,
        },
    };
    use mockall::predicate::eq;

    fn sample_profile(id: Uuid, role: &str, plan_key: &str) -> ProfileEntity {
        let now = Utc::now();
        ProfileEntity {
            id,
            display_name: None,
            role: role.to_string(),
            plan_key: plan_key.to_string(),
            posts_this_month: 4,
            updates_this_month: 2,
            edits_this_month: 0,
            activity_reset_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_request(user_id: Uuid, plan: &str, status: &str) -> SubscriptionRequestEntity {
        let now = Utc::now();
        SubscriptionRequestEntity {
            id: Uuid::new_v4(),
            user_id,
            requested_plan: plan.to_string(),
            amount_minor: 500,
            payment_reference: Some("EVC-123".to_string()),
            payment_phone: None,
            message: None,
            status: status.to_string(),
            reviewed_by: None,
            reviewed_at: None,
            admin_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn submit_model(plan: &str, amount_minor: i32) -> SubmitSubscriptionRequestModel {
        SubmitSubscriptionRequestModel {
            requested_plan: plan.to_string(),
            amount_minor,
            payment_reference: Some("  EVC-123 ".to_string()),
            payment_phone: Some("   ".to_string()),
            message: None,
        }
    }

    fn expect_profile(repo: &mut MockProfileRepository, profile: ProfileEntity) {
        repo.expect_find_by_id()
            .with(eq(profile.id))
            .returning(move |_| {
                let profile = profile.clone();
                Box::pin(async move { Ok(Some(profile)) })
            });
    }

    fn usecase(
        request_repo: MockSubscriptionRequestRepository,
        profile_repo: MockProfileRepository,
        notification_repo: MockNotificationRepository,
        alerts: MockAdminAlertGateway,
    ) -> SubscriptionRequestUseCase<
        MockSubscriptionRequestRepository,
        MockProfileRepository,
        MockNotificationRepository,
    > {
        SubscriptionRequestUseCase::new(
            Arc::new(request_repo),
            Arc::new(profile_repo),
            Arc::new(notification_repo),
            Arc::new(alerts),
        )
    }

    #[tokio::test]
    async fn submit_creates_pending_request_and_alerts_admins() {
        let user_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();
        let mut alerts = MockAdminAlertGateway::new();

        expect_profile(&mut profile_repo, sample_profile(user_id, "seller", "free"));
        request_repo
            .expect_find_pending_by_user()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(None) }));
        request_repo
            .expect_insert()
            .withf(move |insert| {
                insert.user_id == user_id
                    && insert.requested_plan == "basic"
                    && insert.status == "pending"
                    && insert.payment_reference.as_deref() == Some("EVC-123")
                    && insert.payment_phone.is_none()
            })
            .times(1)
            .returning(move |insert| {
                let mut created = sample_request(insert.user_id, &insert.requested_plan, "pending");
                created.payment_reference = insert.payment_reference;
                Box::pin(async move { Ok(created) })
            });
        alerts
            .expect_new_subscription_request()
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let dto = usecase(
            request_repo,
            profile_repo,
            MockNotificationRepository::new(),
            alerts,
        )
        .submit_request(user_id, submit_model("basic", 500))
        .await
        .unwrap();

        assert_eq!(dto.status, SubscriptionRequestStatus::Pending);
        assert_eq!(dto.requested_plan, PlanKey::Basic);
    }

    #[tokio::test]
    async fn failed_admin_alert_does_not_fail_submit() {
        let user_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();
        let mut alerts = MockAdminAlertGateway::new();

        expect_profile(&mut profile_repo, sample_profile(user_id, "seller", "free"));
        request_repo
            .expect_find_pending_by_user()
            .returning(|_| Box::pin(async { Ok(None) }));
        request_repo.expect_insert().returning(move |insert| {
            let created = sample_request(insert.user_id, &insert.requested_plan, "pending");
            Box::pin(async move { Ok(created) })
        });
        alerts
            .expect_new_subscription_request()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("webhook down")) }));

        let result = usecase(
            request_repo,
            profile_repo,
            MockNotificationRepository::new(),
            alerts,
        )
        .submit_request(user_id, submit_model("premium", 1500))
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn submit_rejects_unknown_plan_and_negative_amount() {
        let user_id = Uuid::new_v4();
        let uc = usecase(
            MockSubscriptionRequestRepository::new(),
            MockProfileRepository::new(),
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        );

        let err = uc
            .submit_request(user_id, submit_model("gold", 500))
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionRequestError::InvalidPlan(_)));

        let err = uc
            .submit_request(user_id, submit_model("basic", -1))
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionRequestError::InvalidAmount));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submit_rejects_overlong_message() {
        let mut model = submit_model("basic", 500);
        model.message = Some("m".repeat(MAX_MESSAGE_CHARS + 1));

        let err = usecase(
            MockSubscriptionRequestRepository::new(),
            MockProfileRepository::new(),
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        )
        .submit_request(Uuid::new_v4(), model)
        .await
        .unwrap_err();

        assert!(matches!(err, SubscriptionRequestError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn submit_for_current_plan_is_rejected() {
        let user_id = Uuid::new_v4();
        let mut profile_repo = MockProfileRepository::new();
        expect_profile(&mut profile_repo, sample_profile(user_id, "seller", "basic"));

        let err = usecase(
            MockSubscriptionRequestRepository::new(),
            profile_repo,
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        )
        .submit_request(user_id, submit_model("basic", 500))
        .await
        .unwrap_err();

        assert!(matches!(err, SubscriptionRequestError::AlreadyOnPlan));
    }

    #[tokio::test]
    async fn second_pending_request_conflicts() {
        let user_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();

        expect_profile(&mut profile_repo, sample_profile(user_id, "seller", "free"));
        let pending = sample_request(user_id, "premium", "pending");
        request_repo
            .expect_find_pending_by_user()
            .returning(move |_| {
                let pending = pending.clone();
                Box::pin(async move { Ok(Some(pending)) })
            });
        request_repo.expect_insert().never();

        let err = usecase(
            request_repo,
            profile_repo,
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        )
        .submit_request(user_id, submit_model("basic", 500))
        .await
        .unwrap_err();

        assert!(matches!(err, SubscriptionRequestError::PendingRequestExists));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn approval_applies_plan_with_zeroed_counters() {
        let admin_id = Uuid::new_v4();
        let seller_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();
        let mut notification_repo = MockNotificationRepository::new();

        expect_profile(&mut profile_repo, sample_profile(admin_id, "admin", "free"));

        let pending = sample_request(seller_id, "premium", "pending");
        let request_id = pending.id;
        request_repo
            .expect_find_by_id()
            .with(eq(request_id))
            .returning(move |_| {
                let pending = pending.clone();
                Box::pin(async move { Ok(Some(pending)) })
            });
        request_repo
            .expect_apply_review()
            .withf(move |id, review, plan_change| {
                let Some(change) = plan_change else {
                    return false;
                };
                *id == request_id
                    && review.status == "approved"
                    && review.reviewed_by == Some(admin_id)
                    && review.reviewed_at == Some(change.activity_reset_at)
                    && change.plan_key == "premium"
                    && change.posts_this_month == 0
                    && change.updates_this_month == 0
                    && change.edits_this_month == 0
            })
            .times(1)
            .returning(move |_, review, _| {
                let mut reviewed = sample_request(seller_id, "premium", &review.status);
                reviewed.id = request_id;
                reviewed.reviewed_by = review.reviewed_by;
                reviewed.reviewed_at = review.reviewed_at;
                Box::pin(async move { Ok(Some(reviewed)) })
            });
        notification_repo
            .expect_insert()
            .withf(move |insert| insert.user_id == seller_id && insert.kind == "plan_approved")
            .times(1)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let dto = usecase(
            request_repo,
            profile_repo,
            notification_repo,
            MockAdminAlertGateway::new(),
        )
        .review_request(request_id, admin_id, true, None)
        .await
        .unwrap();

        assert_eq!(dto.status, SubscriptionRequestStatus::Approved);
        assert_eq!(dto.reviewed_by, Some(admin_id));
    }

    #[tokio::test]
    async fn rejection_leaves_profile_untouched() {
        let admin_id = Uuid::new_v4();
        let seller_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();
        let mut notification_repo = MockNotificationRepository::new();

        expect_profile(&mut profile_repo, sample_profile(admin_id, "admin", "free"));
        let pending = sample_request(seller_id, "basic", "pending");
        let request_id = pending.id;
        request_repo.expect_find_by_id().returning(move |_| {
            let pending = pending.clone();
            Box::pin(async move { Ok(Some(pending)) })
        });
        request_repo
            .expect_apply_review()
            .withf(|_, review, plan_change| review.status == "rejected" && plan_change.is_none())
            .times(1)
            .returning(move |_, review, _| {
                let mut reviewed = sample_request(seller_id, "basic", &review.status);
                reviewed.admin_note = review.admin_note;
                Box::pin(async move { Ok(Some(reviewed)) })
            });
        notification_repo
            .expect_insert()
            .withf(|insert| insert.kind == "plan_rejected")
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let dto = usecase(
            request_repo,
            profile_repo,
            notification_repo,
            MockAdminAlertGateway::new(),
        )
        .review_request(
            request_id,
            admin_id,
            false,
            Some("reference not found".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(dto.status, SubscriptionRequestStatus::Rejected);
        assert_eq!(dto.admin_note.as_deref(), Some("reference not found"));
    }

    #[tokio::test]
    async fn reviewed_request_cannot_be_reviewed_again() {
        let admin_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();

        expect_profile(&mut profile_repo, sample_profile(admin_id, "admin", "free"));
        let approved = sample_request(Uuid::new_v4(), "basic", "approved");
        let request_id = approved.id;
        request_repo.expect_find_by_id().returning(move |_| {
            let approved = approved.clone();
            Box::pin(async move { Ok(Some(approved)) })
        });
        request_repo.expect_apply_review().never();

        let err = usecase(
            request_repo,
            profile_repo,
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        )
        .review_request(request_id, admin_id, true, None)
        .await
        .unwrap_err();

        assert!(matches!(err, SubscriptionRequestError::AlreadyReviewed));
    }

    #[tokio::test]
    async fn losing_review_race_reports_already_reviewed() {
        let admin_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();

        expect_profile(&mut profile_repo, sample_profile(admin_id, "admin", "free"));
        let pending = sample_request(Uuid::new_v4(), "basic", "pending");
        let request_id = pending.id;
        request_repo.expect_find_by_id().returning(move |_| {
            let pending = pending.clone();
            Box::pin(async move { Ok(Some(pending)) })
        });
        request_repo
            .expect_apply_review()
            .returning(|_, _, _| Box::pin(async { Ok(None) }));

        let err = usecase(
            request_repo,
            profile_repo,
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        )
        .review_request(request_id, admin_id, true, None)
        .await
        .unwrap_err();

        assert!(matches!(err, SubscriptionRequestError::AlreadyReviewed));
    }

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let admin_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();

        expect_profile(&mut profile_repo, sample_profile(admin_id, "admin", "free"));
        request_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let err = usecase(
            request_repo,
            profile_repo,
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        )
        .review_request(Uuid::new_v4(), admin_id, true, None)
        .await
        .unwrap_err();

        assert!(matches!(err, SubscriptionRequestError::RequestNotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sellers_cannot_review_or_list() {
        let seller_id = Uuid::new_v4();
        let mut profile_repo = MockProfileRepository::new();
        expect_profile(&mut profile_repo, sample_profile(seller_id, "seller", "basic"));

        let uc = usecase(
            MockSubscriptionRequestRepository::new(),
            profile_repo,
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        );

        let err = uc
            .review_request(Uuid::new_v4(), seller_id, true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionRequestError::Forbidden));

        let err = uc.list_requests(seller_id, None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_list_passes_status_filter() {
        let admin_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();
        let mut profile_repo = MockProfileRepository::new();

        expect_profile(&mut profile_repo, sample_profile(admin_id, "admin", "free"));
        let older = sample_request(Uuid::new_v4(), "basic", "pending");
        let mut newer = sample_request(Uuid::new_v4(), "premium", "pending");
        newer.created_at = older.created_at + chrono::Duration::minutes(5);
        let newest_first: Vec<SubscriptionRequestEntity> = vec![newer.clone(), older.clone()];
        request_repo
            .expect_list()
            .with(eq(Some(SubscriptionRequestStatus::Pending)))
            .returning(move |_| {
                let rows = newest_first.clone();
                Box::pin(async move { Ok(rows) })
            });

        let uc = usecase(
            request_repo,
            profile_repo,
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        );
        let list = uc
            .list_requests(admin_id, Some("pending".to_string()))
            .await
            .unwrap();

        assert_eq!(list.len(), 2);
        let created: Vec<DateTime<Utc>> = list.iter().map(|r| r.created_at).collect();
        assert!(created[0] >= created[1]);

        let err = uc
            .list_requests(admin_id, Some("archived".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionRequestError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn own_requests_are_scoped_to_caller_newest_first() {
        let user_id = Uuid::new_v4();
        let mut request_repo = MockSubscriptionRequestRepository::new();

        let older = sample_request(user_id, "basic", "rejected");
        let mut newer = sample_request(user_id, "premium", "pending");
        newer.created_at = older.created_at + chrono::Duration::days(2);
        let (older_id, newer_id) = (older.id, newer.id);
        let rows = vec![newer, older];
        request_repo
            .expect_list_by_user()
            .with(eq(user_id))
            .times(1)
            .returning(move |_| {
                let rows = rows.clone();
                Box::pin(async move { Ok(rows) })
            });
        request_repo.expect_list().never();

        let list = usecase(
            request_repo,
            MockProfileRepository::new(),
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        )
        .list_my_requests(user_id)
        .await
        .unwrap();

        assert_eq!(
            list.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![newer_id, older_id]
        );
        assert!(list.iter().all(|r| r.user_id == user_id));
        assert_eq!(list[1].status, SubscriptionRequestStatus::Rejected);
    }

    #[tokio::test]
    async fn own_requests_surface_repository_failure() {
        let mut request_repo = MockSubscriptionRequestRepository::new();
        request_repo
            .expect_list_by_user()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("pool exhausted")) }));

        let err = usecase(
            request_repo,
            MockProfileRepository::new(),
            MockNotificationRepository::new(),
            MockAdminAlertGateway::new(),
        )
        .list_my_requests(Uuid::new_v4())
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
