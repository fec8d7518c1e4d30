pub mod activity_kinds;
pub mod notification_kinds;
pub mod profile_roles;
pub mod subscription_request_statuses;
